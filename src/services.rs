// src/services.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, SessionUser},
};

pub mod auth;
pub mod catalog_service;
pub mod checklist_service;
pub mod notification_service;
pub mod pop_service;
pub mod quick_list_service;
pub mod submission_service;
pub mod tenancy_service;
pub mod user_service;

/// Colaboradores só enxergam os registros que criaram.
pub(crate) fn author_scope(user: &SessionUser) -> Option<Uuid> {
    match user.role {
        Role::Collaborator => Some(user.id),
        Role::Admin | Role::SuperAdmin => None,
    }
}

/// Mesmo erro de "não existe", para não revelar registros de colegas.
pub(crate) fn ensure_author(user: &SessionUser, author_id: Option<Uuid>) -> Result<(), AppError> {
    match author_scope(user) {
        Some(own) if author_id != Some(own) => Err(AppError::ResourceNotFound),
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use crate::{
        middleware::tenancy::TenantScope,
        models::auth::{Role, SessionUser},
    };

    pub fn session(role: Role, tenant_id: Option<Uuid>) -> SessionUser {
        SessionUser { id: Uuid::new_v4(), role, tenant_id }
    }

    pub fn scope_of(user: &SessionUser) -> TenantScope {
        TenantScope::resolve(user).expect("sessão sem escopo")
    }
}
