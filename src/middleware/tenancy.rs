// src/middleware/tenancy.rs

use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::{Role, SessionUser};

/// Escopo de restaurante de uma requisição autenticada.
///
/// Sempre derivado da sessão; nunca de parâmetro enviado pelo cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Usuário preso a um único restaurante.
    Tenant(Uuid),
    /// SUPER_ADMIN: enxerga todos os restaurantes. `home` é o restaurante
    /// vinculado à conta, se houver, usado em criações.
    Platform { home: Option<Uuid> },
}

impl TenantScope {
    pub fn resolve(user: &SessionUser) -> Option<Self> {
        match (user.role, user.tenant_id) {
            (Role::SuperAdmin, home) => Some(TenantScope::Platform { home }),
            (_, Some(tenant_id)) => Some(TenantScope::Tenant(tenant_id)),
            (_, None) => None,
        }
    }

    /// Filtro a conjugar com a chave primária; `None` apenas no escopo de plataforma.
    pub fn filter(&self) -> Option<Uuid> {
        match self {
            TenantScope::Tenant(tenant_id) => Some(*tenant_id),
            TenantScope::Platform { .. } => None,
        }
    }

    /// Restaurante dono de um registro novo.
    pub fn write_tenant(&self) -> Result<Uuid, AppError> {
        match self {
            TenantScope::Tenant(tenant_id) => Ok(*tenant_id),
            TenantScope::Platform { home: Some(tenant_id) } => Ok(*tenant_id),
            TenantScope::Platform { home: None } => Err(AppError::TenantRequired),
        }
    }
}
