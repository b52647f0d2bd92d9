// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantScope},
    models::auth::{Role, SessionUser},
};

/// 1. O Trait que define a política de acesso de uma rota
pub trait AccessPolicy: Send + Sync + 'static {
    /// Perfis aceitos, comparados por igualdade exata.
    const ROLES: &'static [Role];
    /// Rotas de restaurante exigem vínculo com um restaurante (exceto SUPER_ADMIN).
    const TENANT_SCOPED: bool = true;
}

/// O que cada guarda enxerga da requisição.
pub struct GuardContext<'a> {
    pub user: &'a SessionUser,
    pub allowed_roles: &'static [Role],
    pub tenant_scoped: bool,
}

pub type Guard = fn(&GuardContext<'_>) -> Result<(), AppError>;

/// 2. A corrente de guardas, avaliada em ordem; a primeira falha interrompe.
pub const GUARD_CHAIN: [Guard; 2] = [role_guard, tenant_guard];

pub fn role_guard(ctx: &GuardContext<'_>) -> Result<(), AppError> {
    if ctx.allowed_roles.contains(&ctx.user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub fn tenant_guard(ctx: &GuardContext<'_>) -> Result<(), AppError> {
    if !ctx.tenant_scoped || ctx.user.role == Role::SuperAdmin || ctx.user.tenant_id.is_some() {
        Ok(())
    } else {
        Err(AppError::TenantRequired)
    }
}

pub fn run_guards(ctx: &GuardContext<'_>) -> Result<(), AppError> {
    GUARD_CHAIN.iter().try_for_each(|guard| guard(ctx))
}

/// 3. O Extractor (Guardião): roda antes do corpo ser lido e antes de qualquer acesso ao banco
pub struct Access<P> {
    pub user: SessionUser,
    scope: Option<TenantScope>,
    _policy: PhantomData<P>,
}

impl<P> Access<P> {
    pub fn scope(&self) -> Result<TenantScope, AppError> {
        self.scope.ok_or(AppError::TenantRequired)
    }
}

impl<P, S> FromRequestParts<S> for Access<P>
where
    P: AccessPolicy,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        // A. Extrai a sessão colocada pelo auth_guard
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|authenticated| authenticated.0.clone())
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, app_state.i18n_store))?;

        // B. Perfil e restaurante
        let ctx = GuardContext {
            user: &user,
            allowed_roles: P::ROLES,
            tenant_scoped: P::TENANT_SCOPED,
        };
        run_guards(&ctx).map_err(|e| {
            tracing::warn!(
                user_id = %user.id,
                role = ?user.role,
                path = %parts.uri.path(),
                "Acesso negado: {}",
                e
            );
            e.to_api_error(&locale, app_state.i18n_store)
        })?;

        Ok(Access {
            scope: TenantScope::resolve(&user),
            user,
            _policy: PhantomData,
        })
    }
}

// ---
// POLÍTICAS (TIPOS)
// ---

/// Qualquer usuário de restaurante.
pub struct AnyMember;
impl AccessPolicy for AnyMember {
    const ROLES: &'static [Role] = &[Role::Collaborator, Role::Admin, Role::SuperAdmin];
}

/// Quem opera no dia a dia e cria registros no próprio restaurante.
pub struct StaffMember;
impl AccessPolicy for StaffMember {
    const ROLES: &'static [Role] = &[Role::Collaborator, Role::Admin];
}

/// Administração do restaurante; SUPER_ADMIN listado explicitamente.
pub struct TenantAdmin;
impl AccessPolicy for TenantAdmin {
    const ROLES: &'static [Role] = &[Role::Admin, Role::SuperAdmin];
}

/// Apenas o administrador do próprio restaurante.
pub struct AdminOnly;
impl AccessPolicy for AdminOnly {
    const ROLES: &'static [Role] = &[Role::Admin];
}

/// Gestão da plataforma (restaurantes).
pub struct PlatformAdmin;
impl AccessPolicy for PlatformAdmin {
    const ROLES: &'static [Role] = &[Role::SuperAdmin];
    const TENANT_SCOPED: bool = false;
}

/// Qualquer sessão válida, sem exigir restaurante.
pub struct SignedIn;
impl AccessPolicy for SignedIn {
    const ROLES: &'static [Role] = &[Role::Collaborator, Role::Admin, Role::SuperAdmin];
    const TENANT_SCOPED: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn check<P: AccessPolicy>(role: Role, tenant_id: Option<Uuid>) -> Result<(), AppError> {
        let user = SessionUser { id: Uuid::new_v4(), role, tenant_id };
        run_guards(&GuardContext {
            user: &user,
            allowed_roles: P::ROLES,
            tenant_scoped: P::TENANT_SCOPED,
        })
    }

    #[test]
    fn roles_have_no_hierarchy() {
        let tenant = Some(Uuid::new_v4());
        assert!(check::<AdminOnly>(Role::Admin, tenant).is_ok());
        assert!(matches!(check::<AdminOnly>(Role::SuperAdmin, None), Err(AppError::Forbidden)));
        assert!(matches!(check::<StaffMember>(Role::SuperAdmin, None), Err(AppError::Forbidden)));
        assert!(matches!(check::<TenantAdmin>(Role::Collaborator, tenant), Err(AppError::Forbidden)));
    }

    #[test]
    fn role_is_checked_before_tenant() {
        // Sem restaurante e sem perfil: a falha reportada é a de perfil
        assert!(matches!(check::<TenantAdmin>(Role::Collaborator, None), Err(AppError::Forbidden)));
    }

    #[test]
    fn tenant_binding_required_except_for_super_admin() {
        assert!(matches!(check::<AnyMember>(Role::Admin, None), Err(AppError::TenantRequired)));
        assert!(check::<AnyMember>(Role::SuperAdmin, None).is_ok());
        assert!(check::<SignedIn>(Role::Collaborator, None).is_ok());
    }
}
