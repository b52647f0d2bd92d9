// src/services/tenancy_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantRepository,
    models::{
        auth::{Role, User},
        tenancy::{CreateTenantAdminPayload, Tenant},
    },
    services::auth::{AuthService, NewAccount},
};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: Arc<dyn TenantRepository>,
    auth_service: AuthService,
}

impl TenantService {
    /// Cria uma nova instância do serviço de restaurantes.
    pub fn new(tenant_repo: Arc<dyn TenantRepository>, auth_service: AuthService) -> Self {
        Self { tenant_repo, auth_service }
    }

    pub async fn create(&self, name: &str) -> Result<Tenant, AppError> {
        let tenant = self.tenant_repo.create(name).await?;
        tracing::info!(tenant_id = %tenant.id, "Restaurante criado");
        Ok(tenant)
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.list().await
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Tenant, AppError> {
        let tenant = self
            .tenant_repo
            .set_active(id, active)
            .await?
            .ok_or(AppError::ResourceNotFound)?;
        tracing::info!(tenant_id = %id, active, "Status do restaurante alterado");
        Ok(tenant)
    }

    /// LÓGICA DE NEGÓCIO: cria o ADMIN de um restaurante existente,
    /// já aprovado, para que ele possa cadastrar o resto da equipe.
    pub async fn create_admin(&self, tenant_id: Uuid, payload: &CreateTenantAdminPayload) -> Result<User, AppError> {
        let tenant = self
            .tenant_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or(AppError::ResourceNotFound)?;

        self.auth_service
            .create_account(NewAccount {
                name: &payload.name,
                email: &payload.email,
                username: &payload.username,
                password: &payload.password,
                role: Role::Admin,
                tenant_id: Some(tenant.id),
                approved: true,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn auth(store: &MemoryStore) -> AuthService {
        AuthService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            "segredo".into(),
            chrono::Duration::hours(1),
            4,
        )
    }

    fn service(store: &MemoryStore) -> TenantService {
        TenantService::new(Arc::new(store.clone()), auth(store))
    }

    fn admin_payload() -> CreateTenantAdminPayload {
        CreateTenantAdminPayload {
            name: "Gerente".into(),
            email: "gerente@cantina.com".into(),
            username: "gerente".into(),
            password: "segredo123".into(),
        }
    }

    #[tokio::test]
    async fn first_admin_is_bound_and_approved() {
        let store = MemoryStore::new();
        let tenants = service(&store);
        let tenant = tenants.create("Cantina").await.unwrap();

        let admin = tenants.create_admin(tenant.id, &admin_payload()).await.unwrap();

        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.tenant_id, Some(tenant.id));
        assert!(admin.approved);
    }

    #[tokio::test]
    async fn deactivated_restaurant_blocks_login() {
        let store = MemoryStore::new();
        let tenants = service(&store);
        let auth = auth(&store);
        let tenant = tenants.create("Cantina").await.unwrap();
        tenants.create_admin(tenant.id, &admin_payload()).await.unwrap();
        auth.bootstrap_super_admin("root@plataforma.com", "segredo123").await.unwrap();

        auth.login_user("gerente", "segredo123").await.unwrap();

        tenants.set_active(tenant.id, false).await.unwrap();
        let blocked = auth.login_user("gerente", "segredo123").await;
        assert!(matches!(blocked, Err(AppError::TenantDisabled)));
        assert_eq!(AppError::TenantDisabled.status(), axum::http::StatusCode::UNAUTHORIZED);

        // Senha errada continua sendo só "credenciais inválidas"
        let wrong = auth.login_user("gerente", "outra-senha").await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        auth.login_user("root@plataforma.com", "segredo123").await.unwrap();

        tenants.set_active(tenant.id, true).await.unwrap();
        auth.login_user("gerente", "segredo123").await.unwrap();
    }

    #[tokio::test]
    async fn unknown_restaurant_is_not_found() {
        let store = MemoryStore::new();
        let tenants = service(&store);
        assert!(matches!(tenants.set_active(Uuid::new_v4(), false).await, Err(AppError::ResourceNotFound)));
    }
}
