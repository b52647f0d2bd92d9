// src/services/user_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    middleware::tenancy::TenantScope,
    models::auth::{CreateUserPayload, Role, SessionUser, User},
    services::auth::{AuthService, NewAccount},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    auth_service: AuthService,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, auth_service: AuthService) -> Self {
        Self { user_repo, auth_service }
    }

    pub async fn me(&self, user: &SessionUser) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user.id, None)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<User>, AppError> {
        self.user_repo.list(scope.filter()).await
    }

    /// Conta criada pelo administrador já nasce aprovada, no restaurante dele.
    pub async fn create(&self, scope: TenantScope, payload: &CreateUserPayload) -> Result<User, AppError> {
        if payload.role == Role::SuperAdmin {
            return Err(AppError::BadRequest("perfil_invalido"));
        }

        self.auth_service
            .create_account(NewAccount {
                name: &payload.name,
                email: &payload.email,
                username: &payload.username,
                password: &payload.password,
                role: payload.role,
                tenant_id: Some(scope.write_tenant()?),
                approved: true,
            })
            .await
    }

    pub async fn approve(&self, scope: TenantScope, id: Uuid) -> Result<User, AppError> {
        let user = self
            .user_repo
            .update_flags(id, scope.filter(), None, Some(true))
            .await?
            .ok_or(AppError::ResourceNotFound)?;
        tracing::info!(user_id = %id, "Conta aprovada");
        Ok(user)
    }

    pub async fn set_active(
        &self,
        actor: &SessionUser,
        scope: TenantScope,
        id: Uuid,
        active: bool,
    ) -> Result<User, AppError> {
        if !active && id == actor.id {
            return Err(AppError::BadRequest("operacao_sobre_si_mesmo"));
        }

        let user = self
            .user_repo
            .update_flags(id, scope.filter(), Some(active), None)
            .await?
            .ok_or(AppError::ResourceNotFound)?;
        tracing::info!(user_id = %id, active, "Status da conta alterado");
        Ok(user)
    }

    pub async fn delete(&self, actor: &SessionUser, scope: TenantScope, id: Uuid) -> Result<(), AppError> {
        if id == actor.id {
            return Err(AppError::BadRequest("operacao_sobre_si_mesmo"));
        }

        if !self.user_repo.delete(id, scope.filter()).await? {
            return Err(AppError::ResourceNotFound);
        }
        tracing::info!(user_id = %id, deleted_by = %actor.id, "Conta removida");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{MemoryStore, TenantRepository},
        services::test_support::{scope_of, session},
    };

    fn service(store: &MemoryStore) -> UserService {
        let auth = AuthService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            "segredo".into(),
            chrono::Duration::hours(1),
            4,
        );
        UserService::new(Arc::new(store.clone()), auth)
    }

    fn payload(username: &str) -> CreateUserPayload {
        CreateUserPayload {
            name: "Pedro".into(),
            email: format!("{username}@x.com"),
            username: username.into(),
            password: "segredo123".into(),
            role: Role::Collaborator,
        }
    }

    #[tokio::test]
    async fn admin_manages_only_own_restaurant() {
        let store = MemoryStore::new();
        let users = service(&store);
        let tenant_a = TenantRepository::create(&store, "A").await.unwrap();
        let tenant_b = TenantRepository::create(&store, "B").await.unwrap();
        let admin_a = session(Role::Admin, Some(tenant_a.id));
        let admin_b = session(Role::Admin, Some(tenant_b.id));

        let created = users.create(scope_of(&admin_a), &payload("pedro")).await.unwrap();
        assert!(created.approved);
        assert_eq!(created.tenant_id, Some(tenant_a.id));

        let foreign = users.set_active(&admin_b, scope_of(&admin_b), created.id, false).await;
        assert!(matches!(foreign, Err(AppError::ResourceNotFound)));
        assert!(users.list(scope_of(&admin_b)).await.unwrap().is_empty());

        let foreign_delete = users.delete(&admin_b, scope_of(&admin_b), created.id).await;
        assert!(matches!(foreign_delete, Err(AppError::ResourceNotFound)));
        users.delete(&admin_a, scope_of(&admin_a), created.id).await.unwrap();
    }

    #[tokio::test]
    async fn admin_cannot_disable_or_delete_self() {
        let store = MemoryStore::new();
        let users = service(&store);
        let tenant_id = Uuid::new_v4();
        let admin = session(Role::Admin, Some(tenant_id));

        let result = users.set_active(&admin, scope_of(&admin), admin.id, false).await;
        assert!(matches!(result, Err(AppError::BadRequest("operacao_sobre_si_mesmo"))));
        let result = users.delete(&admin, scope_of(&admin), admin.id).await;
        assert!(matches!(result, Err(AppError::BadRequest("operacao_sobre_si_mesmo"))));
    }

    #[tokio::test]
    async fn super_admin_role_cannot_be_granted() {
        let store = MemoryStore::new();
        let users = service(&store);
        let admin = session(Role::Admin, Some(Uuid::new_v4()));
        let mut body = payload("root");
        body.role = Role::SuperAdmin;

        let result = users.create(scope_of(&admin), &body).await;
        assert!(matches!(result, Err(AppError::BadRequest("perfil_invalido"))));
    }
}
