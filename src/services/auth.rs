// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::{TenantRepository, UserRepository},
    models::auth::{AuthResponse, Claims, NewUser, RegisterUserPayload, Role, SessionUser, User},
};

/// Dados de uma conta a criar, com a senha ainda em texto puro.
pub struct NewAccount<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub tenant_id: Option<uuid::Uuid>,
    pub approved: bool,
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    tenant_repo: Arc<dyn TenantRepository>,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        tenant_repo: Arc<dyn TenantRepository>,
        jwt_secret: String,
        token_ttl: chrono::Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self { user_repo, tenant_repo, jwt_secret, token_ttl, bcrypt_cost }
    }

    /// Auto-cadastro de colaborador; a conta nasce aguardando aprovação.
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<User, AppError> {
        let tenant = self
            .tenant_repo
            .find_by_id(payload.tenant_id)
            .await?
            .filter(|tenant| tenant.active)
            .ok_or(AppError::BadRequest("restaurante_invalido"))?;

        let user = self
            .create_account(NewAccount {
                name: &payload.name,
                email: &payload.email,
                username: &payload.username,
                password: &payload.password,
                role: Role::Collaborator,
                tenant_id: Some(tenant.id),
                approved: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, tenant_id = %tenant.id, "Novo cadastro aguardando aprovação");
        Ok(user)
    }

    /// Cria a conta checando unicidade de e-mail e username antes do hash.
    ///
    /// O login aceita qualquer um dos dois, então cada valor é comparado com as
    /// duas colunas: um username igual ao e-mail de outra conta é recusado.
    pub async fn create_account(&self, account: NewAccount<'_>) -> Result<User, AppError> {
        if self.user_repo.find_by_login(account.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }
        if self.user_repo.find_by_login(account.username).await?.is_some() {
            return Err(AppError::UsernameAlreadyExists);
        }

        let password_hash = self.hash_password(account.password).await?;

        // A constraint do banco ainda cobre cadastros simultâneos
        self.user_repo
            .create(NewUser {
                name: account.name.to_string(),
                email: account.email.to_string(),
                username: account.username.to_string(),
                password_hash,
                role: account.role,
                tenant_id: account.tenant_id,
                approved: account.approved,
            })
            .await
    }

    pub async fn login_user(&self, login: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_login(login)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Só depois da senha correta: conta desativada, depois pendente
        if !user.active {
            return Err(AppError::AccountDisabled);
        }
        if !user.approved {
            return Err(AppError::AccountPendingApproval);
        }

        // SUPER_ADMIN não depende de restaurante ativo
        if user.role != Role::SuperAdmin {
            if let Some(tenant_id) = user.tenant_id {
                let tenant_active = self
                    .tenant_repo
                    .find_by_id(tenant_id)
                    .await?
                    .is_some_and(|tenant| tenant.active);
                if !tenant_active {
                    return Err(AppError::TenantDisabled);
                }
            }
        }

        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    /// Decodifica o token; o restaurante vem das claims, sem consulta ao banco.
    pub fn validate_token(&self, token: &str) -> Result<SessionUser, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        Ok(SessionUser { id: claims.sub, role: claims.role, tenant_id: claims.tenant_id })
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            role: user.role,
            tenant_id: user.tenant_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Garante a conta de plataforma configurada por ambiente.
    pub async fn bootstrap_super_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            tracing::info!("Conta SUPER_ADMIN já existe, bootstrap ignorado");
            return Ok(());
        }

        let user = self
            .create_account(NewAccount {
                name: "Super Admin",
                email,
                username: email,
                password,
                role: Role::SuperAdmin,
                tenant_id: None,
                approved: true,
            })
            .await?;

        tracing::info!(user_id = %user.id, "✅ Conta SUPER_ADMIN criada");
        Ok(())
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service(store: &MemoryStore) -> AuthService {
        AuthService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            "segredo-de-teste".to_string(),
            chrono::Duration::hours(1),
            4,
        )
    }

    fn payload(tenant_id: uuid::Uuid, email: &str, username: &str) -> RegisterUserPayload {
        RegisterUserPayload {
            name: "Maria".into(),
            email: email.into(),
            username: username.into(),
            password: "segredo123".into(),
            tenant_id,
        }
    }

    #[tokio::test]
    async fn registration_is_pending_and_blocks_login() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let tenant = TenantRepository::create(&store, "Cantina").await.unwrap();

        let user = auth.register_user(&payload(tenant.id, "maria@x.com", "maria")).await.unwrap();
        assert_eq!(user.role, Role::Collaborator);
        assert!(!user.approved);
        assert_ne!(user.password_hash, "segredo123");

        let result = auth.login_user("maria", "segredo123").await;
        assert!(matches!(result, Err(AppError::AccountPendingApproval)));
    }

    #[tokio::test]
    async fn duplicates_are_conflicts() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let tenant = TenantRepository::create(&store, "Cantina").await.unwrap();
        auth.register_user(&payload(tenant.id, "maria@x.com", "maria")).await.unwrap();

        let same_email = auth.register_user(&payload(tenant.id, "maria@x.com", "outra")).await;
        assert!(matches!(same_email, Err(AppError::EmailAlreadyExists)));

        let same_username = auth.register_user(&payload(tenant.id, "outra@x.com", "maria")).await;
        assert!(matches!(same_username, Err(AppError::UsernameAlreadyExists)));
    }

    #[tokio::test]
    async fn login_values_never_collide_across_columns() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let tenant = TenantRepository::create(&store, "Cantina").await.unwrap();
        auth.register_user(&payload(tenant.id, "maria@x.com", "maria")).await.unwrap();

        // Username igual ao e-mail de outra conta
        let username_is_email = auth.register_user(&payload(tenant.id, "joao@x.com", "maria@x.com")).await;
        assert!(matches!(username_is_email, Err(AppError::UsernameAlreadyExists)));

        // E-mail igual ao username de outra conta
        let email_is_username = auth.register_user(&payload(tenant.id, "maria", "joao")).await;
        assert!(matches!(email_is_username, Err(AppError::EmailAlreadyExists)));

        let found = store.find_by_login("maria").await.unwrap().unwrap();
        assert_eq!(found.email, "maria@x.com");
    }

    #[tokio::test]
    async fn unknown_or_inactive_restaurant_is_rejected() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let tenant = TenantRepository::create(&store, "Fechado").await.unwrap();
        TenantRepository::set_active(&store, tenant.id, false).await.unwrap();

        let result = auth.register_user(&payload(tenant.id, "a@x.com", "aaa")).await;
        assert!(matches!(result, Err(AppError::BadRequest("restaurante_invalido"))));
    }

    #[tokio::test]
    async fn login_checks_password_before_account_state() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let tenant = TenantRepository::create(&store, "Cantina").await.unwrap();
        let user = auth.register_user(&payload(tenant.id, "maria@x.com", "maria")).await.unwrap();

        // Senha errada em conta pendente: a resposta é de credenciais
        let wrong = auth.login_user("maria@x.com", "errada").await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        UserRepository::update_flags(&store, user.id, None, Some(false), Some(true)).await.unwrap();
        let disabled = auth.login_user("maria@x.com", "segredo123").await;
        assert!(matches!(disabled, Err(AppError::AccountDisabled)));

        UserRepository::update_flags(&store, user.id, None, Some(true), None).await.unwrap();
        let ok = auth.login_user("maria@x.com", "segredo123").await.unwrap();
        let session = auth.validate_token(&ok.token).unwrap();
        assert_eq!(session.id, user.id);
        assert_eq!(session.tenant_id, Some(tenant.id));
        assert_eq!(session.role, Role::Collaborator);
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let store = MemoryStore::new();
        let auth = service(&store);
        assert!(matches!(auth.validate_token("abc.def.ghi"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let store = MemoryStore::new();
        let auth = service(&store);

        auth.bootstrap_super_admin("root@plataforma.com", "senha-forte").await.unwrap();
        auth.bootstrap_super_admin("root@plataforma.com", "senha-forte").await.unwrap();

        let users = UserRepository::list(&store, None).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::SuperAdmin);
        assert_eq!(users[0].tenant_id, None);
    }
}
