// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::Repositories,
    services::{
        auth::AuthService, catalog_service::CatalogService, checklist_service::ChecklistService,
        notification_service::NotificationService, pop_service::PopService, quick_list_service::QuickListService,
        submission_service::SubmissionService, tenancy_service::TenantService, user_service::UserService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    /// Sem URL, a aplicação sobe com armazenamento em memória.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub bcrypt_cost: u32,
    pub super_admin: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let super_admin = match (env::var("SUPER_ADMIN_EMAIL"), env::var("SUPER_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            jwt_expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 168)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            super_admin,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} inválida: {raw}")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub i18n_store: &'static I18nStore,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub tenant_service: TenantService,
    pub catalog_service: CatalogService,
    pub submission_service: SubmissionService,
    pub checklist_service: ChecklistService,
    pub quick_list_service: QuickListService,
    pub pop_service: PopService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let repositories = match &config.database_url {
            Some(database_url) => {
                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Repositories::postgres(db_pool)
            }
            None => {
                tracing::warn!("DATABASE_URL não definida: usando armazenamento em memória");
                Repositories::in_memory()
            }
        };

        let state = Self::from_repositories(repositories, config);

        if let Some((email, password)) = &config.super_admin {
            state.auth_service.bootstrap_super_admin(email, password).await?;
        }

        Ok(state)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_repositories(repositories: Repositories, config: &Config) -> Self {
        let auth_service = AuthService::new(
            repositories.users.clone(),
            repositories.tenants.clone(),
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.jwt_expiration_hours),
            config.bcrypt_cost,
        );
        let notification_service = NotificationService::new(repositories.notifications.clone());
        let catalog_service = CatalogService::new(repositories.catalog.clone());

        Self {
            i18n_store: I18nStore::global(),
            user_service: UserService::new(repositories.users.clone(), auth_service.clone()),
            tenant_service: TenantService::new(repositories.tenants.clone(), auth_service.clone()),
            submission_service: SubmissionService::new(
                repositories.submissions.clone(),
                catalog_service.clone(),
                notification_service.clone(),
            ),
            checklist_service: ChecklistService::new(repositories.checklists.clone(), repositories.submissions.clone()),
            quick_list_service: QuickListService::new(
                repositories.quick_lists.clone(),
                catalog_service.clone(),
                notification_service.clone(),
            ),
            pop_service: PopService::new(repositories.pop.clone()),
            auth_service,
            catalog_service,
            notification_service,
        }
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt_secret: "segredo-de-teste".to_string(),
            jwt_expiration_hours: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            db_max_connections: 1,
            bcrypt_cost: 4,
            super_admin: None,
        }
    }
}
