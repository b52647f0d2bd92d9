// src/db.rs

use std::sync::Arc;

use sqlx::PgPool;

use crate::common::error::AppError;

pub mod user_repo;
pub use user_repo::{PgUserRepository, UserRepository};
pub mod tenancy_repo;
pub use tenancy_repo::{PgTenantRepository, TenantRepository};
pub mod catalog_repo;
pub use catalog_repo::{CatalogRepository, PgCatalogRepository};
pub mod submission_repo;
pub use submission_repo::{PgSubmissionRepository, SubmissionRepository};
pub mod checklist_repo;
pub use checklist_repo::{ChecklistRepository, PgChecklistRepository};
pub mod quick_list_repo;
pub use quick_list_repo::{PgQuickListRepository, QuickListRepository};
pub mod pop_repo;
pub use pop_repo::{PgPopRepository, PopRepository};
pub mod notification_repo;
pub use notification_repo::{NotificationRepository, PgNotificationRepository};

pub mod memory;
pub use memory::MemoryStore;

/// Traduz violações de unicidade do Postgres para os erros de domínio.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => AppError::EmailAlreadyExists,
                Some("users_username_key") => AppError::UsernameAlreadyExists,
                Some("checklists_submission_id_key") => AppError::ChecklistAlreadyExists,
                other => AppError::UniqueConstraintViolation(other.unwrap_or_default().to_string()),
            };
        }
    }
    AppError::DatabaseError(e)
}

/// Todos os repositórios, atrás de traits para trocar o backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub checklists: Arc<dyn ChecklistRepository>,
    pub quick_lists: Arc<dyn QuickListRepository>,
    pub pop: Arc<dyn PopRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            tenants: Arc::new(PgTenantRepository::new(pool.clone())),
            catalog: Arc::new(PgCatalogRepository::new(pool.clone())),
            submissions: Arc::new(PgSubmissionRepository::new(pool.clone())),
            checklists: Arc::new(PgChecklistRepository::new(pool.clone())),
            quick_lists: Arc::new(PgQuickListRepository::new(pool.clone())),
            pop: Arc::new(PgPopRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool)),
        }
    }

    // Um único MemoryStore para que as "tabelas" enxerguem umas às outras
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            tenants: Arc::new(store.clone()),
            catalog: Arc::new(store.clone()),
            submissions: Arc::new(store.clone()),
            checklists: Arc::new(store.clone()),
            quick_lists: Arc::new(store.clone()),
            pop: Arc::new(store.clone()),
            notifications: Arc::new(store),
        }
    }
}
