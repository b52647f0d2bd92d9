// src/db/notification_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::notifications::Notification};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, tenant_id: Option<Uuid>, message: &str) -> Result<Notification, AppError>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError>;
    // Filtrado pelo destinatário: ninguém marca a notificação de outro
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>, AppError>;
}

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, user_id: Uuid, tenant_id: Option<Uuid>, message: &str) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, tenant_id, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications SET read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(notification)
    }
}
