// src/services/notification_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        i18n::{I18nStore, DEFAULT_LOCALE},
    },
    db::NotificationRepository,
    models::{auth::SessionUser, notifications::Notification},
};

#[derive(Clone)]
pub struct NotificationService {
    notification_repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notification_repo: Arc<dyn NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Avisa o autor de um registro. Falhas ficam no log: a transição já foi gravada.
    pub async fn notify(
        &self,
        user_id: Option<Uuid>,
        tenant_id: Uuid,
        key: &str,
        args: &[(&str, &str)],
    ) {
        // Autor removido: não há a quem avisar
        let Some(user_id) = user_id else { return };

        let message = I18nStore::global().translate_with(DEFAULT_LOCALE, key, args);
        if let Err(e) = self
            .notification_repo
            .create(user_id, Some(tenant_id), &message)
            .await
        {
            tracing::warn!(%user_id, "Falha ao gravar notificação: {}", e);
        }
    }

    pub async fn list_mine(&self, user: &SessionUser) -> Result<Vec<Notification>, AppError> {
        self.notification_repo.list_for_user(user.id).await
    }

    pub async fn mark_read(&self, user: &SessionUser, id: Uuid) -> Result<Notification, AppError> {
        self.notification_repo
            .mark_read(id, user.id)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }
}
