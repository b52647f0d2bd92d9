// src/handlers/notifications.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Access, SignedIn},
    },
    models::notifications::Notification,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses(
        (status = 200, description = "Notificações da sessão, mais recentes primeiro", body = Vec<Notification>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<SignedIn>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = app_state
        .notification_service
        .list_mine(&access.user)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(notifications))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Notificação marcada como lida", body = Notification),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<SignedIn>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let notification = app_state
        .notification_service
        .mark_read(&access.user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(notification))
}
