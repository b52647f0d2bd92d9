// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Access, AdminOnly, TenantAdmin},
    },
    models::auth::{CreateUserPayload, User},
};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários do restaurante", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
) -> Result<Json<Vec<User>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let users = app_state.user_service.list(scope).await.map_err(to_api)?;

    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado já aprovado", body = User),
        (status = 409, description = "E-mail ou nome de usuário já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AdminOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let scope = access.scope().map_err(to_api)?;
    let user = app_state
        .user_service
        .create(scope, &payload)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/approve",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Conta aprovada", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_user(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let user = app_state.user_service.approve(scope, id).await.map_err(to_api)?;

    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/activate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Conta reativada", body = User)
    ),
    security(("api_jwt" = []))
)]
pub async fn activate_user(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let user = app_state
        .user_service
        .set_active(&access.user, scope, id, true)
        .await
        .map_err(to_api)?;

    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/deactivate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Conta desativada", body = User),
        (status = 400, description = "Operação sobre a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let user = app_state
        .user_service
        .set_active(&access.user, scope, id, false)
        .await
        .map_err(to_api)?;

    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    app_state
        .user_service
        .delete(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
