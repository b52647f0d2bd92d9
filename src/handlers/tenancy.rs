// src/handlers/tenancy.rs

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
        rbac::{Access, PlatformAdmin},
    },
    models::{
        auth::User,
        tenancy::{CreateTenantAdminPayload, CreateTenantPayload, Tenant},
    },
};

#[utoipa::path(
    post,
    path = "/api/platform/restaurants",
    tag = "Platform",
    request_body = CreateTenantPayload,
    responses(
        (status = 201, description = "Restaurante criado", body = Tenant)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: Access<PlatformAdmin>,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, app_state.i18n_store))?;

    let tenant = app_state
        .tenant_service
        .create(&payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

#[utoipa::path(
    get,
    path = "/api/platform/restaurants",
    tag = "Platform",
    responses(
        (status = 200, description = "Todos os restaurantes", body = Vec<Tenant>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tenants(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: Access<PlatformAdmin>,
) -> Result<Json<Vec<Tenant>>, ApiError> {
    let tenants = app_state
        .tenant_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(tenants))
}

#[utoipa::path(
    post,
    path = "/api/platform/restaurants/{id}/activate",
    tag = "Platform",
    params(("id" = Uuid, Path, description = "ID do restaurante")),
    responses(
        (status = 200, description = "Restaurante ativado", body = Tenant)
    ),
    security(("api_jwt" = []))
)]
pub async fn activate_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: Access<PlatformAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = app_state
        .tenant_service
        .set_active(id, true)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(tenant))
}

#[utoipa::path(
    post,
    path = "/api/platform/restaurants/{id}/deactivate",
    tag = "Platform",
    params(("id" = Uuid, Path, description = "ID do restaurante")),
    responses(
        (status = 200, description = "Restaurante desativado", body = Tenant)
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: Access<PlatformAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = app_state
        .tenant_service
        .set_active(id, false)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(tenant))
}

#[utoipa::path(
    post,
    path = "/api/platform/restaurants/{id}/admins",
    tag = "Platform",
    request_body = CreateTenantAdminPayload,
    params(("id" = Uuid, Path, description = "ID do restaurante")),
    responses(
        (status = 201, description = "Administrador criado", body = User),
        (status = 404, description = "Restaurante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tenant_admin(
    State(app_state): State<AppState>,
    locale: Locale,
    _access: Access<PlatformAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateTenantAdminPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, app_state.i18n_store))?;

    let admin = app_state
        .tenant_service
        .create_admin(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(admin)))
}
