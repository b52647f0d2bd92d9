// src/handlers/catalog.rs

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
        rbac::{Access, AdminOnly, AnyMember, TenantAdmin},
    },
    models::catalog::{CreateItemPayload, Item},
};

#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Catalog",
    responses(
        (status = 200, description = "Catálogo do restaurante", body = Vec<Item>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let items = app_state.catalog_service.list(scope).await.map_err(to_api)?;

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Catalog",
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Item criado", body = Item)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AdminOnly>,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let scope = access.scope().map_err(to_api)?;
    let item = app_state
        .catalog_service
        .create(scope, &payload)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    post,
    path = "/api/items/{id}/deactivate",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item retirado do catálogo", body = Item),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_item(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let item = app_state
        .catalog_service
        .deactivate(scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(item))
}
