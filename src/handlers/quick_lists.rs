// src/handlers/quick_lists.rs

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
        rbac::{Access, AnyMember, StaffMember, TenantAdmin},
    },
    models::quick_lists::{CreateQuickListPayload, QuickList, QuickListDetail, QuickListItem, QuickListItemPayload},
};

#[utoipa::path(
    post,
    path = "/api/quick-lists",
    tag = "Quick Lists",
    request_body = CreateQuickListPayload,
    responses(
        (status = 201, description = "Lista criada como rascunho", body = QuickListDetail)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quick_list(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<StaffMember>,
    Json(payload): Json<CreateQuickListPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let scope = access.scope().map_err(to_api)?;
    let detail = app_state
        .quick_list_service
        .create(&access.user, scope, &payload)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/api/quick-lists",
    tag = "Quick Lists",
    responses(
        (status = 200, description = "Listas visíveis para a sessão", body = Vec<QuickList>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quick_lists(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
) -> Result<Json<Vec<QuickList>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let lists = app_state
        .quick_list_service
        .list(&access.user, scope)
        .await
        .map_err(to_api)?;

    Ok(Json(lists))
}

#[utoipa::path(
    get,
    path = "/api/quick-lists/{id}",
    tag = "Quick Lists",
    params(("id" = Uuid, Path, description = "ID da lista")),
    responses(
        (status = 200, description = "Lista com itens", body = QuickListDetail),
        (status = 404, description = "Lista não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quick_list(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuickListDetail>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let detail = app_state
        .quick_list_service
        .get(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/quick-lists/{id}/items",
    tag = "Quick Lists",
    request_body = QuickListItemPayload,
    params(("id" = Uuid, Path, description = "ID da lista")),
    responses(
        (status = 201, description = "Item adicionado", body = QuickListItem),
        (status = 400, description = "Lista fora de rascunho")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_quick_list_item(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<StaffMember>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuickListItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let scope = access.scope().map_err(to_api)?;
    let item = app_state
        .quick_list_service
        .add_item(&access.user, scope, id, &payload)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    post,
    path = "/api/quick-lists/{id}/items/{item_id}/discard",
    tag = "Quick Lists",
    params(
        ("id" = Uuid, Path, description = "ID da lista"),
        ("item_id" = Uuid, Path, description = "ID do item da lista")
    ),
    responses(
        (status = 200, description = "Item descartado", body = QuickListItem)
    ),
    security(("api_jwt" = []))
)]
pub async fn discard_quick_list_item(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<QuickListItem>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let item = app_state
        .quick_list_service
        .discard_item(&access.user, scope, id, item_id)
        .await
        .map_err(to_api)?;

    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/quick-lists/{id}/submit",
    tag = "Quick Lists",
    params(("id" = Uuid, Path, description = "ID da lista")),
    responses(
        (status = 200, description = "Lista enviada para avaliação", body = QuickList),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_quick_list(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<StaffMember>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuickList>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let list = app_state
        .quick_list_service
        .submit(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(list))
}

#[utoipa::path(
    post,
    path = "/api/quick-lists/{id}/approve",
    tag = "Quick Lists",
    params(("id" = Uuid, Path, description = "ID da lista")),
    responses(
        (status = 200, description = "Lista aprovada", body = QuickList),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_quick_list(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuickList>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let list = app_state
        .quick_list_service
        .approve(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(list))
}

#[utoipa::path(
    post,
    path = "/api/quick-lists/{id}/reject",
    tag = "Quick Lists",
    params(("id" = Uuid, Path, description = "ID da lista")),
    responses(
        (status = 200, description = "Lista rejeitada", body = QuickList),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_quick_list(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuickList>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let list = app_state
        .quick_list_service
        .reject(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(list))
}

#[utoipa::path(
    post,
    path = "/api/quick-lists/{id}/archive",
    tag = "Quick Lists",
    params(("id" = Uuid, Path, description = "ID da lista")),
    responses(
        (status = 200, description = "Lista arquivada", body = QuickList),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn archive_quick_list(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuickList>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let list = app_state
        .quick_list_service
        .archive(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(list))
}
