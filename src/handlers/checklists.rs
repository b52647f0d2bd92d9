// src/handlers/checklists.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Access, TenantAdmin},
    },
    models::checklists::{Checklist, ChecklistDetail, ChecklistItem, CreateChecklistPayload},
};

#[utoipa::path(
    post,
    path = "/api/checklists",
    tag = "Checklists",
    request_body = CreateChecklistPayload,
    responses(
        (status = 201, description = "Checklist criado a partir dos pedidos aprovados", body = ChecklistDetail),
        (status = 400, description = "Submissão não aprovada"),
        (status = 409, description = "A submissão já possui checklist")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_checklist(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Json(payload): Json<CreateChecklistPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let detail = app_state
        .checklist_service
        .create_from_submission(scope, payload.submission_id)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/api/checklists",
    tag = "Checklists",
    responses(
        (status = 200, description = "Checklists do restaurante", body = Vec<Checklist>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_checklists(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
) -> Result<Json<Vec<Checklist>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let checklists = app_state.checklist_service.list(scope).await.map_err(to_api)?;

    Ok(Json(checklists))
}

#[utoipa::path(
    get,
    path = "/api/checklists/{id}",
    tag = "Checklists",
    params(("id" = Uuid, Path, description = "ID do checklist")),
    responses(
        (status = 200, description = "Checklist com itens", body = ChecklistDetail),
        (status = 404, description = "Checklist não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_checklist(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChecklistDetail>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let detail = app_state.checklist_service.get(scope, id).await.map_err(to_api)?;

    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/checklists/{id}/finalize",
    tag = "Checklists",
    params(("id" = Uuid, Path, description = "ID do checklist")),
    responses(
        (status = 200, description = "Checklist finalizado", body = Checklist),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn finalize_checklist(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Checklist>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let checklist = app_state.checklist_service.finalize(scope, id).await.map_err(to_api)?;

    Ok(Json(checklist))
}

#[utoipa::path(
    post,
    path = "/api/checklists/{id}/reopen",
    tag = "Checklists",
    params(("id" = Uuid, Path, description = "ID do checklist")),
    responses(
        (status = 200, description = "Checklist reaberto", body = Checklist),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn reopen_checklist(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Checklist>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let checklist = app_state.checklist_service.reopen(scope, id).await.map_err(to_api)?;

    Ok(Json(checklist))
}

// marcarItem
#[utoipa::path(
    post,
    path = "/api/checklists/{id}/items/{item_id}/toggle",
    tag = "Checklists",
    params(
        ("id" = Uuid, Path, description = "ID do checklist"),
        ("item_id" = Uuid, Path, description = "ID do item do checklist")
    ),
    responses(
        (status = 200, description = "Marcação invertida", body = ChecklistItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_checklist_item(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ChecklistItem>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let item = app_state
        .checklist_service
        .toggle_item(scope, id, item_id)
        .await
        .map_err(to_api)?;

    Ok(Json(item))
}
