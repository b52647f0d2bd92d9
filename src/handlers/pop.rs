// src/handlers/pop.rs

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
        rbac::{Access, AdminOnly, AnyMember, StaffMember, TenantAdmin},
    },
    models::pop::{CreatePopTemplatePayload, PopExecution, PopTemplate},
};

// ---
// Modelos de POP
// ---

#[utoipa::path(
    post,
    path = "/api/pop/templates",
    tag = "POP",
    request_body = CreatePopTemplatePayload,
    responses(
        (status = 201, description = "Modelo criado", body = PopTemplate)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_template(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AdminOnly>,
    Json(payload): Json<CreatePopTemplatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let scope = access.scope().map_err(to_api)?;
    let template = app_state
        .pop_service
        .create_template(scope, &payload)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    get,
    path = "/api/pop/templates",
    tag = "POP",
    responses(
        (status = 200, description = "Modelos do restaurante", body = Vec<PopTemplate>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
) -> Result<Json<Vec<PopTemplate>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let templates = app_state
        .pop_service
        .list_templates(&access.user, scope)
        .await
        .map_err(to_api)?;

    Ok(Json(templates))
}

#[utoipa::path(
    get,
    path = "/api/pop/templates/{id}",
    tag = "POP",
    params(("id" = Uuid, Path, description = "ID do modelo")),
    responses(
        (status = 200, description = "Modelo com as etapas", body = PopTemplate),
        (status = 404, description = "Modelo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_template(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
    Path(id): Path<Uuid>,
) -> Result<Json<PopTemplate>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let template = app_state
        .pop_service
        .get_template(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(template))
}

#[utoipa::path(
    post,
    path = "/api/pop/templates/{id}/deactivate",
    tag = "POP",
    params(("id" = Uuid, Path, description = "ID do modelo")),
    responses(
        (status = 200, description = "Modelo desativado", body = PopTemplate)
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_template(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<PopTemplate>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let template = app_state
        .pop_service
        .deactivate_template(scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(template))
}

// ---
// Execuções
// ---

#[utoipa::path(
    post,
    path = "/api/pop/templates/{id}/executions",
    tag = "POP",
    params(("id" = Uuid, Path, description = "ID do modelo")),
    responses(
        (status = 201, description = "Execução iniciada", body = PopExecution),
        (status = 400, description = "Modelo inativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_execution(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<StaffMember>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let execution = app_state
        .pop_service
        .start_execution(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(execution)))
}

#[utoipa::path(
    get,
    path = "/api/pop/executions",
    tag = "POP",
    responses(
        (status = 200, description = "Execuções visíveis para a sessão", body = Vec<PopExecution>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_executions(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
) -> Result<Json<Vec<PopExecution>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let executions = app_state
        .pop_service
        .list_executions(&access.user, scope)
        .await
        .map_err(to_api)?;

    Ok(Json(executions))
}

#[utoipa::path(
    get,
    path = "/api/pop/executions/{id}",
    tag = "POP",
    params(("id" = Uuid, Path, description = "ID da execução")),
    responses(
        (status = 200, description = "Execução", body = PopExecution),
        (status = 404, description = "Execução não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_execution(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
    Path(id): Path<Uuid>,
) -> Result<Json<PopExecution>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let execution = app_state
        .pop_service
        .get_execution(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(execution))
}

#[utoipa::path(
    post,
    path = "/api/pop/executions/{id}/complete",
    tag = "POP",
    params(("id" = Uuid, Path, description = "ID da execução")),
    responses(
        (status = 200, description = "Execução concluída", body = PopExecution),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_execution(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
    Path(id): Path<Uuid>,
) -> Result<Json<PopExecution>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let execution = app_state
        .pop_service
        .complete(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(execution))
}

#[utoipa::path(
    post,
    path = "/api/pop/executions/{id}/cancel",
    tag = "POP",
    params(("id" = Uuid, Path, description = "ID da execução")),
    responses(
        (status = 200, description = "Execução cancelada", body = PopExecution),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_execution(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
    Path(id): Path<Uuid>,
) -> Result<Json<PopExecution>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let execution = app_state
        .pop_service
        .cancel(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(execution))
}
