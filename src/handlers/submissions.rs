// src/handlers/submissions.rs

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
    models::submissions::{CreateSubmissionPayload, DecideSubmissionPayload, Submission, SubmissionDetail},
};

#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "Submissions",
    request_body = CreateSubmissionPayload,
    responses(
        (status = 201, description = "Submissão criada com os pedidos", body = SubmissionDetail),
        (status = 400, description = "Item fora do catálogo ou quantidade inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<StaffMember>,
    Json(payload): Json<CreateSubmissionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let scope = access.scope().map_err(to_api)?;
    let detail = app_state
        .submission_service
        .create(&access.user, scope, &payload)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/api/submissions",
    tag = "Submissions",
    responses(
        (status = 200, description = "Submissões visíveis para a sessão", body = Vec<Submission>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_submissions(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let submissions = app_state
        .submission_service
        .list(&access.user, scope)
        .await
        .map_err(to_api)?;

    Ok(Json(submissions))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da submissão")),
    responses(
        (status = 200, description = "Submissão com pedidos", body = SubmissionDetail),
        (status = 404, description = "Submissão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<AnyMember>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionDetail>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let detail = app_state
        .submission_service
        .get(&access.user, scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/submissions/{id}/decision",
    tag = "Submissions",
    request_body = DecideSubmissionPayload,
    params(("id" = Uuid, Path, description = "ID da submissão")),
    responses(
        (status = 200, description = "Pedidos avaliados", body = SubmissionDetail),
        (status = 400, description = "Transição inválida ou pedido desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn decide_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideSubmissionPayload>,
) -> Result<Json<SubmissionDetail>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let detail = app_state
        .submission_service
        .decide(scope, id, &payload)
        .await
        .map_err(to_api)?;

    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/submissions/{id}/archive",
    tag = "Submissions",
    params(("id" = Uuid, Path, description = "ID da submissão")),
    responses(
        (status = 200, description = "Submissão arquivada", body = Submission),
        (status = 400, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn archive_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<TenantAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let scope = access.scope().map_err(to_api)?;
    let submission = app_state
        .submission_service
        .archive(scope, id)
        .await
        .map_err(to_api)?;

    Ok(Json(submission))
}
