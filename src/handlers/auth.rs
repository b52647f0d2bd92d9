// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Access, SignedIn},
    },
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, User},
};

// Handler de registro: a conta fica aguardando aprovação, sem token
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Cadastro recebido, aguardando aprovação", body = User),
        (status = 409, description = "E-mail ou nome de usuário já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, app_state.i18n_store))?;

    let user = app_state
        .auth_service
        .register_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(user)))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas, conta desativada ou pendente")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login_user(&payload.login, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(response))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário da sessão", body = User)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    access: Access<SignedIn>,
) -> Result<Json<User>, ApiError> {
    let user = app_state
        .user_service
        .me(&access.user)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok(Json(user))
}
