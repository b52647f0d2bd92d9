// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::SessionUser,
};

// Valida o Bearer token e anexa a sessão aos "extensions" da requisição
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::InvalidToken.to_api_error(&locale, app_state.i18n_store))?;

    let session = app_state
        .auth_service
        .validate_token(bearer.token())
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(AuthenticatedUser(session));

    Ok(next.run(request).await)
}

// Extrator para obter a sessão autenticada diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
