// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

/// Família do erro, independente da variante concreta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Authorization,
    NotFound,
    Validation,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // A string é a chave de tradução da mensagem
    #[error("Requisição inválida: {0}")]
    BadRequest(&'static str),

    #[error("Transição inválida: {action} em {entity} ({from})")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        action: &'static str,
    },

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("Checklist já existe para a submissão")]
    ChecklistAlreadyExists,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta desativada")]
    AccountDisabled,

    #[error("Conta aguardando aprovação")]
    AccountPendingApproval,

    #[error("Restaurante desativado")]
    TenantDisabled,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Perfil sem permissão")]
    Forbidden,

    #[error("Usuário sem restaurante vinculado")]
    TenantRequired,

    // Não distingue "não existe" de "pertence a outro restaurante"
    #[error("Recurso não encontrado")]
    ResourceNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// O corpo de erro que efetivamente vai para o cliente.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidToken => ErrorKind::Authentication,
            AppError::InvalidCredentials
            | AppError::AccountDisabled
            | AppError::AccountPendingApproval
            | AppError::TenantDisabled
            | AppError::Forbidden
            | AppError::TenantRequired => ErrorKind::Authorization,
            AppError::ResourceNotFound => ErrorKind::NotFound,
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::InvalidTransition { .. } => ErrorKind::Validation,
            AppError::EmailAlreadyExists
            | AppError::UsernameAlreadyExists
            | AppError::ChecklistAlreadyExists
            | AppError::UniqueConstraintViolation(_) => ErrorKind::Conflict,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            // As falhas de login respondem 401 independentemente da causa
            AppError::InvalidCredentials
            | AppError::AccountDisabled
            | AppError::AccountPendingApproval
            | AppError::TenantDisabled => StatusCode::UNAUTHORIZED,
            _ => match self.kind() {
                ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "erro_validacao",
            AppError::BadRequest(key) => *key,
            AppError::InvalidTransition { .. } => "transicao_invalida",
            AppError::EmailAlreadyExists => "email_em_uso",
            AppError::UsernameAlreadyExists => "username_em_uso",
            AppError::ChecklistAlreadyExists => "checklist_ja_existe",
            AppError::UniqueConstraintViolation(_) => "registro_duplicado",
            AppError::InvalidCredentials => "credenciais_invalidas",
            AppError::AccountDisabled => "conta_desativada",
            AppError::AccountPendingApproval => "conta_pendente",
            AppError::TenantDisabled => "restaurante_desativado",
            AppError::InvalidToken => "token_invalido",
            AppError::Forbidden => "sem_permissao",
            AppError::TenantRequired => "restaurante_obrigatorio",
            AppError::ResourceNotFound => "nao_encontrado",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "erro_interno",
        }
    }

    /// Converte o erro de domínio na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica no log, nunca na resposta
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref())
                        .map(|m| store.translate(lang, m))
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                (store.translate(lang, self.message_key()), Some(Value::Object(details)))
            }
            AppError::InvalidTransition { entity, from, action } => {
                let entity: String = store.translate(lang, entity);
                let action: String = store.translate(lang, action);
                let message = store.translate_with(
                    lang,
                    self.message_key(),
                    &[("entity", entity.as_str()), ("action", action.as_str()), ("from", *from)],
                );
                (message, None)
            }
            _ => (store.translate(lang, self.message_key()), None),
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::global())
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error(&Locale::default(), I18nStore::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn login_failures_share_status_but_not_message() {
        let store = I18nStore::global();
        let wrong = AppError::InvalidCredentials.to_api_error(&pt(), store);
        let disabled = AppError::AccountDisabled.to_api_error(&pt(), store);
        let pending = AppError::AccountPendingApproval.to_api_error(&pt(), store);

        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(disabled.status, StatusCode::UNAUTHORIZED);
        assert_eq!(pending.status, StatusCode::UNAUTHORIZED);
        assert_ne!(wrong.error, disabled.error);
        assert_ne!(disabled.error, pending.error);
        assert_eq!(AppError::AccountPendingApproval.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn taxonomy_maps_to_http_status() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::TenantRequired.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ResourceNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("item_invalido").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ChecklistAlreadyExists.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_transition_message_is_localized() {
        let err = AppError::InvalidTransition {
            entity: "lista_rapida",
            from: "REJEITADO",
            action: "enviar",
        };
        let pt = err.to_api_error(&pt(), I18nStore::global());
        assert_eq!(pt.error, "Não é possível enviar a lista rápida com status REJEITADO.");

        let en = err.to_api_error(&Locale("en".to_string()), I18nStore::global());
        assert_eq!(en.error, "Cannot submit the quick list in status REJEITADO.");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("segredo do banco"));
        let api = err.to_api_error(&pt(), I18nStore::global());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("segredo"));
    }
}
