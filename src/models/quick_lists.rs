// src/models/quick_lists.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::workflow::Workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quick_list_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuickListStatus {
    Rascunho,
    Pendente,
    Aprovado,
    Rejeitado,
    Arquivado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickListAction {
    Submit,
    Approve,
    Reject,
    Archive,
}

impl Workflow for QuickListStatus {
    type Action = QuickListAction;
    const ENTITY: &'static str = "lista_rapida";

    fn next(self, action: QuickListAction) -> Option<Self> {
        use QuickListAction::*;
        use QuickListStatus::*;

        match (self, action) {
            (Rascunho, Submit) => Some(Pendente),
            (Pendente, Approve) => Some(Aprovado),
            (Pendente, Reject) => Some(Rejeitado),
            (Aprovado | Rejeitado, Archive) => Some(Arquivado),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            QuickListStatus::Rascunho => "RASCUNHO",
            QuickListStatus::Pendente => "PENDENTE",
            QuickListStatus::Aprovado => "APROVADO",
            QuickListStatus::Rejeitado => "REJEITADO",
            QuickListStatus::Arquivado => "ARQUIVADO",
        }
    }

    fn action_label(action: QuickListAction) -> &'static str {
        match action {
            QuickListAction::Submit => "enviar",
            QuickListAction::Approve => "aprovar",
            QuickListAction::Reject => "rejeitar",
            QuickListAction::Archive => "arquivar",
        }
    }
}

impl QuickListStatus {
    /// Itens só entram enquanto a lista é rascunho.
    pub fn accepts_new_items(self) -> bool {
        self == QuickListStatus::Rascunho
    }

    /// Descartar itens é permitido até a lista ser arquivada.
    pub fn allows_discard(self) -> bool {
        self != QuickListStatus::Arquivado
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickList {
    pub id: Uuid,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Uuid,
    pub author_id: Option<Uuid>,
    #[schema(example = "Reposição de sexta")]
    pub name: String,
    pub status: QuickListStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickListItem {
    pub id: Uuid,
    pub quick_list_id: Uuid,
    // Opcional: a lista rápida aceita itens fora do catálogo
    pub item_id: Option<Uuid>,
    #[schema(example = "Limão taiti")]
    pub description: String,
    #[schema(example = "2.0")]
    pub quantity: Decimal,
    pub discarded: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickListDetail {
    #[serde(flatten)]
    pub quick_list: QuickList,
    pub items: Vec<QuickListItem>,
}

#[derive(Debug, Clone)]
pub struct NewQuickListItem {
    pub item_id: Option<Uuid>,
    pub description: String,
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickListItemPayload {
    pub item_id: Option<Uuid>,
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    pub description: String,
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuickListPayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<QuickListItemPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_archive() {
        let status = QuickListStatus::Rascunho
            .apply(QuickListAction::Submit)
            .and_then(|s| s.apply(QuickListAction::Approve))
            .and_then(|s| s.apply(QuickListAction::Archive))
            .unwrap();
        assert_eq!(status, QuickListStatus::Arquivado);
    }

    #[test]
    fn rejected_list_cannot_be_resubmitted() {
        let rejected = QuickListStatus::Rascunho
            .apply(QuickListAction::Submit)
            .and_then(|s| s.apply(QuickListAction::Reject))
            .unwrap();
        assert_eq!(rejected, QuickListStatus::Rejeitado);
        assert!(rejected.apply(QuickListAction::Submit).is_err());
    }

    #[test]
    fn draft_cannot_be_decided_or_archived() {
        assert!(QuickListStatus::Rascunho.apply(QuickListAction::Approve).is_err());
        assert!(QuickListStatus::Rascunho.apply(QuickListAction::Reject).is_err());
        assert!(QuickListStatus::Rascunho.apply(QuickListAction::Archive).is_err());
        assert!(QuickListStatus::Pendente.apply(QuickListAction::Archive).is_err());
    }

    #[test]
    fn editing_rules() {
        assert!(QuickListStatus::Rascunho.accepts_new_items());
        assert!(!QuickListStatus::Pendente.accepts_new_items());
        assert!(QuickListStatus::Aprovado.allows_discard());
        assert!(!QuickListStatus::Arquivado.allows_discard());
    }
}
