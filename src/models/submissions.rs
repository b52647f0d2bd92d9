// src/models/submissions.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::workflow::Workflow;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "submission_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pendente,
    Aprovado,
    Rejeitado,
    Parcial,
    Arquivado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pendente,
    Aprovado,
    Rejeitado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionAction {
    ApproveAll,
    ApprovePartially,
    RejectAll,
    Archive,
}

impl SubmissionAction {
    /// Deriva a decisão a partir de quantos pedidos o administrador aprovou.
    pub fn from_decision(approved: usize, total: usize) -> Self {
        match approved {
            0 => SubmissionAction::RejectAll,
            n if n >= total => SubmissionAction::ApproveAll,
            _ => SubmissionAction::ApprovePartially,
        }
    }
}

impl Workflow for SubmissionStatus {
    type Action = SubmissionAction;
    const ENTITY: &'static str = "submissao";

    fn next(self, action: SubmissionAction) -> Option<Self> {
        use SubmissionAction::*;
        use SubmissionStatus::*;

        match (self, action) {
            (Pendente, ApproveAll) => Some(Aprovado),
            (Pendente, ApprovePartially) => Some(Parcial),
            (Pendente, RejectAll) => Some(Rejeitado),
            (Aprovado | Parcial | Rejeitado, Archive) => Some(Arquivado),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pendente => "PENDENTE",
            SubmissionStatus::Aprovado => "APROVADO",
            SubmissionStatus::Rejeitado => "REJEITADO",
            SubmissionStatus::Parcial => "PARCIAL",
            SubmissionStatus::Arquivado => "ARQUIVADO",
        }
    }

    fn action_label(action: SubmissionAction) -> &'static str {
        match action {
            SubmissionAction::ApproveAll => "aprovar",
            SubmissionAction::ApprovePartially => "aprovar_parcialmente",
            SubmissionAction::RejectAll => "rejeitar",
            SubmissionAction::Archive => "arquivar",
        }
    }
}

impl SubmissionStatus {
    /// Só submissões aprovadas (total ou parcialmente) geram checklist.
    pub fn allows_checklist(self) -> bool {
        matches!(self, SubmissionStatus::Aprovado | SubmissionStatus::Parcial)
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Uuid,
    pub author_id: Option<Uuid>,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha de pedido de uma submissão
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[serde(rename = "submissaoId")]
    pub submission_id: Uuid,
    pub item_id: Uuid,
    #[serde(rename = "qtdPedida")]
    #[schema(example = "3.0")]
    pub requested_qty: Decimal,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: Submission,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub item_id: Uuid,
    pub requested_qty: Decimal,
}

// --- Payloads ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub item_id: Uuid,
    #[serde(rename = "qtdPedida")]
    #[schema(example = "3.0")]
    pub requested_qty: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionPayload {
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "pedidos_obrigatorios"))]
    pub orders: Vec<OrderPayload>,
}

// Os pedidos não listados são rejeitados
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideSubmissionPayload {
    #[serde(default)]
    pub approved_order_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::{AppError, ErrorKind};

    #[test]
    fn decision_outcome_depends_on_approved_count() {
        assert_eq!(SubmissionAction::from_decision(2, 2), SubmissionAction::ApproveAll);
        assert_eq!(SubmissionAction::from_decision(1, 2), SubmissionAction::ApprovePartially);
        assert_eq!(SubmissionAction::from_decision(0, 2), SubmissionAction::RejectAll);
    }

    #[test]
    fn pending_submission_can_be_decided_once() {
        let status = SubmissionStatus::Pendente;
        assert_eq!(status.apply(SubmissionAction::ApproveAll).unwrap(), SubmissionStatus::Aprovado);
        assert_eq!(
            status.apply(SubmissionAction::ApprovePartially).unwrap(),
            SubmissionStatus::Parcial
        );
        assert_eq!(status.apply(SubmissionAction::RejectAll).unwrap(), SubmissionStatus::Rejeitado);

        let err = SubmissionStatus::Aprovado
            .apply(SubmissionAction::RejectAll)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn only_decided_submissions_are_archived() {
        for status in [
            SubmissionStatus::Aprovado,
            SubmissionStatus::Parcial,
            SubmissionStatus::Rejeitado,
        ] {
            assert_eq!(status.apply(SubmissionAction::Archive).unwrap(), SubmissionStatus::Arquivado);
        }

        assert!(matches!(
            SubmissionStatus::Pendente.apply(SubmissionAction::Archive),
            Err(AppError::InvalidTransition { from: "PENDENTE", .. })
        ));
        assert!(SubmissionStatus::Arquivado.apply(SubmissionAction::Archive).is_err());
    }

    #[test]
    fn submission_payload_needs_at_least_one_order() {
        let empty: CreateSubmissionPayload = serde_json::from_value(serde_json::json!({ "orders": [] })).unwrap();
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("orders"));

        let filled: CreateSubmissionPayload = serde_json::from_value(serde_json::json!({
            "orders": [{ "itemId": Uuid::new_v4(), "qtdPedida": 3.0 }]
        }))
        .unwrap();
        assert!(filled.validate().is_ok());
    }

    #[test]
    fn checklist_requires_approval() {
        assert!(SubmissionStatus::Aprovado.allows_checklist());
        assert!(SubmissionStatus::Parcial.allows_checklist());
        assert!(!SubmissionStatus::Pendente.allows_checklist());
        assert!(!SubmissionStatus::Rejeitado.allows_checklist());
        assert!(!SubmissionStatus::Arquivado.allows_checklist());
    }
}
