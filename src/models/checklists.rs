// src/models/checklists.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::workflow::Workflow;
use crate::models::submissions::{OrderStatus, SubmissionDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "checklist_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecklistStatus {
    Aberto,
    Finalizado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistAction {
    Finalize,
    Reopen,
}

impl Workflow for ChecklistStatus {
    type Action = ChecklistAction;
    const ENTITY: &'static str = "checklist";

    fn next(self, action: ChecklistAction) -> Option<Self> {
        match (self, action) {
            (ChecklistStatus::Aberto, ChecklistAction::Finalize) => Some(ChecklistStatus::Finalizado),
            (ChecklistStatus::Finalizado, ChecklistAction::Reopen) => Some(ChecklistStatus::Aberto),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ChecklistStatus::Aberto => "ABERTO",
            ChecklistStatus::Finalizado => "FINALIZADO",
        }
    }

    fn action_label(action: ChecklistAction) -> &'static str {
        match action {
            ChecklistAction::Finalize => "finalizar",
            ChecklistAction::Reopen => "reabrir",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: Uuid,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Uuid,
    #[serde(rename = "submissaoId")]
    pub submission_id: Uuid,
    pub status: ChecklistStatus,
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    pub checklist_id: Uuid,
    pub item_id: Uuid,
    #[serde(rename = "qtdPedida")]
    pub requested_qty: Decimal,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetail {
    #[serde(flatten)]
    pub checklist: Checklist,
    pub items: Vec<ChecklistItem>,
}

/// Linha copiada de um pedido aprovado no momento da criação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChecklistItem {
    pub item_id: Uuid,
    pub requested_qty: Decimal,
}

/// Fotografia dos pedidos aprovados; alterações futuras nos pedidos não se propagam.
pub fn snapshot_approved_orders(submission: &SubmissionDetail) -> Vec<NewChecklistItem> {
    submission
        .orders
        .iter()
        .filter(|order| order.status == OrderStatus::Aprovado)
        .map(|order| NewChecklistItem {
            item_id: order.item_id,
            requested_qty: order.requested_qty,
        })
        .collect()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChecklistPayload {
    #[serde(rename = "submissaoId")]
    pub submission_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::{Order, Submission, SubmissionStatus};
    use chrono::Utc;

    fn order(submission_id: Uuid, qty: i64, status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            submission_id,
            item_id: Uuid::new_v4(),
            requested_qty: Decimal::from(qty),
            status,
        }
    }

    #[test]
    fn finalize_and_reopen_alternate() {
        let finalized = ChecklistStatus::Aberto.apply(ChecklistAction::Finalize).unwrap();
        assert_eq!(finalized, ChecklistStatus::Finalizado);
        assert_eq!(finalized.apply(ChecklistAction::Reopen).unwrap(), ChecklistStatus::Aberto);

        assert!(ChecklistStatus::Aberto.apply(ChecklistAction::Reopen).is_err());
        assert!(ChecklistStatus::Finalizado.apply(ChecklistAction::Finalize).is_err());
    }

    #[test]
    fn snapshot_keeps_only_approved_orders() {
        let submission_id = Uuid::new_v4();
        let approved = order(submission_id, 3, OrderStatus::Aprovado);
        let rejected = order(submission_id, 7, OrderStatus::Rejeitado);
        let detail = SubmissionDetail {
            submission: Submission {
                id: submission_id,
                tenant_id: Uuid::new_v4(),
                author_id: None,
                status: SubmissionStatus::Parcial,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            orders: vec![approved.clone(), rejected],
        };

        let items = snapshot_approved_orders(&detail);
        assert_eq!(
            items,
            vec![NewChecklistItem {
                item_id: approved.item_id,
                requested_qty: Decimal::from(3),
            }]
        );
    }
}
