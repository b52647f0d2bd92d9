// src/models/pop.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::workflow::Workflow;

// Procedimento Operacional Padrão
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pop_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PopType {
    Abertura,
    Fechamento,
    Limpeza,
    Preparo,
    Recebimento,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pop_execution_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PopExecutionStatus {
    EmAndamento,
    Concluido,
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopExecutionAction {
    Complete,
    Cancel,
}

impl Workflow for PopExecutionStatus {
    type Action = PopExecutionAction;
    const ENTITY: &'static str = "execucao_pop";

    fn next(self, action: PopExecutionAction) -> Option<Self> {
        match (self, action) {
            (PopExecutionStatus::EmAndamento, PopExecutionAction::Complete) => {
                Some(PopExecutionStatus::Concluido)
            }
            (PopExecutionStatus::EmAndamento, PopExecutionAction::Cancel) => {
                Some(PopExecutionStatus::Cancelado)
            }
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PopExecutionStatus::EmAndamento => "EM_ANDAMENTO",
            PopExecutionStatus::Concluido => "CONCLUIDO",
            PopExecutionStatus::Cancelado => "CANCELADO",
        }
    }

    fn action_label(action: PopExecutionAction) -> &'static str {
        match action {
            PopExecutionAction::Complete => "concluir",
            PopExecutionAction::Cancel => "cancelar",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopTemplate {
    pub id: Uuid,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Uuid,
    #[schema(example = "Abertura da cozinha")]
    pub name: String,
    pub pop_type: PopType,
    // Passos em ordem de execução
    pub steps: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopExecution {
    pub id: Uuid,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Uuid,
    pub template_id: Uuid,
    pub user_id: Option<Uuid>,
    pub status: PopExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePopTemplatePayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    pub name: String,
    pub pop_type: PopType,
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    #[schema(example = json!(["Ligar exaustão", "Conferir temperatura das câmaras"]))]
    pub steps: Vec<String>,
}
