// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Item do catálogo de compras de um restaurante
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Uuid,
    #[schema(example = "Farinha de trigo")]
    pub name: String,
    #[schema(example = "kg")]
    pub unit: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemPayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    #[schema(example = "Farinha de trigo")]
    pub name: String,
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    #[schema(example = "kg")]
    pub unit: String,
}
