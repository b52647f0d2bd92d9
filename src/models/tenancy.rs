// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Tenant (O "Restaurante")
// ---
// Raiz do isolamento: toda entidade de negócio aponta para um restaurante
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    #[schema(example = "Cantina Central")]
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    #[schema(example = "Cantina Central")]
    pub name: String,
}

// Primeiro administrador de um restaurante, criado pela plataforma
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantAdminPayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    pub name: String,
    #[validate(email(message = "email_invalido"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "username_invalido"))]
    pub username: String,
    #[validate(length(min = 6, message = "senha_curta"))]
    pub password: String,
}
