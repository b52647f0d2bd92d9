// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Sem hierarquia: cada rota lista explicitamente os perfis aceitos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Collaborator,
    Admin,
    SuperAdmin,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    // Nulo apenas para SUPER_ADMIN
    #[serde(rename = "restauranteId")]
    pub tenant_id: Option<Uuid>,
    pub active: bool,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados para inserir um usuário (senha já em hash).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
    pub approved: bool,
}

/// Identidade da sessão, extraída do token.
///
/// O restaurante é fixado no login e não é relido do banco a cada requisição.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub role: Role,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Option<Uuid>,
}

// Dados para registro de um novo colaborador
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[validate(email(message = "email_invalido"))]
    #[schema(example = "maria@restaurante.com")]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "username_invalido"))]
    #[schema(example = "maria")]
    pub username: String,
    #[validate(length(min = 6, message = "senha_curta"))]
    pub password: String,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Uuid,
}

// Dados para login: aceita e-mail ou nome de usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    #[schema(example = "maria")]
    pub login: String,
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    pub password: String,
}

// Criação de usuário por um administrador (já nasce aprovado)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "campo_obrigatorio"))]
    pub name: String,
    #[validate(email(message = "email_invalido"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "username_invalido"))]
    pub username: String,
    #[validate(length(min = 6, message = "senha_curta"))]
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Collaborator
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role,
    #[serde(rename = "restauranteId")]
    pub tenant_id: Option<Uuid>,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
