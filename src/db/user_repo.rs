// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::map_unique_violation,
    models::auth::{NewUser, User},
};

/// Acesso à tabela `users`.
///
/// `tenant` é o filtro de restaurante: `Some` conjuga com a chave primária,
/// `None` só é passado no escopo de plataforma.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Busca por e-mail ou nome de usuário (e-mail tem precedência; o cadastro
    /// impede que um valor exista nas duas colunas em contas diferentes).
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<User>, AppError>;
    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<User>, AppError>;
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
    async fn update_flags(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        active: Option<bool>,
        approved: Option<bool>,
    ) -> Result<Option<User>, AppError>;
    async fn delete(&self, id: Uuid, tenant: Option<Uuid>) -> Result<bool, AppError>;
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE email = $1 OR username = $1
            ORDER BY (email = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // Violação de unicidade vira erro de conflito, conforme a constraint
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, username, password_hash, role, tenant_id, approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.tenant_id)
        .bind(user.approved)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    async fn update_flags(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        active: Option<bool>,
        approved: Option<bool>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET active = COALESCE($3, active),
                approved = COALESCE($4, approved),
                updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant)
        .bind(active)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid, tenant: Option<Uuid>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
