// src/db/catalog_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::Item};

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create(&self, tenant_id: Uuid, name: &str, unit: &str) -> Result<Item, AppError>;
    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<Item>, AppError>;
    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<Item>, AppError>;
    /// Itens ativos do restaurante entre os `ids` informados.
    async fn find_active_in(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Item>, AppError>;
    async fn set_active(&self, id: Uuid, tenant: Option<Uuid>, active: bool) -> Result<Option<Item>, AppError>;
}

#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn create(&self, tenant_id: Uuid, name: &str, unit: &str) -> Result<Item, AppError> {
        let item = sqlx::query_as::<_, Item>(
            "INSERT INTO items (tenant_id, name, unit) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(tenant_id)
        .bind(name)
        .bind(unit)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn find_active_in(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE tenant_id = $1 AND active AND id = ANY($2)",
        )
        .bind(tenant_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn set_active(&self, id: Uuid, tenant: Option<Uuid>, active: bool) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET active = $3
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }
}
