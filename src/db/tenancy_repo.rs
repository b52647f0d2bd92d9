// src/db/tenancy_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::tenancy::Tenant};

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Tenant, AppError>;
    async fn list(&self) -> Result<Vec<Tenant>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError>;
    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Tenant>, AppError>;
}

#[derive(Clone)]
pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn create(&self, name: &str) -> Result<Tenant, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(tenant)
    }

    async fn list(&self) -> Result<Vec<Tenant>, AppError> {
        let tenants = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tenants)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants SET active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }
}
