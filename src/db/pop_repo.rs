// src/db/pop_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pop::{PopExecution, PopExecutionStatus, PopTemplate, PopType},
};

#[async_trait]
pub trait PopRepository: Send + Sync {
    // =========================================================================
    //  MODELOS
    // =========================================================================

    async fn create_template(
        &self,
        tenant_id: Uuid,
        name: &str,
        pop_type: PopType,
        steps: &[String],
    ) -> Result<PopTemplate, AppError>;

    async fn list_templates(&self, tenant: Option<Uuid>, only_active: bool) -> Result<Vec<PopTemplate>, AppError>;

    async fn find_template(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<PopTemplate>, AppError>;

    async fn set_template_active(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        active: bool,
    ) -> Result<Option<PopTemplate>, AppError>;

    // =========================================================================
    //  EXECUÇÕES
    // =========================================================================

    async fn create_execution(
        &self,
        tenant_id: Uuid,
        template_id: Uuid,
        user_id: Uuid,
    ) -> Result<PopExecution, AppError>;

    async fn list_executions(&self, tenant: Option<Uuid>, user: Option<Uuid>) -> Result<Vec<PopExecution>, AppError>;

    async fn find_execution(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<PopExecution>, AppError>;

    async fn set_execution_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: PopExecutionStatus,
        to: PopExecutionStatus,
        finished_at: Option<DateTime<Utc>>,
    ) -> Result<Option<PopExecution>, AppError>;
}

#[derive(Clone)]
pub struct PgPopRepository {
    pool: PgPool,
}

impl PgPopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PopRepository for PgPopRepository {
    async fn create_template(
        &self,
        tenant_id: Uuid,
        name: &str,
        pop_type: PopType,
        steps: &[String],
    ) -> Result<PopTemplate, AppError> {
        let template = sqlx::query_as::<_, PopTemplate>(
            r#"
            INSERT INTO pop_templates (tenant_id, name, pop_type, steps)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(pop_type)
        .bind(steps)
        .fetch_one(&self.pool)
        .await?;
        Ok(template)
    }

    async fn list_templates(&self, tenant: Option<Uuid>, only_active: bool) -> Result<Vec<PopTemplate>, AppError> {
        let templates = sqlx::query_as::<_, PopTemplate>(
            r#"
            SELECT * FROM pop_templates
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
              AND (NOT $2 OR active)
            ORDER BY name ASC
            "#,
        )
        .bind(tenant)
        .bind(only_active)
        .fetch_all(&self.pool)
        .await?;
        Ok(templates)
    }

    async fn find_template(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<PopTemplate>, AppError> {
        let template = sqlx::query_as::<_, PopTemplate>(
            "SELECT * FROM pop_templates WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    async fn set_template_active(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        active: bool,
    ) -> Result<Option<PopTemplate>, AppError> {
        let template = sqlx::query_as::<_, PopTemplate>(
            r#"
            UPDATE pop_templates SET active = $3, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    async fn create_execution(
        &self,
        tenant_id: Uuid,
        template_id: Uuid,
        user_id: Uuid,
    ) -> Result<PopExecution, AppError> {
        let execution = sqlx::query_as::<_, PopExecution>(
            r#"
            INSERT INTO pop_executions (tenant_id, template_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(template_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(execution)
    }

    async fn list_executions(&self, tenant: Option<Uuid>, user: Option<Uuid>) -> Result<Vec<PopExecution>, AppError> {
        let executions = sqlx::query_as::<_, PopExecution>(
            r#"
            SELECT * FROM pop_executions
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY started_at DESC
            "#,
        )
        .bind(tenant)
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        Ok(executions)
    }

    async fn find_execution(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<PopExecution>, AppError> {
        let execution = sqlx::query_as::<_, PopExecution>(
            "SELECT * FROM pop_executions WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?;
        Ok(execution)
    }

    async fn set_execution_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: PopExecutionStatus,
        to: PopExecutionStatus,
        finished_at: Option<DateTime<Utc>>,
    ) -> Result<Option<PopExecution>, AppError> {
        let execution = sqlx::query_as::<_, PopExecution>(
            r#"
            UPDATE pop_executions SET status = $3, finished_at = $4
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2) AND status = $5
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant)
        .bind(to)
        .bind(finished_at)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?;
        Ok(execution)
    }
}
