// src/db/checklist_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::map_unique_violation,
    models::checklists::{Checklist, ChecklistDetail, ChecklistItem, ChecklistStatus, NewChecklistItem},
};

#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Cria o checklist e a fotografia dos itens numa única transação.
    /// Um segundo checklist para a mesma submissão falha com conflito.
    async fn create_from_snapshot(
        &self,
        tenant_id: Uuid,
        submission_id: Uuid,
        items: &[NewChecklistItem],
    ) -> Result<ChecklistDetail, AppError>;

    async fn find_by_submission(&self, submission_id: Uuid) -> Result<Option<Checklist>, AppError>;

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<ChecklistDetail>, AppError>;

    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<Checklist>, AppError>;

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: ChecklistStatus,
        to: ChecklistStatus,
        finalized_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Checklist>, AppError>;

    /// Inverte o `checked` do item (não é um "marcar como verdadeiro").
    async fn toggle_item(
        &self,
        checklist_id: Uuid,
        tenant: Option<Uuid>,
        item_id: Uuid,
    ) -> Result<Option<ChecklistItem>, AppError>;
}

#[derive(Clone)]
pub struct PgChecklistRepository {
    pool: PgPool,
}

impl PgChecklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChecklistRepository for PgChecklistRepository {
    async fn create_from_snapshot(
        &self,
        tenant_id: Uuid,
        submission_id: Uuid,
        items: &[NewChecklistItem],
    ) -> Result<ChecklistDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        // A constraint checklists_submission_id_key garante a unicidade mesmo em corrida
        let checklist = sqlx::query_as::<_, Checklist>(
            r#"
            INSERT INTO checklists (tenant_id, submission_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(submission_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, ChecklistItem>(
                r#"
                INSERT INTO checklist_items (checklist_id, item_id, requested_qty)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(checklist.id)
            .bind(item.item_id)
            .bind(item.requested_qty)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;

        Ok(ChecklistDetail { checklist, items: created })
    }

    async fn find_by_submission(&self, submission_id: Uuid) -> Result<Option<Checklist>, AppError> {
        let checklist = sqlx::query_as::<_, Checklist>(
            "SELECT * FROM checklists WHERE submission_id = $1",
        )
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(checklist)
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<ChecklistDetail>, AppError> {
        let checklist = sqlx::query_as::<_, Checklist>(
            "SELECT * FROM checklists WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?;

        let Some(checklist) = checklist else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ChecklistItem>(
            "SELECT * FROM checklist_items WHERE checklist_id = $1 ORDER BY id",
        )
        .bind(checklist.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ChecklistDetail { checklist, items }))
    }

    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<Checklist>, AppError> {
        let checklists = sqlx::query_as::<_, Checklist>(
            r#"
            SELECT * FROM checklists
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;
        Ok(checklists)
    }

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: ChecklistStatus,
        to: ChecklistStatus,
        finalized_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Checklist>, AppError> {
        let checklist = sqlx::query_as::<_, Checklist>(
            r#"
            UPDATE checklists
            SET status = $3, finalized_at = $4, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2) AND status = $5
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant)
        .bind(to)
        .bind(finalized_at)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?;
        Ok(checklist)
    }

    async fn toggle_item(
        &self,
        checklist_id: Uuid,
        tenant: Option<Uuid>,
        item_id: Uuid,
    ) -> Result<Option<ChecklistItem>, AppError> {
        let item = sqlx::query_as::<_, ChecklistItem>(
            r#"
            UPDATE checklist_items ci
            SET checked = NOT ci.checked
            FROM checklists c
            WHERE ci.id = $3
              AND ci.checklist_id = $1
              AND c.id = ci.checklist_id
              AND ($2::uuid IS NULL OR c.tenant_id = $2)
            RETURNING ci.*
            "#,
        )
        .bind(checklist_id)
        .bind(tenant)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }
}
