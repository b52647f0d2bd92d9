// src/db/quick_list_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quick_lists::{NewQuickListItem, QuickList, QuickListDetail, QuickListItem, QuickListStatus},
};

#[async_trait]
pub trait QuickListRepository: Send + Sync {
    async fn create(
        &self,
        tenant_id: Uuid,
        author_id: Uuid,
        name: &str,
        items: &[NewQuickListItem],
    ) -> Result<QuickListDetail, AppError>;

    async fn list(&self, tenant: Option<Uuid>, author: Option<Uuid>) -> Result<Vec<QuickList>, AppError>;

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<QuickListDetail>, AppError>;

    // Operações de item recebem uma lista já verificada pelo serviço
    async fn add_item(&self, quick_list_id: Uuid, item: &NewQuickListItem) -> Result<QuickListItem, AppError>;

    async fn discard_item(&self, quick_list_id: Uuid, item_id: Uuid) -> Result<Option<QuickListItem>, AppError>;

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: QuickListStatus,
        to: QuickListStatus,
    ) -> Result<Option<QuickList>, AppError>;
}

#[derive(Clone)]
pub struct PgQuickListRepository {
    pool: PgPool,
}

impl PgQuickListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuickListRepository for PgQuickListRepository {
    async fn create(
        &self,
        tenant_id: Uuid,
        author_id: Uuid,
        name: &str,
        items: &[NewQuickListItem],
    ) -> Result<QuickListDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let quick_list = sqlx::query_as::<_, QuickList>(
            r#"
            INSERT INTO quick_lists (tenant_id, author_id, name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(author_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, QuickListItem>(
                r#"
                INSERT INTO quick_list_items (quick_list_id, item_id, description, quantity)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(quick_list.id)
            .bind(item.item_id)
            .bind(&item.description)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;

        Ok(QuickListDetail { quick_list, items: created })
    }

    async fn list(&self, tenant: Option<Uuid>, author: Option<Uuid>) -> Result<Vec<QuickList>, AppError> {
        let lists = sqlx::query_as::<_, QuickList>(
            r#"
            SELECT * FROM quick_lists
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
              AND ($2::uuid IS NULL OR author_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant)
        .bind(author)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<QuickListDetail>, AppError> {
        let quick_list = sqlx::query_as::<_, QuickList>(
            "SELECT * FROM quick_lists WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?;

        let Some(quick_list) = quick_list else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, QuickListItem>(
            "SELECT * FROM quick_list_items WHERE quick_list_id = $1 ORDER BY created_at, id",
        )
        .bind(quick_list.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuickListDetail { quick_list, items }))
    }

    async fn add_item(&self, quick_list_id: Uuid, item: &NewQuickListItem) -> Result<QuickListItem, AppError> {
        let row = sqlx::query_as::<_, QuickListItem>(
            r#"
            INSERT INTO quick_list_items (quick_list_id, item_id, description, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(quick_list_id)
        .bind(item.item_id)
        .bind(&item.description)
        .bind(item.quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn discard_item(&self, quick_list_id: Uuid, item_id: Uuid) -> Result<Option<QuickListItem>, AppError> {
        let row = sqlx::query_as::<_, QuickListItem>(
            r#"
            UPDATE quick_list_items SET discarded = TRUE
            WHERE id = $2 AND quick_list_id = $1
            RETURNING *
            "#,
        )
        .bind(quick_list_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: QuickListStatus,
        to: QuickListStatus,
    ) -> Result<Option<QuickList>, AppError> {
        let quick_list = sqlx::query_as::<_, QuickList>(
            r#"
            UPDATE quick_lists SET status = $3, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2) AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant)
        .bind(to)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quick_list)
    }
}
