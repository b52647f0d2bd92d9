// src/db/submission_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::submissions::{NewOrder, Order, OrderStatus, Submission, SubmissionDetail, SubmissionStatus},
};

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Cria a submissão e seus pedidos de forma atômica.
    async fn create(
        &self,
        tenant_id: Uuid,
        author_id: Uuid,
        notes: Option<&str>,
        orders: &[NewOrder],
    ) -> Result<SubmissionDetail, AppError>;

    async fn list(&self, tenant: Option<Uuid>, author: Option<Uuid>) -> Result<Vec<Submission>, AppError>;

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<SubmissionDetail>, AppError>;

    /// Grava o status de cada pedido e o da submissão numa única transação.
    /// Só grava se o status atual ainda for `from`; senão devolve `None`.
    async fn apply_decision(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: SubmissionStatus,
        to: SubmissionStatus,
        orders: &[(Uuid, OrderStatus)],
    ) -> Result<Option<SubmissionDetail>, AppError>;

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Option<Submission>, AppError>;
}

#[derive(Clone)]
pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn orders_of(&self, submission_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE submission_id = $1 ORDER BY id",
        )
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn create(
        &self,
        tenant_id: Uuid,
        author_id: Uuid,
        notes: Option<&str>,
        orders: &[NewOrder],
    ) -> Result<SubmissionDetail, AppError> {
        // 1. Inicia a transação: submissão e pedidos entram juntos ou nada entra
        let mut tx = self.pool.begin().await?;

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (tenant_id, author_id, notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(author_id)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        // 2. Pedidos
        let mut created = Vec::with_capacity(orders.len());
        for order in orders {
            let row = sqlx::query_as::<_, Order>(
                r#"
                INSERT INTO orders (submission_id, item_id, requested_qty)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(submission.id)
            .bind(order.item_id)
            .bind(order.requested_qty)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        // 3. Commit
        tx.commit().await?;

        Ok(SubmissionDetail { submission, orders: created })
    }

    async fn list(&self, tenant: Option<Uuid>, author: Option<Uuid>) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
              AND ($2::uuid IS NULL OR author_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant)
        .bind(author)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<SubmissionDetail>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)",
        )
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?;

        match submission {
            Some(submission) => {
                let orders = self.orders_of(submission.id).await?;
                Ok(Some(SubmissionDetail { submission, orders }))
            }
            None => Ok(None),
        }
    }

    async fn apply_decision(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: SubmissionStatus,
        to: SubmissionStatus,
        orders: &[(Uuid, OrderStatus)],
    ) -> Result<Option<SubmissionDetail>, AppError> {
        let mut tx = self.pool.begin().await?;

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions SET status = $3, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR tenant_id = $2) AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant)
        .bind(to)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await?;

        // Sumiu ou mudou de status; o drop da transação faz o rollback
        let Some(submission) = submission else {
            return Ok(None);
        };

        let mut updated = Vec::with_capacity(orders.len());
        for (order_id, order_status) in orders {
            let row = sqlx::query_as::<_, Order>(
                r#"
                UPDATE orders SET status = $3
                WHERE id = $1 AND submission_id = $2
                RETURNING *
                "#,
            )
            .bind(*order_id)
            .bind(submission.id)
            .bind(*order_status)
            .fetch_one(&mut *tx)
            .await?;
            updated.push(row);
        }

        tx.commit().await?;

        updated.sort_by_key(|order| order.id);
        Ok(Some(SubmissionDetail { submission, orders: updated }))
    }

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions SET status = $3, updated_at = NOW()
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
        Ok(submission)
    }
}
