// src/services/submission_service.rs

use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        workflow::{settle, Workflow},
    },
    db::SubmissionRepository,
    middleware::tenancy::TenantScope,
    models::{
        auth::SessionUser,
        submissions::{
            CreateSubmissionPayload, DecideSubmissionPayload, NewOrder, OrderStatus, Submission,
            SubmissionAction, SubmissionDetail, SubmissionStatus,
        },
    },
    services::{
        author_scope,
        catalog_service::{ensure_positive, CatalogService},
        ensure_author,
        notification_service::NotificationService,
    },
};

#[derive(Clone)]
pub struct SubmissionService {
    submission_repo: Arc<dyn SubmissionRepository>,
    catalog_service: CatalogService,
    notification_service: NotificationService,
}

impl SubmissionService {
    pub fn new(
        submission_repo: Arc<dyn SubmissionRepository>,
        catalog_service: CatalogService,
        notification_service: NotificationService,
    ) -> Self {
        Self { submission_repo, catalog_service, notification_service }
    }

    pub async fn create(
        &self,
        user: &SessionUser,
        scope: TenantScope,
        payload: &CreateSubmissionPayload,
    ) -> Result<SubmissionDetail, AppError> {
        let tenant_id = scope.write_tenant()?;

        for order in &payload.orders {
            ensure_positive(order.requested_qty)?;
        }
        let item_ids: Vec<Uuid> = payload.orders.iter().map(|o| o.item_id).collect();
        self.catalog_service.ensure_active_items(tenant_id, &item_ids).await?;

        let orders: Vec<NewOrder> = payload
            .orders
            .iter()
            .map(|o| NewOrder { item_id: o.item_id, requested_qty: o.requested_qty })
            .collect();

        let detail = self
            .submission_repo
            .create(tenant_id, user.id, payload.notes.as_deref(), &orders)
            .await?;

        tracing::info!(
            submission_id = %detail.submission.id,
            orders = detail.orders.len(),
            "Submissão criada"
        );
        Ok(detail)
    }

    pub async fn list(&self, user: &SessionUser, scope: TenantScope) -> Result<Vec<Submission>, AppError> {
        self.submission_repo.list(scope.filter(), author_scope(user)).await
    }

    pub async fn get(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<SubmissionDetail, AppError> {
        let detail = self.fetch_owned(scope, id).await?;
        ensure_author(user, detail.submission.author_id)?;
        Ok(detail)
    }

    /// Aprova os pedidos listados e rejeita o resto; o status da submissão
    /// decorre de quantos foram aprovados.
    pub async fn decide(
        &self,
        scope: TenantScope,
        id: Uuid,
        payload: &DecideSubmissionPayload,
    ) -> Result<SubmissionDetail, AppError> {
        let detail = self.fetch_owned(scope, id).await?;

        let approved: HashSet<Uuid> = payload.approved_order_ids.iter().copied().collect();
        if approved
            .iter()
            .any(|order_id| !detail.orders.iter().any(|o| o.id == *order_id))
        {
            return Err(AppError::BadRequest("pedido_desconhecido"));
        }

        let action = SubmissionAction::from_decision(approved.len(), detail.orders.len());
        let next = detail.submission.status.apply(action)?;

        let order_statuses: Vec<(Uuid, OrderStatus)> = detail
            .orders
            .iter()
            .map(|o| {
                let status = if approved.contains(&o.id) {
                    OrderStatus::Aprovado
                } else {
                    OrderStatus::Rejeitado
                };
                (o.id, status)
            })
            .collect();

        let from = detail.submission.status;
        let written = self
            .submission_repo
            .apply_decision(id, scope.filter(), from, next, &order_statuses)
            .await?;
        let decided = settle(written, action, self.current_status(scope, id)).await?;

        tracing::info!(
            submission_id = %id,
            from = detail.submission.status.label(),
            to = next.label(),
            approved = approved.len(),
            "Submissão avaliada"
        );

        self.notification_service
            .notify(
                decided.submission.author_id,
                decided.submission.tenant_id,
                "notificacao_submissao",
                &[("status", next.label())],
            )
            .await;

        Ok(decided)
    }

    pub async fn archive(&self, scope: TenantScope, id: Uuid) -> Result<Submission, AppError> {
        let detail = self.fetch_owned(scope, id).await?;
        let from = detail.submission.status;
        let next = from.apply(SubmissionAction::Archive)?;

        let written = self.submission_repo.set_status(id, scope.filter(), from, next).await?;
        let submission = settle(written, SubmissionAction::Archive, self.current_status(scope, id)).await?;
        tracing::info!(submission_id = %id, "Submissão arquivada");
        Ok(submission)
    }

    async fn current_status(&self, scope: TenantScope, id: Uuid) -> Result<SubmissionStatus, AppError> {
        self.fetch_owned(scope, id).await.map(|detail| detail.submission.status)
    }

    pub(crate) async fn fetch_owned(&self, scope: TenantScope, id: Uuid) -> Result<SubmissionDetail, AppError> {
        self.submission_repo
            .find_by_id(id, scope.filter())
            .await?
            .ok_or(AppError::ResourceNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::{
        db::{CatalogRepository, MemoryStore, NotificationRepository, SubmissionRepository},
        models::{
            auth::Role,
            submissions::OrderPayload,
        },
        services::test_support::{scope_of, session},
    };

    struct Fixture {
        store: MemoryStore,
        service: SubmissionService,
        tenant_id: Uuid,
        items: Vec<Uuid>,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let service = SubmissionService::new(
            Arc::new(store.clone()),
            CatalogService::new(Arc::new(store.clone())),
            NotificationService::new(Arc::new(store.clone())),
        );
        let tenant_id = Uuid::new_v4();
        let mut items = Vec::new();
        for name in ["Arroz", "Feijão"] {
            items.push(CatalogRepository::create(&store, tenant_id, name, "kg").await.unwrap().id);
        }
        Fixture { store, service, tenant_id, items }
    }

    fn body(orders: &[(Uuid, i64)]) -> CreateSubmissionPayload {
        CreateSubmissionPayload {
            notes: None,
            orders: orders
                .iter()
                .map(|(item_id, qty)| OrderPayload { item_id: *item_id, requested_qty: Decimal::from(*qty) })
                .collect(),
        }
    }

    #[tokio::test]
    async fn partial_approval_sets_orders_independently() {
        let f = fixture().await;
        let author = session(Role::Collaborator, Some(f.tenant_id));
        let admin = session(Role::Admin, Some(f.tenant_id));

        let created = f
            .service
            .create(&author, scope_of(&author), &body(&[(f.items[0], 3), (f.items[1], 5)]))
            .await
            .unwrap();
        assert_eq!(created.submission.status, SubmissionStatus::Pendente);

        let first = created.orders[0].id;
        let decided = f
            .service
            .decide(scope_of(&admin), created.submission.id, &DecideSubmissionPayload { approved_order_ids: vec![first] })
            .await
            .unwrap();

        assert_eq!(decided.submission.status, SubmissionStatus::Parcial);
        for order in &decided.orders {
            let expected = if order.id == first { OrderStatus::Aprovado } else { OrderStatus::Rejeitado };
            assert_eq!(order.status, expected);
        }

        let notes = f.store.list_for_user(author.id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("PARCIAL"));
    }

    #[tokio::test]
    async fn decision_happens_once() {
        let f = fixture().await;
        let admin = session(Role::Admin, Some(f.tenant_id));
        let created = f.service.create(&admin, scope_of(&admin), &body(&[(f.items[0], 1)])).await.unwrap();
        let id = created.submission.id;

        f.service
            .decide(scope_of(&admin), id, &DecideSubmissionPayload { approved_order_ids: vec![] })
            .await
            .unwrap();
        let again = f
            .service
            .decide(scope_of(&admin), id, &DecideSubmissionPayload { approved_order_ids: vec![] })
            .await;
        assert!(matches!(again, Err(AppError::InvalidTransition { from: "REJEITADO", .. })));

        let archived = f.service.archive(scope_of(&admin), id).await.unwrap();
        assert_eq!(archived.status, SubmissionStatus::Arquivado);
    }

    #[tokio::test]
    async fn stale_decision_does_not_overwrite() {
        let f = fixture().await;
        let admin = session(Role::Admin, Some(f.tenant_id));
        let created = f.service.create(&admin, scope_of(&admin), &body(&[(f.items[0], 1)])).await.unwrap();
        let id = created.submission.id;
        let order_id = created.orders[0].id;

        f.service
            .decide(scope_of(&admin), id, &DecideSubmissionPayload { approved_order_ids: vec![order_id] })
            .await
            .unwrap();

        // Gravação de quem leu PENDENTE antes da primeira decisão
        let written = f
            .store
            .apply_decision(
                id,
                Some(f.tenant_id),
                SubmissionStatus::Pendente,
                SubmissionStatus::Rejeitado,
                &[(order_id, OrderStatus::Rejeitado)],
            )
            .await
            .unwrap();
        assert!(written.is_none());

        let current = f.service.fetch_owned(scope_of(&admin), id).await.unwrap();
        assert_eq!(current.submission.status, SubmissionStatus::Aprovado);
        assert_eq!(current.orders[0].status, OrderStatus::Aprovado);

        let stale = settle(written, SubmissionAction::RejectAll, f.service.current_status(scope_of(&admin), id)).await;
        assert!(matches!(stale, Err(AppError::InvalidTransition { from: "APROVADO", .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_decisions_only_one_wins() {
        let f = fixture().await;
        let admin = session(Role::Admin, Some(f.tenant_id));

        for _ in 0..200 {
            let created = f.service.create(&admin, scope_of(&admin), &body(&[(f.items[0], 1)])).await.unwrap();
            let id = created.submission.id;
            let approve_all = DecideSubmissionPayload { approved_order_ids: vec![created.orders[0].id] };
            let reject_all = DecideSubmissionPayload { approved_order_ids: vec![] };

            let (a, b) = (f.service.clone(), f.service.clone());
            let scope = scope_of(&admin);
            let first = tokio::spawn(async move { a.decide(scope, id, &approve_all).await });
            let second = tokio::spawn(async move { b.decide(scope, id, &reject_all).await });
            let results = [first.await.unwrap(), second.await.unwrap()];

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(results
                .iter()
                .any(|r| matches!(r, Err(AppError::InvalidTransition { .. }))));

            let winner = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
            let stored = f.service.fetch_owned(scope, id).await.unwrap();
            assert_eq!(stored.submission.status, winner.submission.status);
        }
    }

    #[tokio::test]
    async fn pending_submission_cannot_be_archived() {
        let f = fixture().await;
        let admin = session(Role::Admin, Some(f.tenant_id));
        let created = f.service.create(&admin, scope_of(&admin), &body(&[(f.items[0], 1)])).await.unwrap();

        let result = f.service.archive(scope_of(&admin), created.submission.id).await;
        assert!(matches!(result, Err(AppError::InvalidTransition { .. })));
        let unchanged = f.service.fetch_owned(scope_of(&admin), created.submission.id).await.unwrap();
        assert_eq!(unchanged.submission.status, SubmissionStatus::Pendente);
    }

    #[tokio::test]
    async fn invalid_orders_are_rejected() {
        let f = fixture().await;
        let author = session(Role::Collaborator, Some(f.tenant_id));

        let zero = f.service.create(&author, scope_of(&author), &body(&[(f.items[0], 0)])).await;
        assert!(matches!(zero, Err(AppError::BadRequest("quantidade_invalida"))));

        let unknown = f.service.create(&author, scope_of(&author), &body(&[(Uuid::new_v4(), 1)])).await;
        assert!(matches!(unknown, Err(AppError::BadRequest("item_invalido"))));
    }

    #[tokio::test]
    async fn unknown_order_id_in_decision_is_rejected() {
        let f = fixture().await;
        let admin = session(Role::Admin, Some(f.tenant_id));
        let created = f.service.create(&admin, scope_of(&admin), &body(&[(f.items[0], 1)])).await.unwrap();

        let result = f
            .service
            .decide(
                scope_of(&admin),
                created.submission.id,
                &DecideSubmissionPayload { approved_order_ids: vec![Uuid::new_v4()] },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest("pedido_desconhecido"))));
    }

    #[tokio::test]
    async fn collaborators_see_only_their_own() {
        let f = fixture().await;
        let maria = session(Role::Collaborator, Some(f.tenant_id));
        let joao = session(Role::Collaborator, Some(f.tenant_id));
        let admin = session(Role::Admin, Some(f.tenant_id));
        let other_admin = session(Role::Admin, Some(Uuid::new_v4()));

        let created = f.service.create(&maria, scope_of(&maria), &body(&[(f.items[0], 2)])).await.unwrap();
        let id = created.submission.id;

        assert!(matches!(f.service.get(&joao, scope_of(&joao), id).await, Err(AppError::ResourceNotFound)));
        assert!(f.service.list(&joao, scope_of(&joao)).await.unwrap().is_empty());
        assert_eq!(f.service.list(&admin, scope_of(&admin)).await.unwrap().len(), 1);
        assert!(matches!(
            f.service.get(&other_admin, scope_of(&other_admin), id).await,
            Err(AppError::ResourceNotFound)
        ));
        f.service.get(&maria, scope_of(&maria), id).await.unwrap();
    }
}
