// src/services/checklist_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        workflow::{settle, Workflow},
    },
    db::{ChecklistRepository, SubmissionRepository},
    middleware::tenancy::TenantScope,
    models::checklists::{
        snapshot_approved_orders, Checklist, ChecklistAction, ChecklistDetail, ChecklistItem, ChecklistStatus,
    },
};

#[derive(Clone)]
pub struct ChecklistService {
    checklist_repo: Arc<dyn ChecklistRepository>,
    submission_repo: Arc<dyn SubmissionRepository>,
}

impl ChecklistService {
    pub fn new(checklist_repo: Arc<dyn ChecklistRepository>, submission_repo: Arc<dyn SubmissionRepository>) -> Self {
        Self { checklist_repo, submission_repo }
    }

    /// LÓGICA DE NEGÓCIO: gera o checklist de conferência a partir dos pedidos
    /// aprovados da submissão. Os itens são uma cópia; mudanças posteriores nos
    /// pedidos não se propagam.
    pub async fn create_from_submission(
        &self,
        scope: TenantScope,
        submission_id: Uuid,
    ) -> Result<ChecklistDetail, AppError> {
        let submission = self
            .submission_repo
            .find_by_id(submission_id, scope.filter())
            .await?
            .ok_or(AppError::ResourceNotFound)?;

        if !submission.submission.status.allows_checklist() {
            return Err(AppError::BadRequest("submissao_nao_aprovada"));
        }

        if self.checklist_repo.find_by_submission(submission_id).await?.is_some() {
            return Err(AppError::ChecklistAlreadyExists);
        }

        let items = snapshot_approved_orders(&submission);
        // Checklist e itens na mesma transação; a constraint única cobre corridas
        let detail = self
            .checklist_repo
            .create_from_snapshot(submission.submission.tenant_id, submission_id, &items)
            .await?;

        tracing::info!(
            checklist_id = %detail.checklist.id,
            %submission_id,
            items = detail.items.len(),
            "Checklist criado"
        );
        Ok(detail)
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<Checklist>, AppError> {
        self.checklist_repo.list(scope.filter()).await
    }

    pub async fn get(&self, scope: TenantScope, id: Uuid) -> Result<ChecklistDetail, AppError> {
        self.checklist_repo
            .find_by_id(id, scope.filter())
            .await?
            .ok_or(AppError::ResourceNotFound)
    }

    pub async fn finalize(&self, scope: TenantScope, id: Uuid) -> Result<Checklist, AppError> {
        self.transition(scope, id, ChecklistAction::Finalize).await
    }

    pub async fn reopen(&self, scope: TenantScope, id: Uuid) -> Result<Checklist, AppError> {
        self.transition(scope, id, ChecklistAction::Reopen).await
    }

    /// `marcarItem`: inverte o `checked`, em qualquer status do checklist.
    pub async fn toggle_item(&self, scope: TenantScope, id: Uuid, item_id: Uuid) -> Result<ChecklistItem, AppError> {
        self.checklist_repo
            .toggle_item(id, scope.filter(), item_id)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }

    async fn transition(&self, scope: TenantScope, id: Uuid, action: ChecklistAction) -> Result<Checklist, AppError> {
        let current = self.get(scope, id).await?.checklist;
        let next = current.status.apply(action)?;

        let finalized_at = match next {
            ChecklistStatus::Finalizado => Some(Utc::now()),
            ChecklistStatus::Aberto => None,
        };

        let written = self
            .checklist_repo
            .set_status(id, scope.filter(), current.status, next, finalized_at)
            .await?;
        let checklist = settle(written, action, async {
            self.get(scope, id).await.map(|detail| detail.checklist.status)
        })
        .await?;

        tracing::info!(checklist_id = %id, from = current.status.label(), to = next.label(), "Checklist atualizado");
        Ok(checklist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::{
        db::MemoryStore,
        models::{
            auth::Role,
            checklists::NewChecklistItem,
            submissions::{NewOrder, OrderStatus, SubmissionStatus},
        },
        services::test_support::{scope_of, session},
    };

    fn service(store: &MemoryStore) -> ChecklistService {
        ChecklistService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    /// Submissão com os pedidos (item, qtd, aprovado?) já decidida no status dado.
    async fn decided_submission(
        store: &MemoryStore,
        tenant_id: Uuid,
        orders: &[(Uuid, i64, bool)],
        status: SubmissionStatus,
    ) -> Uuid {
        let new_orders: Vec<NewOrder> = orders
            .iter()
            .map(|(item_id, qty, _)| NewOrder { item_id: *item_id, requested_qty: Decimal::from(*qty) })
            .collect();
        let created = SubmissionRepository::create(store, tenant_id, Uuid::new_v4(), None, &new_orders)
            .await
            .unwrap();
        let statuses: Vec<(Uuid, OrderStatus)> = created
            .orders
            .iter()
            .zip(orders)
            .map(|(order, (_, _, approved))| {
                (order.id, if *approved { OrderStatus::Aprovado } else { OrderStatus::Rejeitado })
            })
            .collect();
        store
            .apply_decision(created.submission.id, Some(tenant_id), SubmissionStatus::Pendente, status, &statuses)
            .await
            .unwrap();
        created.submission.id
    }

    #[tokio::test]
    async fn snapshot_keeps_only_approved_orders() {
        let store = MemoryStore::new();
        let checklists = service(&store);
        let tenant_id = Uuid::new_v4();
        let admin = session(Role::Admin, Some(tenant_id));
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let submission_id =
            decided_submission(&store, tenant_id, &[(a, 3, true), (b, 5, true), (c, 7, false)], SubmissionStatus::Parcial)
                .await;

        let detail = checklists.create_from_submission(scope_of(&admin), submission_id).await.unwrap();
        assert_eq!(detail.checklist.status, ChecklistStatus::Aberto);
        assert!(detail.items.iter().all(|item| !item.checked));

        let mut snapshot: Vec<NewChecklistItem> = detail
            .items
            .iter()
            .map(|item| NewChecklistItem { item_id: item.item_id, requested_qty: item.requested_qty })
            .collect();
        snapshot.sort_by_key(|item| item.requested_qty);
        assert_eq!(
            snapshot,
            vec![
                NewChecklistItem { item_id: a, requested_qty: Decimal::from(3) },
                NewChecklistItem { item_id: b, requested_qty: Decimal::from(5) },
            ]
        );
    }

    #[tokio::test]
    async fn only_approved_submissions_and_only_once() {
        let store = MemoryStore::new();
        let checklists = service(&store);
        let tenant_id = Uuid::new_v4();
        let admin = session(Role::Admin, Some(tenant_id));

        let rejected =
            decided_submission(&store, tenant_id, &[(Uuid::new_v4(), 1, false)], SubmissionStatus::Rejeitado).await;
        assert!(matches!(
            checklists.create_from_submission(scope_of(&admin), rejected).await,
            Err(AppError::BadRequest("submissao_nao_aprovada"))
        ));

        let approved =
            decided_submission(&store, tenant_id, &[(Uuid::new_v4(), 1, true)], SubmissionStatus::Aprovado).await;
        let first = checklists.create_from_submission(scope_of(&admin), approved).await.unwrap();
        assert!(matches!(
            checklists.create_from_submission(scope_of(&admin), approved).await,
            Err(AppError::ChecklistAlreadyExists)
        ));
        assert_eq!(checklists.list(scope_of(&admin)).await.unwrap().len(), 1);
        assert_eq!(checklists.get(scope_of(&admin), first.checklist.id).await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn finalize_and_reopen_manage_timestamp() {
        let store = MemoryStore::new();
        let checklists = service(&store);
        let tenant_id = Uuid::new_v4();
        let admin = session(Role::Admin, Some(tenant_id));
        let submission_id =
            decided_submission(&store, tenant_id, &[(Uuid::new_v4(), 2, true)], SubmissionStatus::Aprovado).await;
        let id = checklists.create_from_submission(scope_of(&admin), submission_id).await.unwrap().checklist.id;

        let done = checklists.finalize(scope_of(&admin), id).await.unwrap();
        assert_eq!(done.status, ChecklistStatus::Finalizado);
        assert!(done.finalized_at.is_some());
        assert!(matches!(checklists.finalize(scope_of(&admin), id).await, Err(AppError::InvalidTransition { .. })));

        let reopened = checklists.reopen(scope_of(&admin), id).await.unwrap();
        assert_eq!(reopened.status, ChecklistStatus::Aberto);
        assert!(reopened.finalized_at.is_none());
    }

    #[tokio::test]
    async fn toggle_twice_restores_and_respects_tenant() {
        let store = MemoryStore::new();
        let checklists = service(&store);
        let tenant_id = Uuid::new_v4();
        let admin = session(Role::Admin, Some(tenant_id));
        let outsider = session(Role::Admin, Some(Uuid::new_v4()));
        let submission_id =
            decided_submission(&store, tenant_id, &[(Uuid::new_v4(), 2, true)], SubmissionStatus::Aprovado).await;
        let detail = checklists.create_from_submission(scope_of(&admin), submission_id).await.unwrap();
        let (id, item_id) = (detail.checklist.id, detail.items[0].id);

        assert!(checklists.toggle_item(scope_of(&admin), id, item_id).await.unwrap().checked);
        checklists.finalize(scope_of(&admin), id).await.unwrap();
        assert!(!checklists.toggle_item(scope_of(&admin), id, item_id).await.unwrap().checked);

        assert!(matches!(
            checklists.toggle_item(scope_of(&outsider), id, item_id).await,
            Err(AppError::ResourceNotFound)
        ));
        assert!(matches!(checklists.get(scope_of(&outsider), id).await, Err(AppError::ResourceNotFound)));
    }
}
