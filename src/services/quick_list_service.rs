// src/services/quick_list_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        workflow::{settle, Workflow},
    },
    db::QuickListRepository,
    middleware::tenancy::TenantScope,
    models::{
        auth::SessionUser,
        quick_lists::{
            CreateQuickListPayload, NewQuickListItem, QuickList, QuickListAction, QuickListDetail, QuickListItem,
            QuickListItemPayload, QuickListStatus,
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
pub struct QuickListService {
    quick_list_repo: Arc<dyn QuickListRepository>,
    catalog_service: CatalogService,
    notification_service: NotificationService,
}

impl QuickListService {
    pub fn new(
        quick_list_repo: Arc<dyn QuickListRepository>,
        catalog_service: CatalogService,
        notification_service: NotificationService,
    ) -> Self {
        Self { quick_list_repo, catalog_service, notification_service }
    }

    pub async fn create(
        &self,
        user: &SessionUser,
        scope: TenantScope,
        payload: &CreateQuickListPayload,
    ) -> Result<QuickListDetail, AppError> {
        let tenant_id = scope.write_tenant()?;
        let items = self.checked_items(tenant_id, &payload.items).await?;

        let detail = self
            .quick_list_repo
            .create(tenant_id, user.id, &payload.name, &items)
            .await?;
        tracing::info!(quick_list_id = %detail.quick_list.id, "Lista rápida criada");
        Ok(detail)
    }

    pub async fn list(&self, user: &SessionUser, scope: TenantScope) -> Result<Vec<QuickList>, AppError> {
        self.quick_list_repo.list(scope.filter(), author_scope(user)).await
    }

    pub async fn get(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<QuickListDetail, AppError> {
        let detail = self
            .quick_list_repo
            .find_by_id(id, scope.filter())
            .await?
            .ok_or(AppError::ResourceNotFound)?;
        ensure_author(user, detail.quick_list.author_id)?;
        Ok(detail)
    }

    /// Itens só entram enquanto a lista é rascunho.
    pub async fn add_item(
        &self,
        user: &SessionUser,
        scope: TenantScope,
        id: Uuid,
        payload: &QuickListItemPayload,
    ) -> Result<QuickListItem, AppError> {
        let detail = self.get(user, scope, id).await?;
        if !detail.quick_list.status.accepts_new_items() {
            return Err(AppError::BadRequest("lista_nao_editavel"));
        }

        let mut items = self
            .checked_items(detail.quick_list.tenant_id, std::slice::from_ref(payload))
            .await?;
        let item = items.pop().ok_or(AppError::BadRequest("item_invalido"))?;

        self.quick_list_repo.add_item(id, &item).await
    }

    pub async fn discard_item(
        &self,
        user: &SessionUser,
        scope: TenantScope,
        id: Uuid,
        item_id: Uuid,
    ) -> Result<QuickListItem, AppError> {
        let detail = self.get(user, scope, id).await?;
        if !detail.quick_list.status.allows_discard() {
            return Err(AppError::BadRequest("lista_nao_editavel"));
        }

        self.quick_list_repo
            .discard_item(id, item_id)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }

    pub async fn submit(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<QuickList, AppError> {
        let current = self.get(user, scope, id).await?.quick_list;
        self.transition(scope, current, QuickListAction::Submit).await
    }

    pub async fn approve(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<QuickList, AppError> {
        self.decide(user, scope, id, QuickListAction::Approve).await
    }

    pub async fn reject(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<QuickList, AppError> {
        self.decide(user, scope, id, QuickListAction::Reject).await
    }

    pub async fn archive(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<QuickList, AppError> {
        let current = self.get(user, scope, id).await?.quick_list;
        self.transition(scope, current, QuickListAction::Archive).await
    }

    async fn decide(
        &self,
        user: &SessionUser,
        scope: TenantScope,
        id: Uuid,
        action: QuickListAction,
    ) -> Result<QuickList, AppError> {
        let current = self.get(user, scope, id).await?.quick_list;
        let decided = self.transition(scope, current, action).await?;

        self.notification_service
            .notify(
                decided.author_id,
                decided.tenant_id,
                "notificacao_lista_rapida",
                &[("name", decided.name.as_str()), ("status", decided.status.label())],
            )
            .await;

        Ok(decided)
    }

    async fn transition(
        &self,
        scope: TenantScope,
        current: QuickList,
        action: QuickListAction,
    ) -> Result<QuickList, AppError> {
        let next: QuickListStatus = current.status.apply(action)?;

        let written = self
            .quick_list_repo
            .set_status(current.id, scope.filter(), current.status, next)
            .await?;
        let updated = settle(written, action, async {
            self.quick_list_repo
                .find_by_id(current.id, scope.filter())
                .await
                .and_then(|found| found.map(|detail| detail.quick_list.status).ok_or(AppError::ResourceNotFound))
        })
        .await?;

        tracing::info!(
            quick_list_id = %current.id,
            from = current.status.label(),
            to = next.label(),
            "Lista rápida atualizada"
        );
        Ok(updated)
    }

    /// Quantidade positiva e, quando há vínculo com o catálogo, item ativo do restaurante.
    async fn checked_items(
        &self,
        tenant_id: Uuid,
        payload: &[QuickListItemPayload],
    ) -> Result<Vec<NewQuickListItem>, AppError> {
        for item in payload {
            ensure_positive(item.quantity)?;
        }
        let linked: Vec<Uuid> = payload.iter().filter_map(|item| item.item_id).collect();
        self.catalog_service.ensure_active_items(tenant_id, &linked).await?;

        Ok(payload
            .iter()
            .map(|item| NewQuickListItem {
                item_id: item.item_id,
                description: item.description.clone(),
                quantity: item.quantity,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::{
        db::{MemoryStore, NotificationRepository},
        models::auth::Role,
        services::test_support::{scope_of, session},
    };

    fn service(store: &MemoryStore) -> QuickListService {
        QuickListService::new(
            Arc::new(store.clone()),
            CatalogService::new(Arc::new(store.clone())),
            NotificationService::new(Arc::new(store.clone())),
        )
    }

    fn free_item(description: &str) -> QuickListItemPayload {
        QuickListItemPayload { item_id: None, description: description.into(), quantity: Decimal::from(2) }
    }

    fn body() -> CreateQuickListPayload {
        CreateQuickListPayload { name: "Feira de sábado".into(), items: vec![free_item("Tomate")] }
    }

    #[tokio::test]
    async fn rejected_list_cannot_be_resubmitted() {
        let store = MemoryStore::new();
        let lists = service(&store);
        let tenant_id = Uuid::new_v4();
        let author = session(Role::Collaborator, Some(tenant_id));
        let admin = session(Role::Admin, Some(tenant_id));

        let id = lists.create(&author, scope_of(&author), &body()).await.unwrap().quick_list.id;
        assert_eq!(lists.submit(&author, scope_of(&author), id).await.unwrap().status, QuickListStatus::Pendente);
        assert_eq!(lists.reject(&admin, scope_of(&admin), id).await.unwrap().status, QuickListStatus::Rejeitado);

        let again = lists.submit(&author, scope_of(&author), id).await;
        assert!(matches!(again, Err(AppError::InvalidTransition { from: "REJEITADO", .. })));
        let current = lists.get(&author, scope_of(&author), id).await.unwrap();
        assert_eq!(current.quick_list.status, QuickListStatus::Rejeitado);

        let notes = store.list_for_user(author.id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("Feira de sábado"));
    }

    #[tokio::test]
    async fn items_only_added_while_draft() {
        let store = MemoryStore::new();
        let lists = service(&store);
        let tenant_id = Uuid::new_v4();
        let author = session(Role::Collaborator, Some(tenant_id));

        let detail = lists.create(&author, scope_of(&author), &body()).await.unwrap();
        let id = detail.quick_list.id;
        lists.add_item(&author, scope_of(&author), id, &free_item("Cebola")).await.unwrap();
        lists.submit(&author, scope_of(&author), id).await.unwrap();

        let late = lists.add_item(&author, scope_of(&author), id, &free_item("Alho")).await;
        assert!(matches!(late, Err(AppError::BadRequest("lista_nao_editavel"))));

        // Descartar continua permitido enquanto não arquivada
        let discarded = lists
            .discard_item(&author, scope_of(&author), id, detail.items[0].id)
            .await
            .unwrap();
        assert!(discarded.discarded);
        assert_eq!(lists.get(&author, scope_of(&author), id).await.unwrap().items.len(), 2);
    }

    #[tokio::test]
    async fn catalog_links_must_belong_to_restaurant() {
        let store = MemoryStore::new();
        let lists = service(&store);
        let author = session(Role::Collaborator, Some(Uuid::new_v4()));

        let mut payload = body();
        payload.items.push(QuickListItemPayload {
            item_id: Some(Uuid::new_v4()),
            description: "Óleo".into(),
            quantity: Decimal::ONE,
        });
        let result = lists.create(&author, scope_of(&author), &payload).await;
        assert!(matches!(result, Err(AppError::BadRequest("item_invalido"))));
    }

    #[tokio::test]
    async fn other_collaborators_and_tenants_get_not_found() {
        let store = MemoryStore::new();
        let lists = service(&store);
        let tenant_id = Uuid::new_v4();
        let author = session(Role::Collaborator, Some(tenant_id));
        let colleague = session(Role::Collaborator, Some(tenant_id));
        let outsider = session(Role::Admin, Some(Uuid::new_v4()));

        let id = lists.create(&author, scope_of(&author), &body()).await.unwrap().quick_list.id;

        assert!(matches!(lists.submit(&colleague, scope_of(&colleague), id).await, Err(AppError::ResourceNotFound)));
        assert!(matches!(lists.approve(&outsider, scope_of(&outsider), id).await, Err(AppError::ResourceNotFound)));
        assert!(lists.list(&colleague, scope_of(&colleague)).await.unwrap().is_empty());
    }
}
