// src/db/memory.rs

//! Armazenamento em memória com a mesma semântica dos repositórios Postgres.
//!
//! Usado quando `DATABASE_URL` não está definida (desenvolvimento) e pelos
//! testes. Cada operação segura o lock de escrita do início ao fim, o que dá a
//! mesma atomicidade das transações do Postgres.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CatalogRepository, ChecklistRepository, NotificationRepository, PopRepository,
        QuickListRepository, SubmissionRepository, TenantRepository, UserRepository,
    },
    models::{
        auth::{NewUser, User},
        catalog::Item,
        checklists::{Checklist, ChecklistDetail, ChecklistItem, ChecklistStatus, NewChecklistItem},
        notifications::Notification,
        pop::{PopExecution, PopExecutionStatus, PopTemplate, PopType},
        quick_lists::{NewQuickListItem, QuickList, QuickListDetail, QuickListItem, QuickListStatus},
        submissions::{NewOrder, Order, OrderStatus, Submission, SubmissionDetail, SubmissionStatus},
        tenancy::Tenant,
    },
};

#[derive(Debug, Default)]
struct Tables {
    tenants: Vec<Tenant>,
    users: Vec<User>,
    items: Vec<Item>,
    submissions: Vec<Submission>,
    orders: Vec<Order>,
    checklists: Vec<Checklist>,
    checklist_items: Vec<ChecklistItem>,
    quick_lists: Vec<QuickList>,
    quick_list_items: Vec<QuickListItem>,
    pop_templates: Vec<PopTemplate>,
    pop_executions: Vec<PopExecution>,
    notifications: Vec<Notification>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Mesmo predicado do `($n::uuid IS NULL OR tenant_id = $n)` das queries
fn in_scope(row_tenant: Uuid, tenant: Option<Uuid>) -> bool {
    tenant.is_none_or(|tenant_id| tenant_id == row_tenant)
}

fn submission_detail(tables: &Tables, submission: &Submission) -> SubmissionDetail {
    SubmissionDetail {
        submission: submission.clone(),
        orders: tables
            .orders
            .iter()
            .filter(|order| order.submission_id == submission.id)
            .cloned()
            .collect(),
    }
}

// =============================================================================
//  RESTAURANTES
// =============================================================================

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn create(&self, name: &str) -> Result<Tenant, AppError> {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn list(&self) -> Result<Vec<Tenant>, AppError> {
        let mut tenants = self.tables.read().await.tenants.clone();
        tenants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tenants)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tenants.iter().find(|t| t.id == id).cloned())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Tenant>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tenants.iter_mut().find(|t| t.id == id).map(|tenant| {
            tenant.active = active;
            tenant.updated_at = Utc::now();
            tenant.clone()
        }))
    }
}

// =============================================================================
//  USUÁRIOS
// =============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        let by_email = tables.users.iter().find(|u| u.email == login);
        Ok(by_email
            .or_else(|| tables.users.iter().find(|u| u.username == login))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id && tenant.is_none_or(|t| u.tenant_id == Some(t)))
            .cloned())
    }

    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| tenant.is_none_or(|t| u.tenant_id == Some(t)))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        // Equivalente às constraints users_email_key e users_username_key
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::UsernameAlreadyExists);
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            tenant_id: user.tenant_id,
            active: true,
            approved: user.approved,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_flags(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        active: Option<bool>,
        approved: Option<bool>,
    ) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|u| u.id == id && tenant.is_none_or(|t| u.tenant_id == Some(t)))
            .map(|user| {
                if let Some(active) = active {
                    user.active = active;
                }
                if let Some(approved) = approved {
                    user.approved = approved;
                }
                user.updated_at = Utc::now();
                user.clone()
            }))
    }

    async fn delete(&self, id: Uuid, tenant: Option<Uuid>) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables
            .users
            .retain(|u| !(u.id == id && tenant.is_none_or(|t| u.tenant_id == Some(t))));
        if tables.users.len() == before {
            return Ok(false);
        }

        // ON DELETE SET NULL / CASCADE
        for submission in tables.submissions.iter_mut().filter(|s| s.author_id == Some(id)) {
            submission.author_id = None;
        }
        for list in tables.quick_lists.iter_mut().filter(|l| l.author_id == Some(id)) {
            list.author_id = None;
        }
        for execution in tables.pop_executions.iter_mut().filter(|e| e.user_id == Some(id)) {
            execution.user_id = None;
        }
        tables.notifications.retain(|n| n.user_id != id);
        Ok(true)
    }
}

// =============================================================================
//  CATÁLOGO
// =============================================================================

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn create(&self, tenant_id: Uuid, name: &str, unit: &str) -> Result<Item, AppError> {
        let item = Item {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.to_string(),
            unit: unit.to_string(),
            active: true,
            created_at: Utc::now(),
        };
        self.tables.write().await.items.push(item.clone());
        Ok(item)
    }

    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<Item>, AppError> {
        let tables = self.tables.read().await;
        let mut items: Vec<Item> = tables
            .items
            .iter()
            .filter(|i| in_scope(i.tenant_id, tenant))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<Item>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .iter()
            .find(|i| i.id == id && in_scope(i.tenant_id, tenant))
            .cloned())
    }

    async fn find_active_in(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Item>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .iter()
            .filter(|i| i.tenant_id == tenant_id && i.active && ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn set_active(&self, id: Uuid, tenant: Option<Uuid>, active: bool) -> Result<Option<Item>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .items
            .iter_mut()
            .find(|i| i.id == id && in_scope(i.tenant_id, tenant))
            .map(|item| {
                item.active = active;
                item.clone()
            }))
    }
}

// =============================================================================
//  SUBMISSÕES
// =============================================================================

#[async_trait]
impl SubmissionRepository for MemoryStore {
    async fn create(
        &self,
        tenant_id: Uuid,
        author_id: Uuid,
        notes: Option<&str>,
        orders: &[NewOrder],
    ) -> Result<SubmissionDetail, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let submission = Submission {
            id: Uuid::new_v4(),
            tenant_id,
            author_id: Some(author_id),
            status: SubmissionStatus::Pendente,
            notes: notes.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        let created: Vec<Order> = orders
            .iter()
            .map(|order| Order {
                id: Uuid::new_v4(),
                submission_id: submission.id,
                item_id: order.item_id,
                requested_qty: order.requested_qty,
                status: OrderStatus::Pendente,
            })
            .collect();

        tables.submissions.push(submission.clone());
        tables.orders.extend(created.iter().cloned());

        Ok(SubmissionDetail { submission, orders: created })
    }

    async fn list(&self, tenant: Option<Uuid>, author: Option<Uuid>) -> Result<Vec<Submission>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .iter()
            .rev()
            .filter(|s| in_scope(s.tenant_id, tenant))
            .filter(|s| author.is_none_or(|a| s.author_id == Some(a)))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<SubmissionDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .iter()
            .find(|s| s.id == id && in_scope(s.tenant_id, tenant))
            .map(|submission| submission_detail(&tables, submission)))
    }

    async fn apply_decision(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: SubmissionStatus,
        to: SubmissionStatus,
        orders: &[(Uuid, OrderStatus)],
    ) -> Result<Option<SubmissionDetail>, AppError> {
        let mut tables = self.tables.write().await;

        let Some(position) = tables
            .submissions
            .iter()
            .position(|s| s.id == id && in_scope(s.tenant_id, tenant) && s.status == from)
        else {
            return Ok(None);
        };

        // Valida tudo antes de escrever, como o rollback faria
        if orders.iter().any(|(order_id, _)| {
            !tables
                .orders
                .iter()
                .any(|o| o.id == *order_id && o.submission_id == id)
        }) {
            return Err(AppError::ResourceNotFound);
        }

        for (order_id, order_status) in orders {
            if let Some(order) = tables.orders.iter_mut().find(|o| o.id == *order_id) {
                order.status = *order_status;
            }
        }

        let submission = &mut tables.submissions[position];
        submission.status = to;
        submission.updated_at = Utc::now();
        let submission = submission.clone();

        Ok(Some(submission_detail(&tables, &submission)))
    }

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<Option<Submission>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .submissions
            .iter_mut()
            .find(|s| s.id == id && in_scope(s.tenant_id, tenant) && s.status == from)
            .map(|submission| {
                submission.status = to;
                submission.updated_at = Utc::now();
                submission.clone()
            }))
    }
}

// =============================================================================
//  CHECKLISTS
// =============================================================================

#[async_trait]
impl ChecklistRepository for MemoryStore {
    async fn create_from_snapshot(
        &self,
        tenant_id: Uuid,
        submission_id: Uuid,
        items: &[NewChecklistItem],
    ) -> Result<ChecklistDetail, AppError> {
        let mut tables = self.tables.write().await;

        // Equivalente à constraint checklists_submission_id_key
        if tables.checklists.iter().any(|c| c.submission_id == submission_id) {
            return Err(AppError::ChecklistAlreadyExists);
        }

        let now = Utc::now();
        let checklist = Checklist {
            id: Uuid::new_v4(),
            tenant_id,
            submission_id,
            status: ChecklistStatus::Aberto,
            finalized_at: None,
            created_at: now,
            updated_at: now,
        };
        let created: Vec<ChecklistItem> = items
            .iter()
            .map(|item| ChecklistItem {
                id: Uuid::new_v4(),
                checklist_id: checklist.id,
                item_id: item.item_id,
                requested_qty: item.requested_qty,
                checked: false,
            })
            .collect();

        tables.checklists.push(checklist.clone());
        tables.checklist_items.extend(created.iter().cloned());

        Ok(ChecklistDetail { checklist, items: created })
    }

    async fn find_by_submission(&self, submission_id: Uuid) -> Result<Option<Checklist>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .checklists
            .iter()
            .find(|c| c.submission_id == submission_id)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<ChecklistDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .checklists
            .iter()
            .find(|c| c.id == id && in_scope(c.tenant_id, tenant))
            .map(|checklist| ChecklistDetail {
                checklist: checklist.clone(),
                items: tables
                    .checklist_items
                    .iter()
                    .filter(|item| item.checklist_id == checklist.id)
                    .cloned()
                    .collect(),
            }))
    }

    async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<Checklist>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .checklists
            .iter()
            .rev()
            .filter(|c| in_scope(c.tenant_id, tenant))
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: ChecklistStatus,
        to: ChecklistStatus,
        finalized_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Checklist>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .checklists
            .iter_mut()
            .find(|c| c.id == id && in_scope(c.tenant_id, tenant) && c.status == from)
            .map(|checklist| {
                checklist.status = to;
                checklist.finalized_at = finalized_at;
                checklist.updated_at = Utc::now();
                checklist.clone()
            }))
    }

    async fn toggle_item(
        &self,
        checklist_id: Uuid,
        tenant: Option<Uuid>,
        item_id: Uuid,
    ) -> Result<Option<ChecklistItem>, AppError> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .checklists
            .iter()
            .any(|c| c.id == checklist_id && in_scope(c.tenant_id, tenant));
        if !owned {
            return Ok(None);
        }

        Ok(tables
            .checklist_items
            .iter_mut()
            .find(|item| item.id == item_id && item.checklist_id == checklist_id)
            .map(|item| {
                item.checked = !item.checked;
                item.clone()
            }))
    }
}

// =============================================================================
//  LISTAS RÁPIDAS
// =============================================================================

fn new_quick_list_item(quick_list_id: Uuid, item: &NewQuickListItem) -> QuickListItem {
    QuickListItem {
        id: Uuid::new_v4(),
        quick_list_id,
        item_id: item.item_id,
        description: item.description.clone(),
        quantity: item.quantity,
        discarded: false,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl QuickListRepository for MemoryStore {
    async fn create(
        &self,
        tenant_id: Uuid,
        author_id: Uuid,
        name: &str,
        items: &[NewQuickListItem],
    ) -> Result<QuickListDetail, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let quick_list = QuickList {
            id: Uuid::new_v4(),
            tenant_id,
            author_id: Some(author_id),
            name: name.to_string(),
            status: QuickListStatus::Rascunho,
            created_at: now,
            updated_at: now,
        };
        let created: Vec<QuickListItem> = items
            .iter()
            .map(|item| new_quick_list_item(quick_list.id, item))
            .collect();

        tables.quick_lists.push(quick_list.clone());
        tables.quick_list_items.extend(created.iter().cloned());

        Ok(QuickListDetail { quick_list, items: created })
    }

    async fn list(&self, tenant: Option<Uuid>, author: Option<Uuid>) -> Result<Vec<QuickList>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .quick_lists
            .iter()
            .rev()
            .filter(|l| in_scope(l.tenant_id, tenant))
            .filter(|l| author.is_none_or(|a| l.author_id == Some(a)))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<QuickListDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .quick_lists
            .iter()
            .find(|l| l.id == id && in_scope(l.tenant_id, tenant))
            .map(|quick_list| QuickListDetail {
                quick_list: quick_list.clone(),
                items: tables
                    .quick_list_items
                    .iter()
                    .filter(|item| item.quick_list_id == quick_list.id)
                    .cloned()
                    .collect(),
            }))
    }

    async fn add_item(&self, quick_list_id: Uuid, item: &NewQuickListItem) -> Result<QuickListItem, AppError> {
        let created = new_quick_list_item(quick_list_id, item);
        self.tables.write().await.quick_list_items.push(created.clone());
        Ok(created)
    }

    async fn discard_item(&self, quick_list_id: Uuid, item_id: Uuid) -> Result<Option<QuickListItem>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .quick_list_items
            .iter_mut()
            .find(|item| item.id == item_id && item.quick_list_id == quick_list_id)
            .map(|item| {
                item.discarded = true;
                item.clone()
            }))
    }

    async fn set_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: QuickListStatus,
        to: QuickListStatus,
    ) -> Result<Option<QuickList>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .quick_lists
            .iter_mut()
            .find(|l| l.id == id && in_scope(l.tenant_id, tenant) && l.status == from)
            .map(|quick_list| {
                quick_list.status = to;
                quick_list.updated_at = Utc::now();
                quick_list.clone()
            }))
    }
}

// =============================================================================
//  POP
// =============================================================================

#[async_trait]
impl PopRepository for MemoryStore {
    async fn create_template(
        &self,
        tenant_id: Uuid,
        name: &str,
        pop_type: PopType,
        steps: &[String],
    ) -> Result<PopTemplate, AppError> {
        let now = Utc::now();
        let template = PopTemplate {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.to_string(),
            pop_type,
            steps: steps.to_vec(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.pop_templates.push(template.clone());
        Ok(template)
    }

    async fn list_templates(&self, tenant: Option<Uuid>, only_active: bool) -> Result<Vec<PopTemplate>, AppError> {
        let tables = self.tables.read().await;
        let mut templates: Vec<PopTemplate> = tables
            .pop_templates
            .iter()
            .filter(|t| in_scope(t.tenant_id, tenant) && (!only_active || t.active))
            .cloned()
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn find_template(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<PopTemplate>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pop_templates
            .iter()
            .find(|t| t.id == id && in_scope(t.tenant_id, tenant))
            .cloned())
    }

    async fn set_template_active(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        active: bool,
    ) -> Result<Option<PopTemplate>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .pop_templates
            .iter_mut()
            .find(|t| t.id == id && in_scope(t.tenant_id, tenant))
            .map(|template| {
                template.active = active;
                template.updated_at = Utc::now();
                template.clone()
            }))
    }

    async fn create_execution(
        &self,
        tenant_id: Uuid,
        template_id: Uuid,
        user_id: Uuid,
    ) -> Result<PopExecution, AppError> {
        let execution = PopExecution {
            id: Uuid::new_v4(),
            tenant_id,
            template_id,
            user_id: Some(user_id),
            status: PopExecutionStatus::EmAndamento,
            started_at: Utc::now(),
            finished_at: None,
        };
        self.tables.write().await.pop_executions.push(execution.clone());
        Ok(execution)
    }

    async fn list_executions(&self, tenant: Option<Uuid>, user: Option<Uuid>) -> Result<Vec<PopExecution>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pop_executions
            .iter()
            .rev()
            .filter(|e| in_scope(e.tenant_id, tenant))
            .filter(|e| user.is_none_or(|u| e.user_id == Some(u)))
            .cloned()
            .collect())
    }

    async fn find_execution(&self, id: Uuid, tenant: Option<Uuid>) -> Result<Option<PopExecution>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pop_executions
            .iter()
            .find(|e| e.id == id && in_scope(e.tenant_id, tenant))
            .cloned())
    }

    async fn set_execution_status(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
        from: PopExecutionStatus,
        to: PopExecutionStatus,
        finished_at: Option<DateTime<Utc>>,
    ) -> Result<Option<PopExecution>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .pop_executions
            .iter_mut()
            .find(|e| e.id == id && in_scope(e.tenant_id, tenant) && e.status == from)
            .map(|execution| {
                execution.status = to;
                execution.finished_at = finished_at;
                execution.clone()
            }))
    }
}

// =============================================================================
//  NOTIFICAÇÕES
// =============================================================================

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, user_id: Uuid, tenant_id: Option<Uuid>, message: &str) -> Result<Notification, AppError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            tenant_id,
            user_id,
            message: message.to_string(),
            read: false,
            created_at: Utc::now(),
        };
        self.tables.write().await.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .map(|notification| {
                notification.read = true;
                notification.clone()
            }))
    }
}
