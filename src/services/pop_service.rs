// src/services/pop_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        workflow::{settle, Workflow},
    },
    db::PopRepository,
    middleware::tenancy::TenantScope,
    models::{
        auth::{Role, SessionUser},
        pop::{CreatePopTemplatePayload, PopExecution, PopExecutionAction, PopTemplate},
    },
    services::{author_scope, ensure_author},
};

#[derive(Clone)]
pub struct PopService {
    pop_repo: Arc<dyn PopRepository>,
}

impl PopService {
    pub fn new(pop_repo: Arc<dyn PopRepository>) -> Self {
        Self { pop_repo }
    }

    // --- Modelos ---

    pub async fn create_template(
        &self,
        scope: TenantScope,
        payload: &CreatePopTemplatePayload,
    ) -> Result<PopTemplate, AppError> {
        self.pop_repo
            .create_template(scope.write_tenant()?, &payload.name, payload.pop_type, &payload.steps)
            .await
    }

    /// Colaboradores só enxergam modelos ativos.
    pub async fn list_templates(&self, user: &SessionUser, scope: TenantScope) -> Result<Vec<PopTemplate>, AppError> {
        self.pop_repo
            .list_templates(scope.filter(), user.role == Role::Collaborator)
            .await
    }

    pub async fn get_template(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<PopTemplate, AppError> {
        self.pop_repo
            .find_template(id, scope.filter())
            .await?
            .filter(|template| template.active || user.role != Role::Collaborator)
            .ok_or(AppError::ResourceNotFound)
    }

    pub async fn deactivate_template(&self, scope: TenantScope, id: Uuid) -> Result<PopTemplate, AppError> {
        self.pop_repo
            .set_template_active(id, scope.filter(), false)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }

    // --- Execuções ---

    pub async fn start_execution(
        &self,
        user: &SessionUser,
        scope: TenantScope,
        template_id: Uuid,
    ) -> Result<PopExecution, AppError> {
        let template = self
            .pop_repo
            .find_template(template_id, scope.filter())
            .await?
            .ok_or(AppError::ResourceNotFound)?;

        if !template.active {
            return Err(AppError::BadRequest("modelo_inativo"));
        }

        let execution = self
            .pop_repo
            .create_execution(template.tenant_id, template.id, user.id)
            .await?;
        tracing::info!(execution_id = %execution.id, %template_id, "Execução de POP iniciada");
        Ok(execution)
    }

    pub async fn list_executions(&self, user: &SessionUser, scope: TenantScope) -> Result<Vec<PopExecution>, AppError> {
        self.pop_repo.list_executions(scope.filter(), author_scope(user)).await
    }

    pub async fn get_execution(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<PopExecution, AppError> {
        let execution = self
            .pop_repo
            .find_execution(id, scope.filter())
            .await?
            .ok_or(AppError::ResourceNotFound)?;
        ensure_author(user, execution.user_id)?;
        Ok(execution)
    }

    pub async fn complete(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<PopExecution, AppError> {
        self.transition(user, scope, id, PopExecutionAction::Complete).await
    }

    pub async fn cancel(&self, user: &SessionUser, scope: TenantScope, id: Uuid) -> Result<PopExecution, AppError> {
        self.transition(user, scope, id, PopExecutionAction::Cancel).await
    }

    async fn transition(
        &self,
        user: &SessionUser,
        scope: TenantScope,
        id: Uuid,
        action: PopExecutionAction,
    ) -> Result<PopExecution, AppError> {
        let current = self.get_execution(user, scope, id).await?;
        let next = current.status.apply(action)?;

        // Todas as transições saem de EM_ANDAMENTO para um estado final
        let written = self
            .pop_repo
            .set_execution_status(id, scope.filter(), current.status, next, Some(Utc::now()))
            .await?;
        let execution = settle(written, action, async {
            self.get_execution(user, scope, id).await.map(|execution| execution.status)
        })
        .await?;

        tracing::info!(execution_id = %id, to = next.label(), "Execução de POP encerrada");
        Ok(execution)
    }
}
