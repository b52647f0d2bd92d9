// src/services/catalog_service.rs

use std::{collections::HashSet, sync::Arc};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    middleware::tenancy::TenantScope,
    models::catalog::{CreateItemPayload, Item},
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog_repo: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog_repo }
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<Item>, AppError> {
        self.catalog_repo.list(scope.filter()).await
    }

    pub async fn create(&self, scope: TenantScope, payload: &CreateItemPayload) -> Result<Item, AppError> {
        self.catalog_repo
            .create(scope.write_tenant()?, &payload.name, &payload.unit)
            .await
    }

    pub async fn deactivate(&self, scope: TenantScope, id: Uuid) -> Result<Item, AppError> {
        self.catalog_repo
            .set_active(id, scope.filter(), false)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }

    /// Confere que todos os ids são itens ativos do restaurante.
    pub async fn ensure_active_items(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<(), AppError> {
        let distinct: HashSet<Uuid> = ids.iter().copied().collect();
        if distinct.is_empty() {
            return Ok(());
        }

        let wanted: Vec<Uuid> = distinct.iter().copied().collect();
        let found = self.catalog_repo.find_active_in(tenant_id, &wanted).await?;
        if found.len() != distinct.len() {
            return Err(AppError::BadRequest("item_invalido"));
        }
        Ok(())
    }
}

pub(crate) fn ensure_positive(quantity: Decimal) -> Result<(), AppError> {
    if quantity > Decimal::ZERO {
        Ok(())
    } else {
        Err(AppError::BadRequest("quantidade_invalida"))
    }
}
