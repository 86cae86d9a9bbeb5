//! In-memory entity source: filter and paginate over a snapshot.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EntitySource;
use crate::errors::AppError;
use crate::models::criteria::Criteria;
use crate::models::entity::Listable;
use crate::models::pagination::{paginate, PaginationRequest, PaginationResult};
use crate::services::{filter, lifecycle};

/// In-memory storage for development and testing.
#[derive(Debug)]
pub struct MemorySource<E> {
    items: RwLock<Vec<E>>,
}

impl<E: Listable> MemorySource<E> {
    pub fn new(items: Vec<E>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl<E: Listable> Default for MemorySource<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl<E: Listable> EntitySource<E> for MemorySource<E> {
    async fn list_page(
        &self,
        criteria: &Criteria<E::Status>,
        req: &PaginationRequest,
    ) -> Result<PaginationResult<E>, AppError> {
        let items = self.items.read().await;
        let matched = filter::filter(&items, criteria);
        let page = paginate(&matched, req).map(E::clone);
        tracing::debug!(
            kind = E::KIND,
            matched = matched.len(),
            returned = page.items.len(),
            "Listed in-memory page"
        );
        Ok(page)
    }

    async fn count(&self, criteria: &Criteria<E::Status>) -> Result<i64, AppError> {
        let items = self.items.read().await;
        let matched = filter::filter(&items, criteria).len();
        Ok(i64::try_from(matched).unwrap_or(i64::MAX))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, AppError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn update_status(&self, id: &str, status: E::Status) -> Result<E, AppError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("{} '{id}' not found", E::KIND)))?;
        // Checked under the write lock so racing moderations cannot both pass.
        lifecycle::validate_transition(&item.status(), &status)?;
        item.set_status(status);
        Ok(item.clone())
    }

    async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<E>, AppError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| item.parent_id() == Some(parent_id))
            .cloned()
            .collect())
    }
}
