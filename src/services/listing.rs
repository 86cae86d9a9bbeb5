//! Listing query facade: filtered pages and per-status counts over any
//! [`EntitySource`], with an explicit result cache.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use super::cache::QueryCache;
use super::lifecycle;
use crate::db::EntitySource;
use crate::errors::AppError;
use crate::models::criteria::Criteria;
use crate::models::entity::{EntityStatus, Listable};
use crate::models::pagination::{PaginationRequest, PaginationResult};

/// A labelled set of statuses counted together, e.g. one dashboard tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusPartition<S> {
    pub label: String,
    pub statuses: Vec<S>,
}

impl<S: EntityStatus> StatusPartition<S> {
    pub fn new(label: impl Into<String>, statuses: Vec<S>) -> Self {
        Self {
            label: label.into(),
            statuses,
        }
    }

    /// One partition per status, labelled with its wire name.
    pub fn per_status() -> Vec<Self> {
        S::ALL
            .iter()
            .map(|status| Self::new(status.as_str(), vec![*status]))
            .collect()
    }
}

/// Which statuses the overall `total` covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TotalScope<S> {
    /// Every status named by any partition.
    Union,
    /// A fixed subset chosen by the caller, such as the "active" statuses.
    Statuses(Vec<S>),
}

/// Count response: `total` plus one entry per partition label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: i64,
    #[serde(flatten)]
    pub by_status: BTreeMap<String, i64>,
}

impl StatusCounts {
    pub fn get(&self, label: &str) -> i64 {
        self.by_status.get(label).copied().unwrap_or(0)
    }
}

type PageKey<S> = (Criteria<S>, PaginationRequest);
type CountKey<S> = (Criteria<S>, Vec<StatusPartition<S>>, TotalScope<S>);

pub struct ListingService<E: Listable> {
    source: Arc<dyn EntitySource<E>>,
    pages: QueryCache<PageKey<E::Status>, PaginationResult<E>>,
    counts: QueryCache<CountKey<E::Status>, StatusCounts>,
}

impl<E: Listable> ListingService<E> {
    pub fn new(source: Arc<dyn EntitySource<E>>, cache_ttl: Duration) -> Self {
        Self {
            source,
            pages: QueryCache::new(cache_ttl),
            counts: QueryCache::new(cache_ttl),
        }
    }

    /// One page of entities matching `criteria`.
    pub async fn list_page(
        &self,
        criteria: &Criteria<E::Status>,
        req: &PaginationRequest,
    ) -> Result<PaginationResult<E>, AppError> {
        let key = (criteria.normalized(), req.normalized());
        if let Some(hit) = self.pages.get(&key) {
            tracing::debug!(kind = E::KIND, page = req.page(), "Listing cache hit");
            return Ok(hit);
        }

        let generation = self.pages.generation();
        let page = self.source.list_page(&key.0, &key.1).await?;
        tracing::debug!(
            kind = E::KIND,
            page = page.page,
            page_size = page.page_size,
            total_items = page.total_items,
            "Listed page"
        );
        self.pages.insert(key, page.clone(), generation);
        Ok(page)
    }

    /// Number of entities matching `criteria`, uncached.
    pub async fn count(&self, criteria: &Criteria<E::Status>) -> Result<i64, AppError> {
        self.source.count(&criteria.normalized()).await
    }

    /// Count matches per partition, with the status condition of `criteria`
    /// replaced by each partition's statuses. Partitions are evaluated
    /// concurrently. An empty partition counts zero.
    pub async fn count_by_status_partitions(
        &self,
        criteria: &Criteria<E::Status>,
        partitions: &[StatusPartition<E::Status>],
        total_scope: &TotalScope<E::Status>,
    ) -> Result<StatusCounts, AppError> {
        let criteria = criteria.normalized();
        let key = (criteria.clone(), partitions.to_vec(), total_scope.clone());
        if let Some(hit) = self.counts.get(&key) {
            tracing::debug!(kind = E::KIND, "Count cache hit");
            return Ok(hit);
        }

        let generation = self.counts.generation();
        let total_statuses = match total_scope {
            TotalScope::Union => union_of(partitions),
            TotalScope::Statuses(statuses) => statuses.clone(),
        };

        let per_partition = try_join_all(
            partitions
                .iter()
                .map(|partition| self.count_statuses(&criteria, &partition.statuses)),
        );
        let (per_partition, total) = tokio::try_join!(
            per_partition,
            self.count_statuses(&criteria, &total_statuses)
        )?;

        let counts = StatusCounts {
            total,
            by_status: partitions
                .iter()
                .map(|partition| partition.label.clone())
                .zip(per_partition)
                .collect(),
        };
        tracing::debug!(kind = E::KIND, total = counts.total, "Counted status partitions");
        self.counts.insert(key, counts.clone(), generation);
        Ok(counts)
    }

    async fn count_statuses(
        &self,
        criteria: &Criteria<E::Status>,
        statuses: &[E::Status],
    ) -> Result<i64, AppError> {
        if statuses.is_empty() {
            return Ok(0);
        }
        self.source.count(&criteria.with_statuses(statuses)).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<E, AppError> {
        self.source
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} '{id}' not found", E::KIND)))
    }

    /// Validate the transition against the moderation graph, persist it and
    /// drop every cached listing of this kind. The source re-checks the graph
    /// against the stored status when it writes.
    pub async fn update_status(&self, id: &str, next: E::Status) -> Result<E, AppError> {
        let current = self.find_by_id(id).await?;
        lifecycle::validate_transition(&current.status(), &next)?;

        let updated = self.source.update_status(id, next).await?;
        self.invalidate();
        tracing::info!(
            kind = E::KIND,
            id = %id,
            from = current.status().as_str(),
            to = next.as_str(),
            "Status updated"
        );
        Ok(updated)
    }

    pub async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<E>, AppError> {
        self.source.list_by_parent(parent_id).await
    }

    /// Drop all cached pages and counts for this entity kind.
    pub fn invalidate(&self) {
        self.pages.invalidate_all();
        self.counts.invalidate_all();
    }
}

/// Order-preserving, de-duplicated union of partition statuses.
fn union_of<S: EntityStatus>(partitions: &[StatusPartition<S>]) -> Vec<S> {
    let mut union = Vec::new();
    for status in partitions.iter().flat_map(|p| p.statuses.iter()) {
        if !union.contains(status) {
            union.push(*status);
        }
    }
    union
}
