//! Data sources behind the listing services.
//!
//! Every entity kind is read through [`EntitySource`], whether it lives in
//! the in-memory mock dataset or behind a remote fact-check API.

pub mod fixtures;
pub mod memory;
pub mod remote;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::DataSourceConfig;
use crate::errors::AppError;
use crate::models::criteria::Criteria;
use crate::models::entity::Listable;
use crate::models::message_group::MessageGroup;
use crate::models::pagination::{PaginationRequest, PaginationResult};
use crate::models::topic::Topic;

pub use memory::MemorySource;
pub use remote::RemoteSource;

/// Paginated, filtered access to one entity kind.
#[async_trait]
pub trait EntitySource<E: Listable>: Send + Sync {
    /// One page of the entities matching `criteria`, with totals.
    async fn list_page(
        &self,
        criteria: &Criteria<E::Status>,
        req: &PaginationRequest,
    ) -> Result<PaginationResult<E>, AppError>;

    /// Number of entities matching `criteria`.
    async fn count(&self, criteria: &Criteria<E::Status>) -> Result<i64, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, AppError>;

    /// Persist a new status. Sources that own their data check the transition
    /// against the stored status in the same step as the write.
    async fn update_status(&self, id: &str, status: E::Status) -> Result<E, AppError>;

    /// Entities nested under `parent_id`, in source order.
    async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<E>, AppError>;
}

/// Topic and message group sources selected by configuration.
pub struct Sources {
    pub topics: Arc<dyn EntitySource<Topic>>,
    pub message_groups: Arc<dyn EntitySource<MessageGroup>>,
}

/// Build the sources for the configured backend.
pub fn create_sources(config: &DataSourceConfig) -> Result<Sources, AppError> {
    match config {
        DataSourceConfig::Mock => {
            tracing::info!("Serving listings from the in-memory mock dataset");
            Ok(Sources {
                topics: Arc::new(MemorySource::new(fixtures::topics())),
                message_groups: Arc::new(MemorySource::new(fixtures::message_groups())),
            })
        }
        DataSourceConfig::Remote {
            base_url,
            paging,
            timeout_secs,
        } => {
            tracing::info!(base_url = %base_url, paging = ?paging, "Serving listings from remote API");
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(*timeout_secs))
                .build()?;
            Ok(Sources {
                topics: Arc::new(RemoteSource::<Topic>::new(
                    client.clone(),
                    base_url,
                    "/topics",
                    *paging,
                )?),
                message_groups: Arc::new(
                    RemoteSource::<MessageGroup>::new(
                        client,
                        base_url,
                        "/message-groups",
                        *paging,
                    )?
                    .with_parent_route("/topics", "message-group"),
                ),
            })
        }
    }
}
