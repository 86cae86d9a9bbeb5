pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use errors::AppError;
use models::message_group::MessageGroup;
use models::topic::Topic;
use services::listing::ListingService;
use services::records::RecordStore;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub topics: Arc<ListingService<Topic>>,
    pub message_groups: Arc<ListingService<MessageGroup>>,
    pub records: Arc<RecordStore>,
}

impl AppState {
    /// Wire data sources, listing caches and the record store from config.
    pub fn from_config(config: config::AppConfig) -> Result<Self, AppError> {
        let sources = db::create_sources(&config.data_source)?;
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Ok(Self {
            topics: Arc::new(ListingService::new(sources.topics, ttl)),
            message_groups: Arc::new(ListingService::new(sources.message_groups, ttl)),
            records: Arc::new(RecordStore::with_fixtures()),
            config,
        })
    }
}
