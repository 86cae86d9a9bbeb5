use std::env;

/// Where topics and message groups are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceConfig {
    /// Built-in mock dataset held in memory.
    Mock,
    /// Upstream fact-check API speaking the offset/limit query convention.
    Remote {
        base_url: String,
        paging: RemotePaging,
        timeout_secs: u64,
    },
}

/// Who slices pages when listing from a remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemotePaging {
    /// Send offset/limit and let the upstream return one page.
    Server,
    /// Fetch the whole filtered collection and slice locally.
    Client,
}

impl RemotePaging {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "client" => Self::Client,
            _ => Self::Server,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub data_source: DataSourceConfig,
    pub cache_ttl_secs: u64,
    pub backoffice_actor: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        let data_source = match env::var("DATA_SOURCE")
            .unwrap_or_else(|_| "mock".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "remote" => DataSourceConfig::Remote {
                base_url: env::var("REMOTE_API_URL")?,
                paging: RemotePaging::parse(
                    &env::var("REMOTE_PAGING").unwrap_or_else(|_| "server".to_string()),
                ),
                timeout_secs: env::var("REMOTE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            _ => DataSourceConfig::Mock,
        };

        Ok(Self {
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            data_source,
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            backoffice_actor: env::var("BACKOFFICE_ACTOR")
                .unwrap_or_else(|_| "backoffice".to_string()),
        })
    }

    /// Configuration for tests and embedded use: mock data, no caching.
    pub fn mock() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            frontend_url: "http://localhost:5173".to_string(),
            data_source: DataSourceConfig::Mock,
            cache_ttl_secs: 0,
            backoffice_actor: "backoffice".to_string(),
        }
    }
}
