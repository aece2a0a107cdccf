use dexvault_cloud::SearchIndexConfig;
use dexvault_events::TopicConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Timeout for outbound dependency checks in seconds (default: `4`).
    pub outbound_timeout_secs: u64,
    /// Blob storage bucket; `None` selects the in-memory store.
    pub blob_bucket: Option<String>,
    /// Public base URL blobs are served under, when it differs from the
    /// bucket's own endpoint.
    pub blob_public_base: Option<String>,
    /// Identity directory endpoint and token; `None` disables admin
    /// resolution (everything resolves non-admin, fail closed).
    pub directory_base_url: Option<String>,
    pub directory_token: Option<String>,
    /// Managed search index; `None` forces the local search path.
    pub search_index: Option<SearchIndexConfig>,
    /// Outbound event topic; `None` disables delivery.
    pub event_topic: Option<TopicConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `OUTBOUND_TIMEOUT_SECS`  | `4`                     |
    /// | `BLOB_BUCKET`            | unset (in-memory store) |
    /// | `BLOB_PUBLIC_BASE`       | unset                   |
    /// | `DIRECTORY_BASE_URL`     | unset (admin disabled)  |
    /// | `DIRECTORY_TOKEN`        | unset                   |
    /// | `SEARCH_ENDPOINT` etc.   | unset (local search)    |
    /// | `EVENT_TOPIC_ENDPOINT` etc. | unset (no delivery)  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let outbound_timeout_secs: u64 = std::env::var("OUTBOUND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("OUTBOUND_TIMEOUT_SECS must be a valid u64");

        let blob_bucket = std::env::var("BLOB_BUCKET").ok().filter(|s| !s.is_empty());
        let blob_public_base = std::env::var("BLOB_PUBLIC_BASE").ok().filter(|s| !s.is_empty());

        let directory_base_url =
            std::env::var("DIRECTORY_BASE_URL").ok().filter(|s| !s.is_empty());
        let directory_token = std::env::var("DIRECTORY_TOKEN").ok().filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            outbound_timeout_secs,
            blob_bucket,
            blob_public_base,
            directory_base_url,
            directory_token,
            search_index: SearchIndexConfig::from_env(),
            event_topic: TopicConfig::from_env(),
        }
    }
}
