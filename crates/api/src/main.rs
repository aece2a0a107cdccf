use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dexvault_api::config::ServerConfig;
use dexvault_api::router::build_app_router;
use dexvault_api::state::AppState;
use dexvault_cloud::{BlobStore, DirectoryApi, GraphDirectory, InMemoryBlobStore, S3BlobStore, SearchIndexClient};
use dexvault_events::{EventBus, TopicDelivery};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dexvault_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = dexvault_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    dexvault_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    dexvault_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let seeded = dexvault_db::repositories::CatalogRepo::ensure_seeded(&pool)
        .await
        .expect("Failed to seed catalog cache");
    if seeded > 0 {
        tracing::info!(species = seeded, "Catalog cache seeded");
    }

    // --- Blob storage ---
    let blob: Arc<dyn BlobStore> = match &config.blob_bucket {
        Some(bucket) => {
            tracing::info!(bucket = %bucket, "Using S3 blob storage");
            Arc::new(S3BlobStore::from_env(bucket.clone(), config.blob_public_base.clone()).await)
        }
        None => {
            tracing::warn!("BLOB_BUCKET not set; using in-memory blob storage");
            Arc::new(InMemoryBlobStore::new())
        }
    };

    // --- Identity directory ---
    let directory: Option<Arc<dyn DirectoryApi>> =
        match (&config.directory_base_url, &config.directory_token) {
            (Some(base_url), Some(token)) => Some(Arc::new(GraphDirectory::new(
                base_url.clone(),
                token.clone(),
                Vec::new(),
            ))),
            _ => {
                tracing::warn!("Directory not configured; admin access disabled");
                None
            }
        };

    // --- Search index ---
    let search_index = config
        .search_index
        .clone()
        .map(|c| Arc::new(SearchIndexClient::new(c)));
    if search_index.is_some() {
        tracing::info!("Managed search index configured");
    }

    // --- Events ---
    let event_bus = Arc::new(EventBus::new());
    let topic = Arc::new(TopicDelivery::new(config.event_topic.clone()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        topic,
        blob,
        directory,
        search_index,
    };

    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(config.host.parse().expect("Invalid HOST"), config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining");
}
