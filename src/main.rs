use anyhow::{Result, anyhow};
use axum::{Router, serve};
use dotenv::dotenv;
use rmcp::transport::{
    StreamableHttpServerConfig, StreamableHttpService,
    streamable_http_server::session::local::LocalSessionManager,
};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod mcp;
use mcp::{ErpApiMCPFactory, config::ERP_CONFIG, db::Database};

#[tokio::main]
async fn main() -> Result<()> {
    // Load variables from .env file if it exists into the environment
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast on a broken configuration before accepting connections
    let config = ERP_CONFIG
        .as_ref()
        .map_err(|e| anyhow!("Failed to load ERP configuration: {e}"))?;
    info!(
        base_url = %config.base_url,
        auth_endpoint = %config.auth_endpoint,
        timeout_secs = config.timeout.as_secs(),
        "ERP API configuration loaded"
    );
    if config.max_retries > 0 {
        info!(max_retries = config.max_retries, "ERP_MAX_RETRIES is set but requests are never retried");
    }
    if config.cache.enabled {
        warn!(
            ttl_secs = config.cache.ttl.as_secs(),
            max_size = config.cache.max_size,
            "ERP_CACHE_ENABLED is set but response caching is not implemented"
        );
    }

    // Connects on first use. The URL may carry a password and is never logged
    let database = config
        .database_url
        .as_deref()
        .map(|url| Database::connect_lazy(url, config.timeout))
        .transpose()
        .map_err(|e| anyhow!("Failed to prepare the ERP database pool: {e}"))?;
    if database.is_some() {
        info!("ERP database backend enabled, registering db_* tools");
    }

    // One factory, and therefore one gateway and session, per MCP session
    info!("Setting up the Streamable HTTP Service for the ERP API tools");
    let service = StreamableHttpService::new(
        move || ErpApiMCPFactory::new(database.clone()).map_err(std::io::Error::other),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    info!("Starting server on {}", config.bind_address);
    let router = Router::new().nest_service("/mcp", service);
    let tcp_listener = TcpListener::bind(config.bind_address.as_str()).await?;

    // Graceful shutdown on CTRL+C
    let shutdown = async {
        signal::ctrl_c().await.unwrap_or_else(|e| {
            eprintln!("failed to install CTRL+C handler: {e}");
        });
    };

    serve(tcp_listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
