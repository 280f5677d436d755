mod addressing;
mod builder;
mod config;
mod error;
mod handlers;
mod inventory;
mod models;
mod render;
mod router;
mod templates;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use builder::ConfigBuilder;
use config::Config;
use templates::DirTemplates;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub builder: ConfigBuilder<DirTemplates>,
    pub snippets: DirTemplates,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            builder: ConfigBuilder::new(DirTemplates::new(&config.templates_dir)),
            snippets: DirTemplates::new(&config.oxidized_templates_dir),
            config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // optional .env next to the binary
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forge_netgen=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting Forge NetGen");
    tracing::info!("Templates: {}", cfg.templates_dir);
    tracing::info!("Oxidized templates: {}", cfg.oxidized_templates_dir);
    tracing::info!("IP table: {}", cfg.ip_table_path);

    for dir in [&cfg.templates_dir, &cfg.oxidized_templates_dir] {
        if !std::path::Path::new(dir).is_dir() {
            tracing::warn!("Template directory {} does not exist", dir);
        }
    }

    // Create app state
    let state = Arc::new(AppState::new(cfg.clone()));

    // Build router
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("Forge NetGen listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Forge NetGen shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
