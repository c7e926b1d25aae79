use std::sync::Arc;
use std::time::Duration;

use crate::data::source::DatasetSource;
use crate::server::page_store::{PageStore, DEFAULT_REVALIDATE};

pub mod api;
pub mod page_store;
pub mod pages;
pub mod render;
pub mod routes;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Shared by every handler. The source is stateless; only the page store keeps data between requests.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DatasetSource>,
    pub pages: Arc<PageStore>,
}

impl AppState {
    pub fn new(source: Arc<dyn DatasetSource>, revalidate: Duration) -> Self {
        let pages = Arc::new(PageStore::new(Arc::clone(&source), revalidate));
        Self { source, pages }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub revalidate: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            revalidate: DEFAULT_REVALIDATE,
        }
    }
}

pub async fn run_server(source: Arc<dyn DatasetSource>, config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(source, config.revalidate);

    match state.pages.warm().await {
        Ok(pages) => tracing::info!(pages, "prerendered static pages"),
        Err(err) => tracing::warn!(error = %err, "prerender failed, pages will render on first request"),
    }

    let app = routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        revalidate_secs = config.revalidate.as_secs(),
        "holiday-planner listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
