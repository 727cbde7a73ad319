use std::net::SocketAddr;
use std::sync::Arc;

use aiscout_core::{Analyzer, AnalyzerConfig, AnthropicAdvisor, ConfigLoader};
use aiscout_server::{AppState, MemoryStore, ResultStore, ServerConfig, app, spawn_eviction};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();

    let mut analyzer_config = AnalyzerConfig::default();
    ConfigLoader::default().apply(&mut analyzer_config);

    let advisor = AnthropicAdvisor::from_env();
    if advisor.is_none() {
        tracing::info!("ANTHROPIC_API_KEY not set, reports use static guidance");
    }

    let store: Arc<dyn ResultStore> = Arc::new(MemoryStore::new());
    let _eviction = spawn_eviction(store.clone(), config.store_ttl);

    let state = AppState::new(Analyzer::with_config(analyzer_config), advisor, store);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, ttl_secs = config.store_ttl.as_secs(), "aiscout server listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
