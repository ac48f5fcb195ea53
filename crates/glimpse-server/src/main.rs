use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use glimpse_cache::InMemoryCache;
use glimpse_gateway::Gateway;
use glimpse_memory::InMemorySessionStore;
use glimpse_models::{HttpBackend, OpenAiChatModel, OpenAiConfig};
use glimpse_router::Router;
use glimpse_server::{serve, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            std::process::exit(1);
        }
    };

    let mut model_config = OpenAiConfig::new(config.api_key.clone(), config.model.clone());
    if let Some(base_url) = &config.base_url {
        model_config = model_config.with_base_url(base_url.clone());
    }
    let model = Arc::new(OpenAiChatModel::new(
        model_config,
        Arc::new(HttpBackend::new()),
    ));

    let memory = Arc::new(InMemorySessionStore::new());
    let cache = Arc::new(InMemoryCache::new());
    let gateway = Arc::new(Gateway::new(model, memory));
    let router = Arc::new(Router::new(gateway, cache.clone()));

    tracing::info!(
        "endpoints: POST /api/extract, POST /api/generate, POST /api/debug, \
         GET /api/test-openai, GET /cron"
    );

    if let Err(error) = serve(router, cache, config.port).await {
        tracing::error!(%error, "server failed");
        std::process::exit(1);
    }
}
