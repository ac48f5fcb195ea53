use std::sync::Arc;

use glimpse_cache::InMemoryCache;
use glimpse_gateway::Gateway;
use glimpse_memory::InMemorySessionStore;
use glimpse_models::{FakeBackend, OpenAiChatModel, OpenAiConfig, ProviderResponse};
use glimpse_router::Router;
use glimpse_server::{respond, ServerConfig, DEFAULT_PORT};
use serde_json::json;

fn router_with(backend: Arc<FakeBackend>) -> Router {
    let model = Arc::new(OpenAiChatModel::new(
        OpenAiConfig::new("test-key", "gpt-4o"),
        backend,
    ));
    let gateway = Arc::new(Gateway::new(model, Arc::new(InMemorySessionStore::new())));
    Router::new(gateway, Arc::new(InMemoryCache::new()))
}

#[tokio::test]
async fn malformed_body_fails_route_validation() {
    let router = router_with(Arc::new(FakeBackend::new()));

    let response = respond(&router, "POST", "/api/generate", b"this is not json").await;

    assert_eq!(response.status, 400);
    assert_eq!(response.payload, json!({"error": "No problem text provided"}));
}

#[tokio::test]
async fn empty_body_fails_route_validation() {
    let router = router_with(Arc::new(FakeBackend::new()));

    let response = respond(&router, "POST", "/api/extract", b"").await;

    assert_eq!(response.status, 400);
    assert_eq!(response.payload, json!({"error": "Invalid imageDataList"}));
}

#[tokio::test]
async fn get_routes_ignore_the_body() {
    let backend = Arc::new(FakeBackend::new());
    backend.push_response(ProviderResponse {
        status: 200,
        body: json!({
            "choices": [{"message": {"role": "assistant", "content": "working"}}]
        }),
    });
    let router = router_with(backend);

    let response = respond(&router, "GET", "/api/test-openai", b"").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.payload["status"], "success");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let router = router_with(Arc::new(FakeBackend::new()));
    let response = respond(&router, "GET", "/metrics", b"").await;
    assert_eq!(response.status, 404);
}

#[test]
fn config_reads_environment() {
    // Single test covers all PORT cases to avoid env races across threads.
    std::env::remove_var("PORT");
    std::env::remove_var("OPENAI_API_KEY");
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.api_key, "");

    std::env::set_var("PORT", "8080");
    std::env::set_var("OPENAI_API_KEY", "sk-test");
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.api_key, "sk-test");

    std::env::set_var("PORT", "not-a-port");
    assert!(ServerConfig::from_env().is_err());

    std::env::remove_var("PORT");
    std::env::remove_var("OPENAI_API_KEY");
}
