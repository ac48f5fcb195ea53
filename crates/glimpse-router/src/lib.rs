use std::sync::Arc;

use glimpse_cache::fingerprint;
use glimpse_core::ResponseCache;
use glimpse_gateway::{Gateway, SolutionMode};
use serde::Deserialize;
use serde_json::{json, Value};

/// Transport-agnostic route result; the HTTP layer maps this 1:1 onto a
/// response without inspecting the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status: u16,
    pub payload: Value,
}

impl RouteResponse {
    fn ok(payload: Value) -> Self {
        Self {
            status: 200,
            payload,
        }
    }

    fn client_error(payload: Value) -> Self {
        Self {
            status: 400,
            payload,
        }
    }

    fn server_error(payload: Value) -> Self {
        Self {
            status: 500,
            payload,
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            payload: json!({"error": "Not found"}),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest {
    image_data_list: Vec<String>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolutionRequest {
    problem_text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    conversation_id: Option<String>,
}

/// Routes the externally-callable operations through validation, the
/// response cache and the gateway, translating every failure into a JSON
/// envelope.
///
/// The cache fingerprint deliberately excludes the conversation id: two
/// sessions submitting identical problem text and language share one entry,
/// so a follow-up session may be served the first session's answer.
pub struct Router {
    gateway: Arc<Gateway>,
    cache: Arc<dyn ResponseCache>,
}

impl Router {
    pub fn new(gateway: Arc<Gateway>, cache: Arc<dyn ResponseCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn dispatch(&self, method: &str, path: &str, body: Value) -> RouteResponse {
        match (method, path) {
            ("POST", "/api/extract") => self.extract(body).await,
            ("POST", "/api/generate") => self.generate(body).await,
            ("POST", "/api/debug") => self.debug(body).await,
            ("GET", "/api/test-openai") => self.test_model().await,
            _ => RouteResponse::not_found(),
        }
    }

    pub async fn extract(&self, body: Value) -> RouteResponse {
        let request: ExtractRequest = match serde_json::from_value(body) {
            Ok(request) => request,
            Err(_) => {
                return RouteResponse::client_error(json!({"error": "Invalid imageDataList"}))
            }
        };
        let language = request.language.unwrap_or_else(|| "eng".to_string());

        let canonical = json!({
            "imageDataList": request.image_data_list,
            "language": language,
        });
        let key = fingerprint("/api/extract", &canonical);
        if let Some(hit) = self.lookup(&key).await {
            return RouteResponse::ok(hit);
        }

        match self
            .gateway
            .extract_text(&request.image_data_list, &language)
            .await
        {
            Ok(problem_text) => {
                let payload = json!({"problemText": problem_text});
                self.store(&key, &payload).await;
                RouteResponse::ok(payload)
            }
            Err(error) => RouteResponse::server_error(json!({
                "error": "Text extraction failed",
                "details": error.to_string(),
            })),
        }
    }

    pub async fn generate(&self, body: Value) -> RouteResponse {
        self.solution_route(SolutionMode::Generate, body).await
    }

    pub async fn debug(&self, body: Value) -> RouteResponse {
        self.solution_route(SolutionMode::Debug, body).await
    }

    async fn solution_route(&self, mode: SolutionMode, body: Value) -> RouteResponse {
        let (route, default_language, failure) = match mode {
            SolutionMode::Generate => ("/api/generate", "java", "Generation failed"),
            SolutionMode::Debug => ("/api/debug", "python", "Debug generation failed"),
        };

        let request: SolutionRequest = match serde_json::from_value(body) {
            Ok(request) => request,
            Err(_) => {
                return RouteResponse::client_error(json!({"error": "No problem text provided"}))
            }
        };
        if request.problem_text.is_empty() {
            return RouteResponse::client_error(json!({"error": "No problem text provided"}));
        }
        let language = request
            .language
            .unwrap_or_else(|| default_language.to_string());

        let canonical = json!({
            "problemText": request.problem_text,
            "language": language,
        });
        let key = fingerprint(route, &canonical);
        if let Some(hit) = self.lookup(&key).await {
            return RouteResponse::ok(hit);
        }

        let session_id = request.conversation_id.as_deref();
        let result = match mode {
            SolutionMode::Generate => {
                self.gateway
                    .generate_solution(&request.problem_text, &language, session_id)
                    .await
            }
            SolutionMode::Debug => {
                self.gateway
                    .debug_solution(&request.problem_text, &language, session_id)
                    .await
            }
        };

        match result {
            Ok(parsed) => {
                let payload = serde_json::to_value(parsed.into_solution())
                    .expect("solution serializes to JSON");
                self.store(&key, &payload).await;
                RouteResponse::ok(payload)
            }
            Err(error) => RouteResponse::server_error(json!({
                "error": failure,
                "details": error.to_string(),
            })),
        }
    }

    pub async fn test_model(&self) -> RouteResponse {
        match self.gateway.probe().await {
            Ok(message) => RouteResponse::ok(json!({"status": "success", "message": message})),
            Err(error) => RouteResponse::server_error(json!({
                "status": "error",
                "error": error.to_string(),
            })),
        }
    }

    async fn lookup(&self, key: &str) -> Option<Value> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => {
                tracing::debug!("cache hit");
                Some(payload)
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    async fn store(&self, key: &str, payload: &Value) {
        if let Err(error) = self.cache.put(key, payload).await {
            tracing::warn!(%error, "cache store failed");
        }
    }
}
