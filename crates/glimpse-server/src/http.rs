use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use glimpse_core::{GlimpseError, ResponseCache};
use glimpse_router::{RouteResponse, Router};

/// Applies to the server-facing layer only; the gateway's provider calls
/// carry no deadline of their own.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Answer one JSON request through the router, under the request deadline.
/// An unreadable or non-JSON body reaches the router as `null` and fails
/// that route's validation.
pub async fn respond(router: &Router, method: &str, path: &str, raw_body: &[u8]) -> RouteResponse {
    tracing::info!(%method, %path, "request");

    let body: Value = if raw_body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(raw_body).unwrap_or(Value::Null)
    };

    match tokio::time::timeout(REQUEST_TIMEOUT, router.dispatch(method, path, body)).await {
        Ok(response) => response,
        Err(_) => RouteResponse {
            status: 500,
            payload: json!({"error": "Request timed out"}),
        },
    }
}

async fn handle(router: Arc<Router>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if method == Method::GET && path == "/cron" {
        tracing::info!("cron endpoint called");
        return text_response(StatusCode::OK, "happy");
    }

    let raw_body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(error) => {
            tracing::warn!(%error, "failed to read request body");
            Bytes::new()
        }
    };

    let routed = respond(&router, method.as_str(), &path, &raw_body).await;
    json_response(routed.status, &routed.payload)
}

fn json_response(status: u16, payload: &Value) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(payload.to_string())))
        .expect("static response parts are valid")
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from(body)))
        .expect("static response parts are valid")
}

/// Serve until ctrl-c or SIGTERM; the response cache is cleared on the way
/// out.
pub async fn serve(
    router: Arc<Router>,
    cache: Arc<dyn ResponseCache>,
    port: u16,
) -> Result<(), GlimpseError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| GlimpseError::Config(format!("failed to bind port {port}: {e}")))?;
    tracing::info!(%port, "server listening");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, _) = match accepted {
                    Ok(pair) => pair,
                    Err(error) => {
                        tracing::warn!(%error, "accept failed");
                        continue;
                    }
                };
                let router = router.clone();
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req| {
                        let router = router.clone();
                        async move { Ok::<_, Infallible>(handle(router, req).await) }
                    });
                    if let Err(error) = http1::Builder::new().serve_connection(io, service).await {
                        tracing::debug!(%error, "connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => {
                if let Err(error) = cache.clear().await {
                    tracing::warn!(%error, "failed to clear cache on shutdown");
                }
                tracing::info!("shutting down, response cache cleared");
                return Ok(());
            }
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
