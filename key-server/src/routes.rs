use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use prompt_selector_core::InstanceId;
use prompt_selector_core::NodeDescriptor;
use prompt_selector_core::ResolveRequest;
use prompt_selector_core::SelectorEngine;
use prompt_selector_core::SelectorError;
use prompt_selector_core::node_descriptor;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::error;
use tracing::info;
use tracing::warn;

type SharedEngine = Arc<SelectorEngine>;

pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/node_info", get(node_info))
        .route("/get_prompt_keys", get(missing_node_id))
        .route("/get_prompt_keys/", get(missing_node_id))
        .route("/get_prompt_keys/{node_id}", get(prompt_keys))
        .route("/process", post(process))
        .with_state(engine)
}

pub async fn serve(engine: SharedEngine, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind key server to {addr}"))?;
    info!("key server listening on {addr}");
    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("key server terminated unexpectedly")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down key server");
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessResponse {
    pub output: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error("Missing node_id")]
    MissingNodeId,
    #[error("Unknown node_id: {0}")]
    UnknownNodeId(InstanceId),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("{0}")]
    Selector(#[from] SelectorError),
    #[error("Failed to get keys: {0}")]
    KeysFailed(String),
    #[error("Failed to process node: {0}")]
    ProcessFailed(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingNodeId
            | ApiError::UnknownNodeId(_)
            | ApiError::InvalidBody(_)
            | ApiError::Selector(_) => StatusCode::BAD_REQUEST,
            ApiError::KeysFailed(_) | ApiError::ProcessFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!(status = status.as_u16(), "{self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Blank ids are a caller error at the HTTP boundary even though the core
/// accepts any non-empty id.
fn node_instance_id(node_id: &str) -> Result<InstanceId, ApiError> {
    if node_id.trim().is_empty() {
        return Err(ApiError::MissingNodeId);
    }
    Ok(InstanceId::new(node_id)?)
}

async fn health() -> &'static str {
    "ok"
}

async fn node_info() -> Json<NodeDescriptor> {
    Json(node_descriptor())
}

async fn missing_node_id() -> ApiError {
    ApiError::MissingNodeId
}

async fn prompt_keys(
    State(engine): State<SharedEngine>,
    Path(node_id): Path<String>,
) -> Result<Json<KeysResponse>, ApiError> {
    let id = node_instance_id(&node_id)?;
    let lookup_id = id.clone();
    let keys = tokio::task::spawn_blocking(move || engine.keys(&lookup_id))
        .await
        .map_err(|err| ApiError::KeysFailed(err.to_string()))?;
    match keys {
        Some(keys) => Ok(Json(KeysResponse { keys })),
        None => Err(ApiError::UnknownNodeId(id)),
    }
}

async fn process(
    State(engine): State<SharedEngine>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    node_instance_id(&request.node_id)?;
    let output = tokio::task::spawn_blocking(move || engine.resolve(&request))
        .await
        .map_err(|err| ApiError::ProcessFailed(err.to_string()))??;
    Ok(Json(ProcessResponse { output }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::header::CONTENT_TYPE;
    use pretty_assertions::assert_eq;
    use prompt_selector_core::FixedClock;
    use prompt_selector_core::InstanceRegistry;
    use prompt_selector_core::TracingObserver;
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use serde_json::json;
    use tower::ServiceExt;

    const NOW: u64 = 1_700_000_000;

    fn engine() -> SharedEngine {
        Arc::new(SelectorEngine::with_parts(
            InstanceRegistry::new(),
            Arc::new(TracingObserver),
            Arc::new(FixedClock(NOW)),
        ))
    }

    async fn send(engine: &SharedEngine, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router(engine.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(engine: &SharedEngine, uri: &str) -> (StatusCode, T) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(engine, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_process(engine: &SharedEngine, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/process")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = send(engine, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let engine = engine();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&engine, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn keys_reflect_latest_parse() {
        let engine = engine();
        let (status, _) = post_process(
            &engine,
            json!({
                "node_id": "3",
                "prompt_pairs": r#"{"cat": "a cat", "dog": "a dog"}"#,
                "selected_key": "dog",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, keys): (_, KeysResponse) = get_json(&engine, "/get_prompt_keys/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            keys,
            KeysResponse {
                keys: vec!["cat".to_string(), "dog".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn unknown_node_is_a_client_error() {
        let engine = engine();
        let (status, body): (_, ErrorResponse) = get_json(&engine, "/get_prompt_keys/42").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Unknown node_id: 42");
        assert!(engine.registry().is_empty());
    }

    #[tokio::test]
    async fn missing_node_id_is_a_client_error() {
        let engine = engine();
        for uri in ["/get_prompt_keys", "/get_prompt_keys/", "/get_prompt_keys/%20"] {
            let (status, body): (_, ErrorResponse) = get_json(&engine, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body.error, "Missing node_id");
        }
    }

    #[tokio::test]
    async fn process_returns_stamped_value() {
        let engine = engine();
        let (status, body) = post_process(
            &engine,
            json!({
                "node_id": "1",
                "prompt_pairs": r#"{"a": "x", "b": "y"}"#,
                "selected_key": "missing",
                "replace_mode": "原始值",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "output": format!("x [time={NOW}]") }));
    }

    #[tokio::test]
    async fn process_rejects_unknown_mode() {
        let engine = engine();
        let (status, body) = post_process(
            &engine,
            json!({ "node_id": "1", "replace_mode": "shuffle" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap_or_default();
        assert!(error.starts_with("Invalid request body"), "{error}");
    }

    #[tokio::test]
    async fn process_rejects_blank_node_id() {
        let engine = engine();
        for node_id in ["", "  "] {
            let (status, body) = post_process(&engine, json!({ "node_id": node_id })).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Missing node_id" }));
        }
        assert!(engine.registry().is_empty());
    }

    #[tokio::test]
    async fn node_info_describes_inputs() {
        let engine = engine();
        let (status, body): (_, Value) = get_json(&engine, "/node_info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["node_type"], "PromptSelector");
        assert_eq!(body["required"][2]["options"][0], "原始值");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let engine = engine();
        let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let (status, _) = send(&engine, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
