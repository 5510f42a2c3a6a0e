//! Collector service receiving mirror trees
//!
//! Routes:
//! - `POST /receive`: store a mirror tree and write it to the output file
//! - `GET /status`: whether a tree arrived, its element lines and the tree
//! - `GET /`: status page polling `/status`

use crate::{json, mirror::MirrorNode};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;
use std::{future::Future, path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::cors::{Any, CorsLayer};

/// Collector configuration
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// File the latest tree is written to
    pub output_path: PathBuf,

    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("ui.json"),
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl CollectorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the output file
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Builder method: set the body size limit
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

/// The most recent tree received
#[derive(Debug)]
struct Received {
    tree: Arc<MirrorNode>,
    elements: Vec<String>,
}

/// Layout of the output file
#[derive(Serialize)]
struct SavedTree<'a> {
    ui_elements: &'a [String],
    raw_elements: &'a MirrorNode,
}

/// Body of `GET /status`
#[derive(Serialize)]
struct StatusReport<'a> {
    received: bool,
    elements: &'a [String],
    tree: Option<&'a MirrorNode>,
}

/// Shared collector state
#[derive(Debug, Clone)]
pub struct CollectorState {
    latest: Arc<RwLock<Option<Received>>>,
    options: Arc<CollectorOptions>,
}

impl CollectorState {
    pub fn new(options: CollectorOptions) -> Self {
        Self {
            latest: Arc::new(RwLock::new(None)),
            options: Arc::new(options),
        }
    }

    pub async fn is_received(&self) -> bool {
        self.latest.read().await.is_some()
    }

    /// The most recently received tree
    pub async fn latest(&self) -> Option<Arc<MirrorNode>> {
        self.latest.read().await.as_ref().map(|r| Arc::clone(&r.tree))
    }
}

/// One `<type> - <name> (<id>)` line per node, in pre-order
pub fn element_lines(tree: &MirrorNode) -> Vec<String> {
    tree.iter().map(|(node, _)| node.to_simple_string()).collect()
}

/// Errors answered to the sender as `{"status":"error","message":...}`
#[derive(Debug)]
enum CollectorError {
    InvalidPayload(String),
    EncodeFailed(String),
    WriteFailed(String),
}

impl IntoResponse for CollectorError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CollectorError::InvalidPayload(msg) => (StatusCode::BAD_REQUEST, msg),
            CollectorError::EncodeFailed(msg) | CollectorError::WriteFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        error!("Error processing node tree: {}", message);
        (status, Json(serde_json::json!({ "status": "error", "message": message }))).into_response()
    }
}

async fn index() -> Html<&'static str> {
    Html(include_str!("status.html"))
}

/// JSON text encoded off the regular serde path, trees can be arbitrarily deep
fn json_text(text: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], text).into_response()
}

async fn status(State(state): State<CollectorState>) -> Result<Response, CollectorError> {
    let latest = state.latest.read().await;
    let report = match latest.as_ref() {
        Some(received) => StatusReport {
            received: true,
            elements: &received.elements,
            tree: Some(&*received.tree),
        },
        None => StatusReport {
            received: false,
            elements: &[],
            tree: None,
        },
    };
    let text =
        json::to_string(&report).map_err(|e| CollectorError::EncodeFailed(format!("Failed to encode status: {}", e)))?;
    Ok(json_text(text))
}

async fn receive(State(state): State<CollectorState>, body: Bytes) -> Result<Json<Value>, CollectorError> {
    let tree: MirrorNode =
        json::from_slice(&body).map_err(|e| CollectorError::InvalidPayload(format!("Invalid node tree: {}", e)))?;
    let elements = element_lines(&tree);

    let saved = SavedTree {
        ui_elements: &elements,
        raw_elements: &tree,
    };
    let text = json::to_string_pretty(&saved)
        .map_err(|e| CollectorError::EncodeFailed(format!("Failed to encode output: {}", e)))?;

    let path = &state.options.output_path;
    tokio::fs::write(path, text)
        .await
        .map_err(|e| CollectorError::WriteFailed(format!("Failed to write {}: {}", path.display(), e)))?;
    info!("Saved {} UI elements to {}", elements.len(), path.display());

    let count = elements.len();
    *state.latest.write().await = Some(Received {
        tree: Arc::new(tree),
        elements,
    });

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": format!("Received {} UI elements", count),
        "elements_count": count,
    })))
}

/// Build the collector router
pub fn router(state: CollectorState) -> Router {
    let body_limit = state.options.max_body_bytes;
    Router::new()
        .route("/", get(index))
        .route("/status", get(status))
        .route("/receive", post(receive))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

/// Serve the collector on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: CollectorState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
