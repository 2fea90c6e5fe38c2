// SPDX-License-Identifier: MIT

//! HTTP surface: one fresh workflow state per request

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::adk::error::QuillError;
use crate::quill::workflow::events::WorkflowEvent;
use crate::quill::workflow::graph::CompiledGraph;
use crate::quill::workflow::validate_topic;

/// Shared, read-only server state. The graph holds no per-run data.
#[derive(Clone)]
pub struct AppState {
    graph: Arc<CompiledGraph>,
}

impl AppState {
    pub fn new(graph: CompiledGraph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/runs", post(create_run))
        .route("/api/runs/stream", post(stream_run))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) -> Result<(), QuillError> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct RunRequest {
    topic: String,
}

fn bad_request(error: QuillError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "rejected", "error": error.to_string() })),
    )
        .into_response()
}

async fn create_run(State(app): State<AppState>, Json(payload): Json<RunRequest>) -> Response {
    let topic = match validate_topic(&payload.topic) {
        Ok(topic) => topic,
        Err(e) => return bad_request(e),
    };

    match app.graph.run(topic).await {
        Ok(state) => Json(json!({
            "status": "completed",
            "summary": state.summary(),
            "state": state,
        }))
        .into_response(),
        Err(failure) => {
            let status = if failure.source.is_service_fault() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (
                status,
                Json(json!({
                    "status": if failure.gave_up() { "gave_up" } else { "failed" },
                    "step": failure.step,
                    "error": failure.source.to_string(),
                    "summary": failure.state.summary(),
                    "state": failure.state,
                })),
            )
                .into_response()
        }
    }
}

async fn stream_run(
    State(app): State<AppState>,
    Json(payload): Json<RunRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Response> {
    let topic = validate_topic(&payload.topic)
        .map_err(bad_request)?
        .to_string();
    let (tx, rx) = mpsc::channel::<WorkflowEvent>(100);

    let span = tracing::info_span!("stream_run", topic = %topic);
    tokio::spawn(
        async move {
            log::info!("Starting streaming run for topic: {}", topic);
            let watcher = tx.clone();
            // Failures are already reported through RunFailed. Once the client
            // goes away the run is dropped, cancelling any in-flight call.
            tokio::select! {
                _ = app.graph.run_with_events(&topic, Some(tx)) => {}
                _ = watcher.closed() => {
                    log::info!("Client disconnected, abandoning run for topic: {}", topic);
                }
            }
        }
        .instrument(span),
    );

    let stream = ReceiverStream::new(rx).map(|event| {
        Ok::<_, Infallible>(
            Event::default()
                .json_data(&event)
                .unwrap_or_else(|e| Event::default().event("error").data(e.to_string())),
        )
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(1))))
}
