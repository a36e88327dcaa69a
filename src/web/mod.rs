// Web server — Axum endpoint that receives DTF webhooks.
//
// The webhook handler only checks the shared secret and enqueues the raw
// body; all parsing happens on a worker. Any accepted body gets 200 "OK"
// right away so the sender never waits on RAWG or DTF.
//
// /api/* routes serve JSON for operators.

use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::AuditSink;
use crate::scheduler::{JobQueue, SchedulerStatus};

pub mod handlers;
pub mod secret;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub queue: JobQueue,
    pub status: SchedulerStatus,
    pub audit: Arc<dyn AuditSink>,
    pub webhook_secret: Arc<str>,
}

/// Start the Axum web server and block until Ctrl-C.
///
/// Returning drops the router and with it the server's `JobQueue`, which
/// lets the worker pool drain and stop.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Gamebot webhook listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/comment_webhook", post(handlers::webhook::receive_comment))
        .route("/api/status", get(handlers::status::get_status))
        .route("/api/audit", get(handlers::audit::list_audit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check — always returns 200 "OK".
async fn health() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl-C");
        // Never resolve, keep serving
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, draining queued comments");
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
