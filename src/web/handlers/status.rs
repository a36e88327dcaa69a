// GET /api/status — scheduler counters plus the audit row count.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::web::{api_error, AppState};

pub async fn get_status(State(state): State<AppState>) -> Response {
    let audit_records = match state.audit.count().await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count audit records");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "audit log unavailable");
        }
    };

    Json(serde_json::json!({
        "scheduler": state.status.snapshot(),
        "audit_records": audit_records,
    }))
    .into_response()
}
