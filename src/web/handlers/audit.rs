// GET /api/audit — recent audit records, newest first.
//
// Optional ?limit= parameter (default 50, max 500).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

#[derive(Deserialize, Default)]
pub struct AuditQuery {
    pub limit: Option<u32>,
}

pub async fn list_audit(
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(50).min(500);
    match state.audit.recent(limit).await {
        Ok(records) => Json(serde_json::json!({ "records": records })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read audit log");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "audit log unavailable")
        }
    }
}
