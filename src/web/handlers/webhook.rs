// POST /comment_webhook?secret=… — DTF pushes comment events here.
//
// Wrong or missing secret: 403 "WRONG SECRET", nothing queued.
// Otherwise the body is queued as-is and the answer is 200 "OK", even when
// the body turns out not to be JSON; the worker reports that later.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::warn;

use crate::web::secret::secret_matches;
use crate::web::AppState;

#[derive(Deserialize, Default)]
pub struct WebhookQuery {
    pub secret: Option<String>,
}

pub async fn receive_comment(
    State(state): State<AppState>,
    Query(params): Query<WebhookQuery>,
    body: Bytes,
) -> impl IntoResponse {
    if !secret_matches(&state.webhook_secret, params.secret.as_deref()) {
        warn!("Webhook call with wrong secret rejected");
        return (StatusCode::FORBIDDEN, "WRONG SECRET");
    }

    if !state.queue.submit(body.to_vec()) {
        return (StatusCode::SERVICE_UNAVAILABLE, "SHUTTING DOWN");
    }
    (StatusCode::OK, "OK")
}
