use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the catalog.
///
/// The split matters to the resolver: transient failures are retried,
/// everything else fails the lookup straight away.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Connection refused, timeout, reset, DNS.
    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Transport(_) => true,
            CatalogError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            CatalogError::Decode(_) => false,
        }
    }
}
