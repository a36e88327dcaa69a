// Failure reporting — where per-job errors go once they are caught.
//
// With ERROR_REPORT_URL set, failures are POSTed there as JSON. Without
// it they are logged at error level. A report that cannot be delivered
// is logged too, so nothing is dropped silently.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::config::Config;
use crate::pipeline::error::{FailureContext, PipelineError};

#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, error: &PipelineError, context: &FailureContext);
}

/// Reports failures to the process log.
pub struct LogReporter;

#[async_trait]
impl ErrorReporter for LogReporter {
    async fn report(&self, err: &PipelineError, context: &FailureContext) {
        log_failure(err, context);
    }
}

/// Reports failures to an HTTP collector.
pub struct HttpErrorReporter {
    client: reqwest::Client,
    url: String,
}

impl HttpErrorReporter {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("gamebot/0.1 (dtf comment bot)")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn send(&self, report: &FailureReport<'_>) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(report)
            .send()
            .await
            .context("Failed to reach error collector")?;

        if !response.status().is_success() {
            anyhow::bail!("Error collector returned {}", response.status());
        }
        Ok(())
    }
}

#[async_trait]
impl ErrorReporter for HttpErrorReporter {
    async fn report(&self, err: &PipelineError, context: &FailureContext) {
        let message = err.to_string();
        let report = FailureReport::new(err, &message, context);
        if let Err(e) = self.send(&report).await {
            error!(error = %e, "Could not deliver failure report");
            log_failure(err, context);
        }
    }
}

/// JSON body sent to the error collector.
#[derive(Debug, Serialize)]
pub struct FailureReport<'a> {
    pub kind: &'static str,
    pub error: &'a str,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub timestamp: String,
}

impl<'a> FailureReport<'a> {
    pub fn new(err: &PipelineError, message: &'a str, context: &FailureContext) -> Self {
        Self {
            kind: err.kind(),
            error: message,
            post_id: context.post_id,
            comment_id: context.comment_id,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

fn log_failure(err: &PipelineError, context: &FailureContext) {
    error!(
        kind = err.kind(),
        post_id = ?context.post_id,
        comment_id = ?context.comment_id,
        error = %err,
        "Comment job failure"
    );
}

/// Pick the reporter for this configuration.
pub fn reporter_from_config(config: &Config) -> Result<Arc<dyn ErrorReporter>> {
    match &config.error_report_url {
        Some(url) => Ok(Arc::new(HttpErrorReporter::new(url)?)),
        None => Ok(Arc::new(LogReporter)),
    }
}
