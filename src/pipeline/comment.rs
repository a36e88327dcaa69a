// Comment pipeline: validate -> extract -> resolve -> compose -> dispatch -> audit.
//
// One run handles one webhook event end to end:
// 1. Validates the payload as a `new_comment` event
// 2. Stops early for the bot's own comments (no audit row)
// 3. Extracts bracketed references from the comment text
// 4. Resolves them against the catalog, deduplicated and capped
// 5. Formats the reply; an empty result means no reply is due
// 6. Posts the reply (single attempt)
// 7. Writes exactly one audit row, whether or not a reply went out
//
// Lookup failures are reported and skipped. A failed reply is still
// audited with its attempted text before the failure is returned.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::dedupe::{resolve_unique, DEFAULT_FANOUT, MAX_RESULTS};
use super::error::{FailureContext, PipelineError};
use super::event::IncomingCommentEvent;
use crate::catalog::resolver::Resolver;
use crate::config::Config;
use crate::db::models::AuditRecord;
use crate::db::traits::AuditSink;
use crate::dispatch::traits::CommentPoster;
use crate::extract::extract_references;
use crate::reply::ReplyFormatter;
use crate::report::ErrorReporter;

/// Where a comment is in the pipeline. Used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Extracting,
    Resolving,
    Composing,
    Dispatching,
    Audited,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Extracting => "extracting",
            Stage::Resolving => "resolving",
            Stage::Composing => "composing",
            Stage::Dispatching => "dispatching",
            Stage::Audited => "audited",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a successfully processed comment ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Written by the bot itself; nothing done.
    SelfAuthored,
    /// No reference resolved to a game.
    NoReply { references: usize },
    /// A reply was composed but the post is not on the allowlist.
    ReplySuppressed { games: usize },
    /// A reply was posted.
    Replied { reply_id: i64, games: usize },
}

/// Knobs that are not collaborators.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub bot_author_id: Option<i64>,
    pub allowed_post_ids: Option<HashSet<i64>>,
    pub max_results: usize,
    pub fanout: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            bot_author_id: None,
            allowed_post_ids: None,
            max_results: MAX_RESULTS,
            fanout: DEFAULT_FANOUT,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &Config, fanout: usize) -> Self {
        Self {
            bot_author_id: config.bot_author_id,
            allowed_post_ids: config.allowed_post_ids.clone(),
            max_results: MAX_RESULTS,
            fanout,
        }
    }

    fn reply_allowed(&self, post_id: i64) -> bool {
        match &self.allowed_post_ids {
            Some(ids) => ids.contains(&post_id),
            None => true,
        }
    }
}

/// A unit of work the scheduler can run. Implemented by the pipeline and
/// by test doubles.
#[async_trait]
pub trait CommentJob: Send + Sync {
    async fn run(&self, payload: Vec<u8>) -> Result<Outcome, PipelineError>;
}

pub struct CommentPipeline {
    resolver: Resolver,
    formatter: ReplyFormatter,
    poster: Arc<dyn CommentPoster>,
    audit: Arc<dyn AuditSink>,
    reporter: Arc<dyn ErrorReporter>,
    settings: PipelineSettings,
}

impl CommentPipeline {
    pub fn new(
        resolver: Resolver,
        formatter: ReplyFormatter,
        poster: Arc<dyn CommentPoster>,
        audit: Arc<dyn AuditSink>,
        reporter: Arc<dyn ErrorReporter>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            resolver,
            formatter,
            poster,
            audit,
            reporter,
            settings,
        }
    }

    /// Process one raw webhook body.
    pub async fn process(&self, body: &[u8]) -> Result<Outcome, PipelineError> {
        let payload: serde_json::Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(stage = %Stage::Failed, error = %e, "Webhook body is not JSON");
                return Err(PipelineError::validation(format!("body is not JSON: {e}")));
            }
        };
        self.process_payload(payload).await
    }

    /// Process one already-parsed webhook payload.
    pub async fn process_payload(
        &self,
        payload: serde_json::Value,
    ) -> Result<Outcome, PipelineError> {
        debug!(stage = %Stage::Received, "Webhook event");
        let event = match IncomingCommentEvent::from_payload(&payload) {
            Ok(event) => event,
            Err(err) => {
                debug!(stage = %Stage::Failed, error = %err, "Event rejected");
                return Err(err);
            }
        };
        let ctx = FailureContext::for_comment(event.post_id, event.comment_id);
        debug!(
            stage = %Stage::Validated,
            post_id = event.post_id,
            comment_id = event.comment_id,
            "Event validated"
        );

        if self.settings.bot_author_id == Some(event.comment_author_id) {
            debug!(comment_id = event.comment_id, "Own comment, skipping");
            return Ok(Outcome::SelfAuthored);
        }

        debug!(stage = %Stage::Extracting, comment_id = event.comment_id, "Extracting references");
        let references = extract_references(&event.comment_text);

        debug!(
            stage = %Stage::Resolving,
            comment_id = event.comment_id,
            references = ?references,
            "Resolving references"
        );
        let resolved = resolve_unique(
            &self.resolver,
            &references,
            self.settings.max_results,
            self.settings.fanout,
        )
        .await;
        for failure in resolved.failures {
            self.reporter
                .report(&PipelineError::Lookup(failure), &ctx)
                .await;
        }
        let games = resolved.games.len();

        debug!(stage = %Stage::Composing, comment_id = event.comment_id, games, "Composing reply");
        let reply = self.formatter.compose(&resolved.games);

        let mut dispatch_error = None;
        let (outcome, reply_id, reply_text) = match reply {
            None => (
                Outcome::NoReply {
                    references: references.len(),
                },
                None,
                None,
            ),
            Some(_) if !self.settings.reply_allowed(event.post_id) => {
                info!(post_id = event.post_id, games, "Post not on allowlist, reply suppressed");
                (Outcome::ReplySuppressed { games }, None, None)
            }
            Some(text) => {
                debug!(stage = %Stage::Dispatching, comment_id = event.comment_id, "Posting reply");
                match self
                    .poster
                    .post_reply(event.post_id, event.comment_id, &text)
                    .await
                {
                    Ok(posted) => {
                        let stored = if posted.text.is_empty() {
                            text
                        } else {
                            posted.text
                        };
                        (
                            Outcome::Replied {
                                reply_id: posted.id,
                                games,
                            },
                            Some(posted.id),
                            Some(stored),
                        )
                    }
                    Err(cause) => {
                        warn!(
                            stage = %Stage::Failed,
                            post_id = event.post_id,
                            comment_id = event.comment_id,
                            error = %cause,
                            "Reply could not be posted, auditing attempt"
                        );
                        dispatch_error = Some(PipelineError::Dispatch {
                            post_id: event.post_id,
                            comment_id: event.comment_id,
                            cause,
                        });
                        (Outcome::NoReply { references: references.len() }, None, Some(text))
                    }
                }
            }
        };

        let record = AuditRecord {
            recorded_at: Utc::now().to_rfc3339(),
            post_id: event.post_id,
            comment_id: event.comment_id,
            comment_text: event.comment_text,
            comment_author_id: event.comment_author_id,
            extracted_references: references,
            raw_payload: payload,
            reply_id,
            reply_text,
        };
        let audit_error = match self.audit.record(&record).await {
            Ok(row) => {
                debug!(stage = %Stage::Audited, comment_id = record.comment_id, row, "Audit record written");
                None
            }
            Err(cause) => {
                warn!(
                    stage = %Stage::Failed,
                    post_id = record.post_id,
                    comment_id = record.comment_id,
                    error = %cause,
                    "Audit record not written"
                );
                Some(PipelineError::Audit {
                    post_id: record.post_id,
                    comment_id: record.comment_id,
                    cause,
                })
            }
        };

        match (dispatch_error, audit_error) {
            (None, None) => Ok(outcome),
            (Some(dispatch), None) => Err(dispatch),
            (None, Some(audit)) => Err(audit),
            (Some(dispatch), Some(audit)) => {
                self.reporter.report(&audit, &ctx).await;
                Err(dispatch)
            }
        }
    }
}

#[async_trait]
impl CommentJob for CommentPipeline {
    async fn run(&self, payload: Vec<u8>) -> Result<Outcome, PipelineError> {
        self.process(&payload).await
    }
}
