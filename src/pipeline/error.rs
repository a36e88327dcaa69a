use thiserror::Error;

use crate::catalog::resolver::LookupError;

/// Failures of a single comment job.
///
/// None of these ever escape the job: the scheduler hands them to the
/// configured error reporter and moves on.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Payload is not a well-formed `new_comment` event. Whatever ids
    /// could still be read from the body are kept for correlation.
    #[error("invalid webhook event: {reason}")]
    Validation {
        reason: String,
        context: FailureContext,
    },

    /// One reference could not be looked up. Fatal to that reference only.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The reply was composed but could not be posted.
    #[error("failed to post reply to comment {comment_id} on post {post_id}: {cause:#}")]
    Dispatch {
        post_id: i64,
        comment_id: i64,
        cause: anyhow::Error,
    },

    /// The audit row could not be written.
    #[error("failed to write audit record for comment {comment_id} on post {post_id}: {cause:#}")]
    Audit {
        post_id: i64,
        comment_id: i64,
        cause: anyhow::Error,
    },

    /// The job task panicked or was cancelled.
    #[error("comment job aborted: {0}")]
    Aborted(String),
}

/// Identifiers that let a failure report be matched to a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureContext {
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
}

impl FailureContext {
    pub fn for_comment(post_id: i64, comment_id: i64) -> Self {
        Self {
            post_id: Some(post_id),
            comment_id: Some(comment_id),
        }
    }
}

impl PipelineError {
    /// A validation failure with no ids to attach.
    pub fn validation(reason: impl Into<String>) -> Self {
        PipelineError::Validation {
            reason: reason.into(),
            context: FailureContext::default(),
        }
    }

    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation { .. } => "validation",
            PipelineError::Lookup(_) => "lookup",
            PipelineError::Dispatch { .. } => "dispatch",
            PipelineError::Audit { .. } => "audit",
            PipelineError::Aborted(_) => "aborted",
        }
    }

    /// Whatever ids the error itself carries.
    pub fn context(&self) -> FailureContext {
        match self {
            PipelineError::Dispatch {
                post_id,
                comment_id,
                ..
            }
            | PipelineError::Audit {
                post_id,
                comment_id,
                ..
            } => FailureContext::for_comment(*post_id, *comment_id),
            PipelineError::Validation { context, .. } => *context,
            _ => FailureContext::default(),
        }
    }
}
