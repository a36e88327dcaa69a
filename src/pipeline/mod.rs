// Comment pipeline — everything that happens to one webhook event.

pub mod comment;
pub mod dedupe;
pub mod error;
pub mod event;

pub use comment::{CommentJob, CommentPipeline, Outcome, PipelineSettings};
pub use dedupe::{resolve_unique, ResolvedGames, DEFAULT_FANOUT, MAX_RESULTS};
pub use error::{FailureContext, PipelineError};
pub use event::IncomingCommentEvent;
