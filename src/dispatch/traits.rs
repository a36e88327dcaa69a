// Comment poster trait — the seam between the pipeline and DTF.

use anyhow::Result;
use async_trait::async_trait;

/// A reply as stored by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedReply {
    pub id: i64,
    pub text: String,
}

#[async_trait]
pub trait CommentPoster: Send + Sync {
    /// Post `text` as a reply to `comment_id` under `post_id`.
    ///
    /// Single attempt: callers do not retry, a failed reply is lost.
    async fn post_reply(&self, post_id: i64, comment_id: i64, text: &str) -> Result<PostedReply>;
}
