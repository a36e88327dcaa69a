// DTF comment API client.
//
// POST /comment/add with a form body {id, reply_to, text}. Auth is the
// pair of device headers issued to the bot's account.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::traits::{CommentPoster, PostedReply};

pub struct DtfClient {
    client: reqwest::Client,
    base_url: String,
    device_token: String,
    possession_token: String,
}

impl DtfClient {
    pub fn new(base_url: &str, device_token: &str, possession_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("gamebot/0.1 (dtf comment bot)")
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            device_token: device_token.to_string(),
            possession_token: possession_token.to_string(),
        })
    }
}

#[async_trait]
impl CommentPoster for DtfClient {
    async fn post_reply(&self, post_id: i64, comment_id: i64, text: &str) -> Result<PostedReply> {
        let url = format!("{}/comment/add", self.base_url);
        let post_id = post_id.to_string();
        let comment_id = comment_id.to_string();

        debug!(post_id = %post_id, comment_id = %comment_id, "Posting reply");

        let response = self
            .client
            .post(&url)
            .header("X-Device-Token", &self.device_token)
            .header("X-Device-Possession-Token", &self.possession_token)
            .form(&[
                ("id", post_id.as_str()),
                ("reply_to", comment_id.as_str()),
                ("text", text),
            ])
            .send()
            .await
            .context("Failed to call DTF comment API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("DTF comment API returned {}: {}", status, body);
        }

        let body: AddCommentResponse = response
            .json()
            .await
            .context("Failed to parse DTF comment API response")?;

        Ok(body.result.into())
    }
}

// --- DTF response types ---

#[derive(Debug, Deserialize)]
pub struct AddCommentResponse {
    pub result: AddedComment,
}

#[derive(Debug, Deserialize)]
pub struct AddedComment {
    pub id: i64,
    #[serde(default)]
    pub text: String,
}

impl From<AddedComment> for PostedReply {
    fn from(comment: AddedComment) -> Self {
        PostedReply {
            id: comment.id,
            text: comment.text,
        }
    }
}
