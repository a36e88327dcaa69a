// Inbound webhook event — the only payload shape the bot acts on.
//
// DTF sends `{ "type": "new_comment", "data": { id, text, creator: {id},
// content: {id} } }`. Anything else is a validation failure, reported
// upward rather than silently dropped.

use serde::Deserialize;

use super::error::{FailureContext, PipelineError};

/// The webhook `type` we handle.
pub const NEW_COMMENT: &str = "new_comment";

/// A validated `new_comment` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCommentEvent {
    pub event_kind: String,
    pub post_id: i64,
    pub comment_id: i64,
    pub comment_text: String,
    pub comment_author_id: i64,
}

#[derive(Deserialize)]
struct WebhookPayload {
    data: CommentData,
}

#[derive(Deserialize)]
struct CommentData {
    id: i64,
    text: Option<String>,
    creator: IdRef,
    content: IdRef,
}

#[derive(Deserialize)]
struct IdRef {
    id: i64,
}

impl IncomingCommentEvent {
    /// Validate a raw webhook body.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, PipelineError> {
        let context = ids_in(payload);
        let invalid = |reason: String| PipelineError::Validation { reason, context };

        let kind = payload
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| invalid("payload has no \"type\" field".into()))?;

        if kind != NEW_COMMENT {
            return Err(invalid(format!(
                "unexpected webhook type {kind:?}, expected {NEW_COMMENT:?}"
            )));
        }

        let parsed = WebhookPayload::deserialize(payload)
            .map_err(|e| invalid(format!("malformed new_comment data: {e}")))?;

        Ok(Self {
            event_kind: kind.to_string(),
            post_id: parsed.data.content.id,
            comment_id: parsed.data.id,
            comment_text: parsed.data.text.unwrap_or_default(),
            comment_author_id: parsed.data.creator.id,
        })
    }
}

/// Post and comment ids, read field by field so a broken body still
/// yields whatever it does carry.
fn ids_in(payload: &serde_json::Value) -> FailureContext {
    FailureContext {
        post_id: payload
            .pointer("/data/content/id")
            .and_then(|v| v.as_i64()),
        comment_id: payload.pointer("/data/id").and_then(|v| v.as_i64()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_new_comment() {
        let payload = json!({
            "type": "new_comment",
            "data": {
                "id": 555,
                "text": "играл в [Half-Life 2] вчера",
                "creator": {"id": 42, "name": "someone"},
                "content": {"id": 47384, "title": "Post"}
            }
        });
        let event = IncomingCommentEvent::from_payload(&payload).unwrap();
        assert_eq!(event.event_kind, "new_comment");
        assert_eq!(event.post_id, 47384);
        assert_eq!(event.comment_id, 555);
        assert_eq!(event.comment_author_id, 42);
        assert_eq!(event.comment_text, "играл в [Half-Life 2] вчера");
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let payload = json!({"type": "new_entry", "data": {}});
        let err = IncomingCommentEvent::from_payload(&payload).unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));
        assert!(err.to_string().contains("new_entry"));
    }

    #[test]
    fn test_missing_kind_is_rejected() {
        let err = IncomingCommentEvent::from_payload(&json!({"data": {}})).unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let payload = json!({"type": "new_comment", "data": {"id": 1, "text": "x"}});
        let err = IncomingCommentEvent::from_payload(&payload).unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));
    }

    #[test]
    fn test_rejected_event_keeps_readable_ids() {
        let payload = json!({
            "type": "comment_edited",
            "data": {"id": 555, "text": "x", "creator": {"id": 2}, "content": {"id": 47384}}
        });
        let err = IncomingCommentEvent::from_payload(&payload).unwrap_err();
        assert_eq!(err.context(), FailureContext::for_comment(47384, 555));
    }

    #[test]
    fn test_partial_ids_on_malformed_data() {
        let payload = json!({"type": "new_comment", "data": {"id": 9, "text": "x"}});
        let err = IncomingCommentEvent::from_payload(&payload).unwrap_err();
        assert_eq!(err.context().comment_id, Some(9));
        assert_eq!(err.context().post_id, None);
    }

    #[test]
    fn test_null_text_is_empty() {
        let payload = json!({
            "type": "new_comment",
            "data": {"id": 1, "text": null, "creator": {"id": 2}, "content": {"id": 3}}
        });
        let event = IncomingCommentEvent::from_payload(&payload).unwrap();
        assert!(event.comment_text.is_empty());
    }
}
