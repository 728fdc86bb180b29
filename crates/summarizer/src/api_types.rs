//! Anthropic Messages API request and response types.

use serde::{Deserialize, Serialize};

/// A message in the request.
#[derive(Debug, Clone, Serialize)]
pub struct MessageParam {
    /// Role: "user" or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl MessageParam {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<MessageParam>,
}

/// Response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<Usage>,
}

/// One response content block; only `text` blocks carry the summary.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 600,
            messages: vec![MessageParam::user("Summarize this")],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "claude-sonnet-4-20250514");
        assert_eq!(value["max_tokens"], 600);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Summarize this");
    }

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "content": [{"type": "text", "text": "Three topics saw activity."}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1200, "output_tokens": 80}
        }"#;

        let response: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.content.len(), 1);
        assert_eq!(
            response.content[0].text.as_deref(),
            Some("Three topics saw activity.")
        );
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
        assert_eq!(response.usage.unwrap().output_tokens, 80);
    }

    #[test]
    fn test_error_deserialization() {
        let raw = r#"{
            "type": "error",
            "error": {"type": "rate_limit_error", "message": "Too many requests"}
        }"#;

        let error: ApiError = serde_json::from_str(raw).unwrap();
        assert_eq!(error.error.message, "Too many requests");
        assert_eq!(error.error.error_type.as_deref(), Some("rate_limit_error"));
    }
}
