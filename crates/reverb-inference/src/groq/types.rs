//! Wire types for the Groq chat completions endpoint.
//!
//! Groq speaks the OpenAI chat schema, so these mirror that shape exactly.
//! Only the fields this crate actually sends or reads are modeled; serde
//! ignores the rest of the payload.

use serde::{Deserialize, Serialize};

/// Outbound chat completion request.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// One role-tagged turn in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Output-format constraint attached to a request.
#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    /// Constrain the completion to one well-formed JSON object.
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Inbound chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

/// One candidate completion; we only ever request one.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub index: usize,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Envelope Groq wraps around a non-2xx body.
#[derive(Debug, Deserialize)]
pub struct GroqErrorResponse {
    pub error: GroqError,
}

/// Provider-side failure detail.
#[derive(Debug, Deserialize)]
pub struct GroqError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_messages_in_order() {
        let request = ChatCompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You analyze customer reviews.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "Review rating 2/5: cold food".to_string(),
                },
            ],
            temperature: Some(0.5),
            response_format: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        let system_at = json.find("You analyze customer reviews.").unwrap();
        let user_at = json.find("cold food").unwrap();
        assert!(system_at < user_at);
        assert!(json.contains(r#""temperature":0.5"#));
    }

    #[test]
    fn test_request_omits_unset_optionals() {
        let request = ChatCompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![],
            temperature: None,
            response_format: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
        assert!(!json.contains("response_format"));
    }

    #[test]
    fn test_json_mode_wire_shape() {
        let request = ChatCompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![],
            temperature: None,
            response_format: Some(ResponseFormat::json_object()),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""response_format":{"type":"json_object"}"#));
    }

    #[test]
    fn test_response_parses_choice_and_usage() {
        let json = r#"{
            "id": "chatcmpl-9f31c",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"summary\": \"Cold food complaint\"}"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 84, "completion_tokens": 21, "total_tokens": 105}
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "chatcmpl-9f31c");
        assert!(response.choices[0].message.content.contains("Cold food"));
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, 105);
    }

    #[test]
    fn test_response_tolerates_absent_usage() {
        let json = r#"{
            "id": "chatcmpl-a1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "ok"},
                "finish_reason": null
            }]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.usage.is_none());
        assert!(response.choices[0].finish_reason.is_none());
    }

    #[test]
    fn test_error_envelope_parses_without_code() {
        let json = r#"{
            "error": {
                "message": "Rate limit reached for requests",
                "type": "tokens"
            }
        }"#;

        let parsed: GroqErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.message, "Rate limit reached for requests");
        assert_eq!(parsed.error.error_type, "tokens");
        assert!(parsed.error.code.is_none());
    }
}
