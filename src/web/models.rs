use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LANGUAGE: &str = "fr";

/// Inbound body of `POST /api/chat`. Fields are optional so that validation,
/// not deserialization, decides what a missing message means.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    /// Anything but a string falls back to the default language.
    pub language: Option<Value>,
    pub context: Option<Value>,
}

impl ChatRequest {
    pub fn language_or_default(&self) -> String {
        self.language
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }
}

/// The widget's HTML form, posted back to the page it was rendered on.
#[derive(Debug, Default, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// What gets sent for one chat turn: by the widget to the proxy, and by the
/// proxy to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub message: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// The subset of a chat reply the widget reads. Anything else in the body is ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatReply {
    /// First non-empty text of `response` then `message`.
    pub fn text(&self) -> Option<&str> {
        [self.response.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
    }
}

/// Inbound body of `POST /api/contact`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub sector: Option<String>,
    pub message: Option<String>,
    pub gdpr: Option<bool>,
}

/// A contact request that passed validation, as forwarded to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub company: String,
    pub sector: String,
    pub message: String,
    pub gdpr: bool,
    pub source: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_accepts_empty_object() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_none());
        assert!(req.language.is_none());
        assert!(req.context.is_none());
        assert_eq!(req.language_or_default(), "fr");
    }

    #[test]
    fn test_non_string_language_falls_back() {
        let req: ChatRequest =
            serde_json::from_value(json!({ "message": "bonjour", "language": 1 })).unwrap();
        assert_eq!(req.language_or_default(), "fr");

        let req: ChatRequest =
            serde_json::from_value(json!({ "message": "hello", "language": "en" })).unwrap();
        assert_eq!(req.language_or_default(), "en");
    }

    #[test]
    fn test_chat_payload_omits_missing_context() {
        let payload = ChatPayload {
            message: "bonjour".to_string(),
            language: "fr".to_string(),
            context: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "message": "bonjour", "language": "fr" })
        );
    }

    #[test]
    fn test_reply_text_prefers_response_then_message() {
        let reply: ChatReply =
            serde_json::from_value(json!({ "response": "oui", "message": "non" })).unwrap();
        assert_eq!(reply.text(), Some("oui"));

        let reply: ChatReply =
            serde_json::from_value(json!({ "response": "", "message": "ok" })).unwrap();
        assert_eq!(reply.text(), Some("ok"));

        let reply: ChatReply =
            serde_json::from_value(json!({ "conversation_id": "conv_1234" })).unwrap();
        assert_eq!(reply.text(), None);
    }
}
