use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::providers::utils::upstream_error_message;

pub const UNTITLED_VIDEO: &str = "Untitled";
pub const UNKNOWN_QA_ERROR: &str = "Unknown error: chat_response missing.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: VideoMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub video_name: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Video {
    pub fn display_name(&self) -> &str {
        first_non_empty(&[&self.metadata.title, &self.metadata.video_name]).unwrap_or(UNTITLED_VIDEO)
    }

    pub fn display_url(&self) -> &str {
        first_non_empty(&[&self.url, &self.metadata.url]).unwrap_or_default()
    }
}

fn first_non_empty<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Raw answer of the video Q&A endpoint. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QaResponse {
    #[serde(default)]
    pub chat_response: Option<Value>,
    #[serde(default)]
    pub system_message: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// What to show for a Q&A call.
#[derive(Debug, Clone, PartialEq)]
pub enum Roast {
    Markdown(String),
    Failed(String),
}

impl QaResponse {
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(message.into())),
            ..Default::default()
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.as_ref().is_some_and(|e| !e.is_null())
    }

    /// `chat_response`, then `system_message`, then `error`, then a generic notice.
    pub fn resolve(&self) -> Roast {
        if let Some(markdown) = self.chat_response.as_ref().and_then(chat_response_text) {
            return Roast::Markdown(markdown);
        }

        let fallback = message_text(self.system_message.as_ref())
            .or_else(|| message_text(self.error.as_ref()))
            .unwrap_or_else(|| UNKNOWN_QA_ERROR.to_string());
        Roast::Failed(fallback)
    }
}

fn message_text(value: Option<&Value>) -> Option<String> {
    value
        .filter(|v| !v.is_null())
        .map(upstream_error_message)
        .filter(|m| !m.is_empty())
}

/// The endpoint may wrap its answer as a JSON string of
/// `{"sections": [{"section_content": ...}]}`; join those sections when present.
fn chat_response_text(response: &Value) -> Option<String> {
    match response {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(
            serde_json::from_str::<Value>(text)
                .ok()
                .and_then(|parsed| joined_sections(&parsed))
                .unwrap_or_else(|| text.clone()),
        ),
        other => Some(joined_sections(other).unwrap_or_else(|| other.to_string())),
    }
}

fn joined_sections(value: &Value) -> Option<String> {
    let parts: Vec<&str> = value
        .get("sections")?
        .as_array()?
        .iter()
        .filter_map(|section| section.get("section_content").and_then(Value::as_str))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video(value: Value) -> Video {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(
            video(json!({"video_id": "1", "metadata": {"title": "T", "video_name": "N"}})).display_name(),
            "T"
        );
        assert_eq!(
            video(json!({"video_id": "1", "metadata": {"title": "", "video_name": "N"}})).display_name(),
            "N"
        );
        assert_eq!(video(json!({"video_id": "1"})).display_name(), UNTITLED_VIDEO);
    }

    #[test]
    fn test_display_url_fallbacks() {
        assert_eq!(
            video(json!({"video_id": "1", "url": "u", "metadata": {"url": "m"}})).display_url(),
            "u"
        );
        assert_eq!(
            video(json!({"video_id": "1", "metadata": {"url": "m"}})).display_url(),
            "m"
        );
        assert_eq!(video(json!({"video_id": "1"})).display_url(), "");
    }

    #[test]
    fn test_sections_are_joined() {
        let response = QaResponse {
            chat_response: Some(json!(
                r##"{"sections":[{"section_content":"# Roast"},{"title":"x"},{"section_content":"Nice hat."}]}"##
            )),
            ..Default::default()
        };
        assert_eq!(response.resolve(), Roast::Markdown("# Roast\n\nNice hat.".to_string()));
    }

    #[test]
    fn test_plain_chat_response_used_verbatim() {
        let response = QaResponse {
            chat_response: Some(json!("You call that a dance?")),
            system_message: Some(json!("ignored")),
            ..Default::default()
        };
        assert_eq!(
            response.resolve(),
            Roast::Markdown("You call that a dance?".to_string())
        );
    }

    #[test]
    fn test_fallback_precedence() {
        let both = QaResponse {
            chat_response: None,
            system_message: Some(json!("Video still indexing")),
            error: Some(json!("boom")),
        };
        assert_eq!(both.resolve(), Roast::Failed("Video still indexing".to_string()));

        let error_only = QaResponse::from_error("HTTP 500 calling chat endpoint");
        assert_eq!(
            error_only.resolve(),
            Roast::Failed("HTTP 500 calling chat endpoint".to_string())
        );

        assert_eq!(
            QaResponse::default().resolve(),
            Roast::Failed(UNKNOWN_QA_ERROR.to_string())
        );
    }

    #[test]
    fn test_structured_system_message() {
        let response: QaResponse = serde_json::from_value(json!({
            "chat_response": null,
            "system_message": {"message": "Video still indexing", "code": 202}
        }))
        .unwrap();
        assert_eq!(response.resolve(), Roast::Failed("Video still indexing".to_string()));

        let response: QaResponse =
            serde_json::from_value(json!({"system_message": 42, "error": "boom"})).unwrap();
        assert_eq!(response.resolve(), Roast::Failed("42".to_string()));

        let response: QaResponse =
            serde_json::from_value(json!({"system_message": "", "error": "boom"})).unwrap();
        assert_eq!(response.resolve(), Roast::Failed("boom".to_string()));
    }
}
