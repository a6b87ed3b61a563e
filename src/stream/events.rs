use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::providers::types::request::ResponseFormat;

pub const UNTITLED: &str = "Untitled";
pub const DATE_TBD: &str = "Date TBD";
pub const NO_URL: &str = "No url found";
pub const FALLBACK_LINK: &str = "#";

/// Structured answer of the event finder: `{ events: [ { title, date, url } ] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventList {
    pub events: Vec<Event>,
}

/// The schema requires all three fields; a missing one still renders with a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Event {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl EventList {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Event {
    pub fn new(title: &str, date: &str, url: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            date: Some(date.to_string()),
            url: Some(url.to_string()),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn display_date(&self) -> &str {
        self.date.as_deref().unwrap_or(DATE_TBD)
    }

    pub fn display_url(&self) -> &str {
        self.url.as_deref().unwrap_or(NO_URL)
    }

    pub fn link_target(&self) -> &str {
        self.url.as_deref().unwrap_or(FALLBACK_LINK)
    }
}

pub fn event_list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "events": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "date": {"type": "string"},
                        "url": {"type": "string"}
                    },
                    "required": ["title", "date", "url"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["events"],
        "additionalProperties": false
    })
}

pub fn event_list_format() -> ResponseFormat {
    ResponseFormat::json_schema("event_list", event_list_schema())
}
