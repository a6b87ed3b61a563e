use serde::Serialize;
use serde_json::{json, Value};

use super::message::Message;

/// Body of a `chat/completions` call. `research` rides alongside the
/// OpenAI-compatible fields.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchOptions>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            response_format: None,
            research: None,
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn with_web_search(mut self, web_search: WebSearchConfig) -> Self {
        self.research = Some(ResearchOptions { web_search });
        self
    }
}

/// A strict JSON-schema response format.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: Value,
}

impl ResponseFormat {
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

impl Serialize for ResponseFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "strict": true,
                "schema": self.schema,
            }
        })
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchOptions {
    pub web_search: WebSearchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebSearchConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub scope: Option<DomainScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<UserLocation>,
}

impl WebSearchConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, scope: Option<DomainScope>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    pub fn with_location(mut self, location: ApproximateLocation) -> Self {
        self.user_location = Some(UserLocation {
            approximate: location,
        });
        self
    }
}

/// Restricts web search to, or away from, a set of domains. The two lists are
/// mutually exclusive; no scope at all means unrestricted search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainScope {
    AllowedDomains(Vec<String>),
    BlockedDomains(Vec<String>),
}

impl DomainScope {
    /// Parse one domain per line. Returns `None` when no domain survives trimming.
    pub fn allowed_from_lines(text: &str) -> Option<Self> {
        Some(Self::AllowedDomains(parse_domains(text)?))
    }

    pub fn blocked_from_lines(text: &str) -> Option<Self> {
        Some(Self::BlockedDomains(parse_domains(text)?))
    }

    pub fn allowed(domains: Vec<String>) -> Option<Self> {
        Self::allowed_from_lines(&domains.join("\n"))
    }

    pub fn blocked(domains: Vec<String>) -> Option<Self> {
        Self::blocked_from_lines(&domains.join("\n"))
    }
}

fn parse_domains(text: &str) -> Option<Vec<String>> {
    let domains: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if domains.is_empty() {
        None
    } else {
        Some(domains)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLocation {
    pub approximate: ApproximateLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApproximateLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}
