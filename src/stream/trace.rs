use serde_json::Value;

use super::fragment::{ReasoningStep, ToolInvocation};

const MAX_ARGS_LEN: usize = 600;

/// Append-only log of reasoning lines, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a free-text line. Whitespace-only text is skipped.
    pub fn push_text(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.lines.push(text.to_string());
        true
    }

    /// Append every line a step produces and return how many were added.
    pub fn push_step(&mut self, step: &ReasoningStep) -> usize {
        let before = self.lines.len();
        if let Some(text) = &step.text {
            self.push_text(text);
        }
        for call in &step.tool_calls {
            self.lines.push(describe_tool_call(call));
        }
        if let Some(tool) = &step.executed_tool {
            self.lines.push(format!("Executed {}", tool));
        }
        self.lines.len() - before
    }

    /// Bullet list, one paragraph per line.
    pub fn to_markdown(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("- {}", line))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

pub fn describe_tool_call(call: &ToolInvocation) -> String {
    match call.name.as_str() {
        "search_web" => {
            let query = call.args.get("query").and_then(Value::as_str).unwrap_or_default();
            format!("Searching the web for: \"{}\"", query)
        }
        "analyze" => format!("Analyzing webpages: {}", describe_urls(call.args.get("urls"))),
        name => format!("Calling {}: {}", name, truncate(&call.args.to_string(), MAX_ARGS_LEN)),
    }
}

fn describe_urls(urls: Option<&Value>) -> String {
    match urls {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(url)) => url.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
