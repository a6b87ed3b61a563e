use serde_json::Value;

use crate::providers::types::chunk::{ChatCompletionChunk, WireReasoningStep, WireToolCall};

/// What the transport hands the reducer for each SSE data line.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Fragment(Fragment),
    /// The line could not be decoded. Only this line is lost.
    Malformed { reason: String },
}

/// One incremental unit of a streamed response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub reasoning: Option<ReasoningDelta>,
    pub content: Option<String>,
}

/// Structured steps win over a bare reasoning delta when a chunk carries both.
#[derive(Debug, Clone, PartialEq)]
pub enum ReasoningDelta {
    Steps(Vec<ReasoningStep>),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReasoningStep {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
    /// Name of the tool whose output this step reports.
    pub executed_tool: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub args: Value,
}

impl Fragment {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            reasoning: None,
            content: Some(text.into()),
        }
    }

    pub fn reasoning_text(text: impl Into<String>) -> Self {
        Self {
            reasoning: Some(ReasoningDelta::Text(text.into())),
            content: None,
        }
    }

    pub fn steps(steps: Vec<ReasoningStep>) -> Self {
        Self {
            reasoning: Some(ReasoningDelta::Steps(steps)),
            content: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reasoning.is_none() && self.content.is_none()
    }
}

impl ReasoningStep {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn tool_call(name: impl Into<String>, args: Value) -> Self {
        Self {
            tool_calls: vec![ToolInvocation {
                name: name.into(),
                args,
            }],
            ..Default::default()
        }
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

impl From<ChatCompletionChunk> for Fragment {
    fn from(chunk: ChatCompletionChunk) -> Self {
        let Some(delta) = chunk.choices.into_iter().next().and_then(|c| c.delta) else {
            return Fragment::default();
        };

        let steps: Vec<ReasoningStep> = delta
            .reasoning_steps
            .unwrap_or_default()
            .into_iter()
            .map(ReasoningStep::from)
            .collect();

        let reasoning = if !steps.is_empty() {
            Some(ReasoningDelta::Steps(steps))
        } else {
            non_empty(delta.reasoning_content).map(ReasoningDelta::Text)
        };

        Fragment {
            reasoning,
            content: non_empty(delta.content),
        }
    }
}

impl From<WireReasoningStep> for ReasoningStep {
    fn from(step: WireReasoningStep) -> Self {
        let executed_tool = step
            .content
            .as_ref()
            .and_then(|c| c.get("tool_name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            text: non_empty(step.reasoning_content),
            tool_calls: step
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .filter_map(ToolInvocation::from_wire)
                .collect(),
            executed_tool,
        }
    }
}

impl ToolInvocation {
    fn from_wire(call: WireToolCall) -> Option<Self> {
        let name = call.name.or(call.tool_name)?;
        Some(Self {
            name,
            args: call.args.unwrap_or(Value::Null),
        })
    }
}
