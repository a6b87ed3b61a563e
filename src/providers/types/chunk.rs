//! Wire shapes of the research completions API, streaming and non-streaming.
//!
//! Everything here is lenient: unknown fields are ignored and absent fields
//! default, so that a chunk only fails to decode when it is not JSON at all.

use serde::Deserialize;
use serde_json::Value;

/// One `data:` payload of the SSE stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
    #[serde(default)]
    pub reasoning_steps: Option<Vec<WireReasoningStep>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireReasoningStep {
    #[serde(default)]
    pub reasoning_content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
    /// Tool output steps carry `{tool_name, tool_output}`; other steps may carry text.
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireToolCall {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub args: Option<Value>,
}

/// Body of a non-streaming completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_steps: Option<Vec<WireReasoningStep>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_reasoning_chunk() {
        let chunk: ChatCompletionChunk = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "choices": [{
                "index": 0,
                "delta": {
                    "reasoning_steps": [{
                        "role": "assistant",
                        "reasoning_content": "Looking up events",
                        "tool_calls": [{"name": "search_web", "args": {"query": "tech conferences"}}]
                    }]
                }
            }]
        }))
        .unwrap();

        let delta = chunk.choices[0].delta.as_ref().unwrap();
        let steps = delta.reasoning_steps.as_ref().unwrap();
        assert_eq!(steps[0].reasoning_content.as_deref(), Some("Looking up events"));
        let calls = steps[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].name.as_deref(), Some("search_web"));
        assert_eq!(calls[0].args, Some(json!({"query": "tech conferences"})));
    }

    #[test]
    fn test_decode_usage_only_chunk() {
        let chunk: ChatCompletionChunk =
            serde_json::from_value(json!({"choices": [], "usage": {"total_tokens": 10}})).unwrap();
        assert!(chunk.choices.is_empty());
        assert!(chunk.error.is_none());
    }
}
