use async_trait::async_trait;
use futures::stream::BoxStream;

use super::types::request::ChatRequest;
use crate::errors::ClientResult;
use crate::stream::{ReasoningStep, StreamEvent};

pub type EventStream = BoxStream<'static, ClientResult<StreamEvent>>;

/// Result of a non-streaming completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: String,
    pub reasoning_steps: Vec<ReasoningStep>,
}

/// A chat-completion backend that can answer either as a stream of
/// fragments or in one piece.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Start a streaming completion. Errors here are raised before the first
    /// fragment; later failures arrive inside the stream.
    async fn stream(&self, request: ChatRequest) -> ClientResult<EventStream>;

    async fn complete(&self, request: ChatRequest) -> ClientResult<Completion>;

    /// Model identifier requests should carry.
    fn model(&self) -> &str;
}
