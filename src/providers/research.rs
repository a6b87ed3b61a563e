use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use super::base::{Completion, EventStream, Provider};
use super::configs::ResearchProviderConfig;
use super::sse::decode_events;
use super::types::chunk::ChatCompletion;
use super::types::request::ChatRequest;
use super::utils::{api_error, upstream_error_message};
use crate::errors::{ClientError, ClientResult};
use crate::stream::ReasoningStep;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// OpenAI-compatible client for the research completions endpoint.
pub struct ResearchProvider {
    client: Client,
    config: ResearchProviderConfig,
}

impl ResearchProvider {
    pub fn new(config: ResearchProviderConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ResearchProviderConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.host.trim_end_matches('/'))
    }

    async fn post(&self, request: &ChatRequest) -> ClientResult<reqwest::Response> {
        info!(
            model = %request.model,
            stream = request.stream,
            structured = request.response_format.is_some(),
            "Calling research API"
        );

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl Provider for ResearchProvider {
    async fn stream(&self, mut request: ChatRequest) -> ClientResult<EventStream> {
        request.stream = true;
        let response = self.post(&request).await?;
        Ok(decode_events(response.bytes_stream()))
    }

    async fn complete(&self, mut request: ChatRequest) -> ClientResult<Completion> {
        request.stream = false;
        let response = self.post(&request).await?;
        let status = response.status().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            return Err(ClientError::Api {
                status,
                message: upstream_error_message(error),
            });
        }

        let completion: ChatCompletion =
            serde_json::from_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| ClientError::Decode("Response contained no choices".to_string()))?;

        Ok(Completion {
            content: message.content.unwrap_or_default(),
            reasoning_steps: message
                .reasoning_steps
                .unwrap_or_default()
                .into_iter()
                .map(ReasoningStep::from)
                .collect(),
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
