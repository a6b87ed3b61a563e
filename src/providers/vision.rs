use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::info;

use super::configs::VisionProviderConfig;
use super::utils::{api_error, error_text_from_body};
use crate::errors::{ClientError, ClientResult, ConfigError};
use crate::videos::models::{QaResponse, Video, VideoList};
use crate::videos::VideoSource;

const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

pub const ROAST_PROMPT: &str =
    "Write a funny and gently roast about the person, or the voice in this video. Reply in a markdown format.";

/// Client for the video listing, upload and Q&A endpoints.
pub struct VisionClient {
    client: Client,
    config: VisionProviderConfig,
}

impl VisionClient {
    pub fn new(config: VisionProviderConfig) -> ClientResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &VisionProviderConfig {
        &self.config
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.header("X-Api-Key", key),
            None => builder,
        }
    }

    pub async fn list_videos(&self) -> ClientResult<Vec<Video>> {
        let url = self.config.endpoint("videos/get");
        info!(%url, "Listing videos");

        let response = self
            .authorized(self.client.post(&url))
            .timeout(LIST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let list: VideoList = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(list.results)
    }

    pub async fn upload_video(&self, name: &str, url: &str) -> ClientResult<String> {
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            return Err(ClientError::InvalidInput(
                "Both video_name and video_url are required".to_string(),
            ));
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)?;

        info!(video_name = %name, "Uploading video");
        let response = self
            .client
            .post(self.config.endpoint("videos/upload"))
            .header("X-Api-Key", api_key)
            .form(&[("video_name", name), ("index", "true"), ("video_url", url)])
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or_else(|_| json!({}));

        if status.is_success() {
            let video_id = body
                .get("video_id")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            return Ok(video_id);
        }

        let reason = error_text_from_body(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Err(ClientError::Api {
            status: status.as_u16(),
            message: format!("Upload failed: {}", reason),
        })
    }

    /// Ask the Q&A endpoint to roast a video. Upstream failures come back inside
    /// the [`QaResponse`]; only transport failures are errors.
    pub async fn ask_video(&self, video_id: &str) -> ClientResult<QaResponse> {
        if video_id.trim().is_empty() {
            return Err(ClientError::InvalidInput("No video ID provided".to_string()));
        }
        let payload = json!({
            "video_id": video_id,
            "messages": [{"role": "user", "content": ROAST_PROMPT}]
        });

        info!(%video_id, "Requesting video roast");
        let response = self
            .authorized(self.client.post(&self.config.qa_endpoint))
            .json(&payload)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let mut answer = match serde_json::from_str::<QaResponse>(&text) {
            Ok(answer) => answer,
            Err(_) => QaResponse::from_error(format!("Non-JSON response (status {})", status.as_u16())),
        };

        if !status.is_success() && !answer.has_error() {
            answer.error = Some(Value::String(format!(
                "HTTP {} calling chat endpoint",
                status.as_u16()
            )));
        }
        Ok(answer)
    }
}

#[async_trait]
impl VideoSource for VisionClient {
    async fn list_videos(&self) -> ClientResult<Vec<Video>> {
        VisionClient::list_videos(self).await
    }

    async fn upload_video(&self, name: &str, url: &str) -> ClientResult<String> {
        VisionClient::upload_video(self, name, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::videos::models::Roast;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard, api_key: Option<&str>) -> VisionClient {
        VisionClient::new(VisionProviderConfig::new(
            server.url(),
            api_key.map(str::to_string),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_videos() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/videos/get")
            .match_header("x-api-key", "key")
            .with_status(200)
            .with_body(
                json!({"results": [
                    {"video_id": "a", "metadata": {"title": "Dance", "thumbnail": "t.jpg"}},
                    {"video_id": "b", "url": "https://v/b.mp4", "metadata": {}}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let videos = client_for(&server, Some("key")).list_videos().await.unwrap();

        mock.assert_async().await;
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].display_name(), "Dance");
        assert_eq!(videos[1].display_url(), "https://v/b.mp4");
    }

    #[tokio::test]
    async fn test_list_videos_missing_results_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/videos/get")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        assert!(client_for(&server, None).list_videos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/videos/upload")
            .match_header("x-api-key", "key")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("video_name".into(), "clip".into()),
                Matcher::UrlEncoded("index".into(), "true".into()),
                Matcher::UrlEncoded("video_url".into(), "https://v/clip.mp4".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"video_id":"abc-123"}"#)
            .create_async()
            .await;

        let id = client_for(&server, Some("key"))
            .upload_video(" clip ", "https://v/clip.mp4")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(id, "abc-123");
    }

    #[tokio::test]
    async fn test_upload_failure_messages() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/videos/upload")
            .match_body(Matcher::UrlEncoded("video_name".into(), "bad".into()))
            .with_status(400)
            .with_body(r#"{"message":"Unsupported video url"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/videos/upload")
            .match_body(Matcher::UrlEncoded("video_name".into(), "down".into()))
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let client = client_for(&server, Some("key"));

        match client.upload_video("bad", "https://v/x").await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Upload failed: Unsupported video url");
            }
            other => panic!("unexpected {:?}", other),
        }

        match client.upload_video("down", "https://v/x").await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Upload failed: HTTP 503");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_requires_inputs_and_key() {
        let server = mockito::Server::new_async().await;

        let result = client_for(&server, Some("key")).upload_video("  ", "https://v/x").await;
        assert!(matches!(result, Err(ClientError::InvalidInput(_))));

        let result = client_for(&server, None).upload_video("clip", "https://v/x").await;
        assert!(matches!(
            result,
            Err(ClientError::Config(ConfigError::MissingApiKey))
        ));
    }

    #[tokio::test]
    async fn test_ask_video_requires_id() {
        let server = mockito::Server::new_async().await;
        let result = client_for(&server, None).ask_video(" ").await;
        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_ask_video_sends_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/qa/chat")
            .match_body(Matcher::PartialJson(json!({
                "video_id": "abc",
                "messages": [{"role": "user", "content": ROAST_PROMPT}]
            })))
            .with_status(200)
            .with_body(r#"{"chat_response":"Nice moves."}"#)
            .create_async()
            .await;

        let answer = client_for(&server, Some("key")).ask_video("abc").await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer.resolve(), Roast::Markdown("Nice moves.".to_string()));
    }

    #[tokio::test]
    async fn test_ask_video_error_bodies() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/qa/chat")
            .match_body(Matcher::PartialJson(json!({"video_id": "html"})))
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;
        server
            .mock("POST", "/qa/chat")
            .match_body(Matcher::PartialJson(json!({"video_id": "empty"})))
            .with_status(500)
            .with_body("{}")
            .create_async()
            .await;
        server
            .mock("POST", "/qa/chat")
            .match_body(Matcher::PartialJson(json!({"video_id": "explicit"})))
            .with_status(404)
            .with_body(r#"{"error":"Video not found"}"#)
            .create_async()
            .await;

        let client = client_for(&server, None);

        assert_eq!(
            client.ask_video("html").await.unwrap().resolve(),
            Roast::Failed("Non-JSON response (status 502)".to_string())
        );
        assert_eq!(
            client.ask_video("empty").await.unwrap().resolve(),
            Roast::Failed("HTTP 500 calling chat endpoint".to_string())
        );
        assert_eq!(
            client.ask_video("explicit").await.unwrap().resolve(),
            Roast::Failed("Video not found".to_string())
        );
    }
}
