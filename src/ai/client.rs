use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::api::{ChatMessage, ChatRequest, ChatResponse, ErrorResponse};
use super::errors::{AiError, AiResult};
use crate::config::AiConfig;

const DEFAULT_FAILURE_MESSAGE: &str = "Failed to connect to the AI service";

/// Sends a conversation to a text-generation service and returns its reply
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> AiResult<String>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct OpenAiClient {
    client: Client,
    config: AiConfig,
}

impl OpenAiClient {
    pub fn new(config: AiConfig) -> AiResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> AiResult<String> {
        // Checked before anything goes on the wire
        let api_key = self.config.credential().ok_or(AiError::NotConfigured)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        log::debug!(
            "Sending {} messages to {} ({})",
            messages.len(),
            self.endpoint(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            log::warn!("AI request failed with {}: {}", status, message);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::Unauthorized(message),
                _ => AiError::Remote {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                AiError::MalformedOutput(format!("unexpected response body: {}", e))
            } else {
                AiError::Http(e)
            }
        })?;

        body.into_text().ok_or(AiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AiConfig {
        AiConfig {
            base_url: format!("{}/v1", server.uri()),
            api_key: Some("sk-test".to_string()),
            ..AiConfig::default()
        }
    }

    fn completion(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
        })
    }

    #[tokio::test]
    async fn test_complete_sends_request_and_reads_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi there")))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        let reply = client.complete(&[ChatMessage::user("hello")]).await.unwrap();
        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.api_key = Some(crate::config::API_KEY_PLACEHOLDER.to_string());
        let client = OpenAiClient::new(config).unwrap();

        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }

    #[tokio::test]
    async fn test_unauthorized_surfaces_remote_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();
        match err {
            AiError::Unauthorized(message) => assert_eq!(message, "Incorrect API key provided"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_without_body_uses_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();
        match err {
            AiError::Remote { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, DEFAULT_FAILURE_MESSAGE);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        let err = client.complete(&[ChatMessage::user("hello")]).await.unwrap_err();
        assert!(matches!(err, AiError::MalformedOutput(_)));
    }
}
