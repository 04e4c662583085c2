use crate::config::azure::AzureOpenAiConfig;
use crate::core::{ChatCompletion, ChatRequest};
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Chat completions against one Azure OpenAI deployment. One attempt per call.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    config: AzureOpenAiConfig,
    client: Client,
}

impl AzureOpenAiClient {
    pub fn new(config: AzureOpenAiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment_name,
            self.config.api_version
        )
    }
}

/// Azure wraps failures as `{"error": {"message": ...}}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl ChatCompletion for AzureOpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let url = self.chat_url();
        tracing::debug!(
            "POST chat completion to deployment {} ({} messages)",
            self.config.deployment_name,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Chat completion response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ReportError::AuthenticationError {
                        status: status.as_u16(),
                        message,
                    }
                }
                StatusCode::TOO_MANY_REQUESTS => ReportError::RateLimitError { message },
                _ => ReportError::ServiceError {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = response.text().await?;
        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| ReportError::ServiceError {
                status: status.as_u16(),
                message: format!("unreadable completion response: {}", e),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ReportError::EmptyResponseError {
                message: format!("deployment {} returned no message content", self.config.deployment_name),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChatMessage;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> AzureOpenAiClient {
        AzureOpenAiClient::new(AzureOpenAiConfig::new(
            "test-key",
            "gpt-test",
            server.base_url(),
            "2024-10-21",
        ))
    }

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::system("Be brief."), ChatMessage::user("{\"a\": 1}")],
        }
    }

    const CHAT_PATH: &str = "/openai/deployments/gpt-test/chat/completions";

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let client = AzureOpenAiClient::new(AzureOpenAiConfig::new(
            "k",
            "dep",
            "https://example.openai.azure.com/",
            "2024-10-21",
        ));
        assert_eq!(
            client.chat_url(),
            "https://example.openai.azure.com/openai/deployments/dep/chat/completions?api-version=2024-10-21"
        );
    }

    #[tokio::test]
    async fn test_complete_posts_messages_and_returns_content() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(CHAT_PATH)
                .query_param("api-version", "2024-10-21")
                .header("api-key", "test-key")
                .json_body(serde_json::json!({
                    "messages": [
                        {"role": "system", "content": "Be brief."},
                        {"role": "user", "content": "{\"a\": 1}"}
                    ]
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello report"}}]
                }));
        });

        let text = client_for(&server).complete(request()).await.unwrap();

        api_mock.assert();
        assert_eq!(text, "Hello report");
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(401)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"error": {"code": "401", "message": "Access denied"}}));
        });

        let result = client_for(&server).complete(request()).await;

        api_mock.assert();
        match result {
            Err(ReportError::AuthenticationError { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Access denied");
            }
            other => panic!("expected AuthenticationError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(429).body("quota exceeded");
        });

        let result = client_for(&server).complete(request()).await;

        api_mock.assert_hits(1);
        assert!(matches!(result, Err(ReportError::RateLimitError { .. })));
    }

    #[tokio::test]
    async fn test_server_error_is_service_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(503).body("unavailable");
        });

        let result = client_for(&server).complete(request()).await;

        match result {
            Err(ReportError::ServiceError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "unavailable");
            }
            other => panic!("expected ServiceError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_service_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(200).body("<html>gateway</html>");
        });

        let result = client_for(&server).complete(request()).await;

        match result {
            Err(e @ ReportError::ServiceError { status: 200, .. }) => {
                assert_eq!(e.exit_code(), 2);
            }
            other => panic!("expected ServiceError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_response_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(CHAT_PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"choices": []}));
        });

        let result = client_for(&server).complete(request()).await;
        assert!(matches!(result, Err(ReportError::EmptyResponseError { .. })));
    }
}
