// ABOUTME: OpenAI chat-completions client — one user message in, one text completion out.
// ABOUTME: Non-streaming; HTTP and body errors map to MeetingError::Provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::provider::LlmClient;
use crate::config::ProviderSettings;
use crate::error::{MeetingError, Result};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
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

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, settings: &ProviderSettings, api_key: String) -> Self {
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MeetingError::provider("openai", e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MeetingError::provider("openai", e.to_string()))?;

        if !status.is_success() {
            return Err(MeetingError::provider(
                "openai",
                format!("HTTP {}: {}", status.as_u16(), error_message(&body)),
            ));
        }
        parse_response(&body)
    }
}

/// Extract the completion text from a chat-completions response body.
pub fn parse_response(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| MeetingError::provider("openai", format!("malformed response: {}", e)))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| MeetingError::provider("openai", "response contained no choices"))
}

/// Best-effort message from an error body; falls back to the raw body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Budget looks fine."}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Budget looks fine.");
    }

    #[test]
    fn empty_choices_is_provider_error() {
        let err = parse_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, MeetingError::Provider { .. }));
    }

    #[test]
    fn malformed_body_is_provider_error() {
        let err = parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(err.to_string().contains("malformed response"));
    }

    #[test]
    fn error_message_prefers_api_message() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#;
        assert_eq!(error_message(body), "You exceeded your current quota");
        assert_eq!(error_message(" gateway timeout \n"), "gateway timeout");
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let mut settings = ProviderSettings::openai();
        settings.base_url = "http://localhost:8080/v1/".to_string();
        let client = OpenAiClient::new(reqwest::Client::new(), &settings, "k".to_string());
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4");
    }
}
