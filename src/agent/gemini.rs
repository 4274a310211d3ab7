// ABOUTME: Gemini generateContent client — authenticates with an API key query parameter.
// ABOUTME: Concatenates the text parts of the first candidate into one completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::provider::LlmClient;
use crate::config::ProviderSettings;
use crate::error::{MeetingError, Result};

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, settings: &ProviderSettings, api_key: String) -> Self {
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.trim_start_matches("models/").to_string(),
            temperature: settings.temperature,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| MeetingError::provider("gemini", e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MeetingError::provider("gemini", e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(MeetingError::provider(
                "gemini",
                format!("HTTP {}: {}", status.as_u16(), error_message(&body)),
            ));
        }
        parse_response(&body)
    }
}

/// Extract the completion text from a generateContent response body.
pub fn parse_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| MeetingError::provider("gemini", format!("malformed response: {}", e)))?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(MeetingError::provider(
            "gemini",
            format!("prompt blocked: {}", reason),
        ));
    }

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(MeetingError::provider("gemini", "response contained no text"));
    }
    Ok(text)
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
    fn joins_text_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Check the "}, {"text": "contract."}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "Check the contract.");
    }

    #[test]
    fn blocked_prompt_is_provider_error() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = parse_response(body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn no_candidates_is_provider_error() {
        let err = parse_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(err.to_string().contains("no text"));
    }

    #[test]
    fn error_message_reads_api_error() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
    }

    #[test]
    fn endpoint_accepts_prefixed_model_names() {
        let mut settings = ProviderSettings::gemini();
        settings.model = "models/gemini-1.5-pro".to_string();
        let client = GeminiClient::new(reqwest::Client::new(), &settings, "k".to_string());
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }
}
