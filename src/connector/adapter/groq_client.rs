use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::DomainError;

/// Default target: Groq's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f32 = 0.1;
/// Large enough for a combined reply covering a full small batch.
const MAX_TOKENS: u32 = 2000;

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for Groq's chat completions API (and any other
/// OpenAI-compatible server).
///
/// The prompt is sent as a single user message; the first choice's text is
/// returned as-is. Configure it from the environment:
///
/// ```text
/// GROQ_API_KEY=gsk_...
/// GROQ_BASE_URL=https://api.groq.com/openai
/// GROQ_MODEL=llama3-8b-8192
/// ```
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl GroqClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::config(format!("GroqClient: failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            url,
        })
    }

    /// Construct from environment variables:
    ///
    /// | Variable        | Default                        | Purpose              |
    /// |-----------------|--------------------------------|----------------------|
    /// | `GROQ_API_KEY`  | required                       | Bearer token         |
    /// | `GROQ_BASE_URL` | `https://api.groq.com/openai`  | Any compatible server |
    /// | `GROQ_MODEL`    | `llama3-8b-8192`               | Model name           |
    pub fn from_env(timeout: Duration) -> Result<Self, DomainError> {
        let key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                DomainError::config("GROQ_API_KEY is not set (use --mock-llm to run offline)")
            })?;
        let base = std::env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(key, model, base, timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let request = ApiRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("GroqClient: sending {} prompt chars to {}", prompt.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::completion(format!("GroqClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GroqClient: API returned {status}: {body}");
            return Err(DomainError::completion(format!(
                "GroqClient: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::completion(format!("GroqClient: failed to parse response: {e}"))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| DomainError::completion("GroqClient: response contained no choices"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_joins_base_url_and_path() {
        let client = GroqClient::new(
            "key",
            DEFAULT_MODEL,
            "http://localhost:8080/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn response_body_deserializes_first_choice() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_completion_error() {
        let client = GroqClient::new(
            "key",
            DEFAULT_MODEL,
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client.complete("hello").await.unwrap_err();
        assert!(err.is_completion_error());
    }
}
