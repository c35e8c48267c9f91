//! Google Gemini provider.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.
//! The key is sent in the `x-goog-api-key` header, never in the URL, so it
//! cannot leak through request logging.

use super::{
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini provider.
pub struct GeminiProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a provider from an already-loaded credential.
    pub fn new(credential: ApiCredential, user_agent: &str) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ProviderError::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Create from a raw key.
    pub fn with_key(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let credential =
            ApiCredential::new(api_key, CredentialSource::Programmatic, "Gemini API key");
        Self::new(credential, concat!("factline/", env!("CARGO_PKG_VERSION")))
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

fn text_content(role: Option<&str>, text: String) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part { text: Some(text) }],
    }
}

/// Split chat messages into Gemini's system instruction and contents.
fn build_request(messages: Vec<ChatMessage>, config: &CompletionConfig) -> GenerateRequest {
    let mut system = Vec::new();
    let mut contents = Vec::new();

    for msg in messages {
        match msg.role.as_str() {
            "system" => system.push(msg.content),
            "assistant" => contents.push(text_content(Some("model"), msg.content)),
            _ => contents.push(text_content(Some("user"), msg.content)),
        }
    }

    GenerateRequest {
        system_instruction: if system.is_empty() {
            None
        } else {
            Some(text_content(None, system.join("\n\n")))
        },
        contents,
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
            response_mime_type: config.json_output.then_some("application/json"),
        },
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = build_request(messages, config);

        // Only expose the credential here, at the point of use
        let response = self
            .client
            .post(self.endpoint(&config.model))
            .header("x-goog-api-key", self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::AuthError);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage = body
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: body.model_version.unwrap_or_else(|| config.model.clone()),
            stop_reason: candidate.finish_reason,
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        !self.credential.is_empty()
    }
}
