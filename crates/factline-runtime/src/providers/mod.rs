//! Language-model provider abstractions.
//!
//! The analyzer talks to the model only through [`LlmProvider`], so tests
//! substitute in-process mocks and deployments can swap backends.
//!
//! ## Security
//!
//! Providers hold their keys as [`ApiCredential`]; see the [`secrets`]
//! module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod gemini;
pub mod secrets;

pub use gemini::{GeminiProvider, GEMINI_API_KEY_ENV};
pub use secrets::{ApiCredential, CredentialSource};

/// Errors from LLM providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Model returned no candidates")]
    EmptyResponse,
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,

    /// Ask the provider to constrain output to JSON
    pub json_output: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 2048,
            temperature: 0.2,
            timeout: Duration::from_secs(30),
            json_output: true,
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    pub usage: TokenUsage,

    /// Model used
    pub model: String,

    /// Stop reason
    pub stop_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Provider abstraction allows swapping LLM backends.
///
/// The analyzer makes exactly one `complete` call per fact-check.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Provider name for logs and status.
    fn name(&self) -> &str;

    /// Whether the provider has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }

    /// Estimate tokens for a prompt.
    fn estimate_tokens(&self, text: &str) -> u32 {
        // ~4 chars per token
        (text.len() / 4) as u32
    }
}
