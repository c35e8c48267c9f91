//! LLM-assisted verdict analysis.

use std::sync::Arc;

use factline_core::{decode_analysis, AnalysisResult, EvidenceSet};

use crate::prompts::{user_prompt, SYSTEM_PROMPT};
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};

/// Asks the language model for a structured analysis of one headline.
///
/// Makes exactly one model call per analysis and never fails: call errors,
/// timeouts and undecodable responses all become
/// [`AnalysisResult::fallback`].
#[derive(Clone)]
pub struct VerdictAnalyzer {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
}

impl VerdictAnalyzer {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider,
            completion,
        }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.completion.model
    }

    pub async fn analyze(&self, headline: &str, evidence: &EvidenceSet) -> AnalysisResult {
        let user = user_prompt(headline, evidence);
        tracing::trace!(
            provider = self.provider.name(),
            estimated_tokens = self.provider.estimate_tokens(SYSTEM_PROMPT) + self.provider.estimate_tokens(&user),
            "Prompt built"
        );

        let messages = vec![ChatMessage::system(SYSTEM_PROMPT.trim()), ChatMessage::user(user)];
        let timeout = self.completion.timeout;

        let response = match tokio::time::timeout(timeout, self.provider.complete(messages, &self.completion)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Model call failed, using fallback analysis");
                return AnalysisResult::fallback(format!("language model call failed: {}", e));
            }
            Err(_) => {
                tracing::warn!(provider = self.provider.name(), timeout = ?timeout, "Model call timed out, using fallback analysis");
                return AnalysisResult::fallback(format!(
                    "language model did not respond within {}s",
                    timeout.as_secs_f64()
                ));
            }
        };

        tracing::debug!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            chars = response.content.len(),
            "Model response received"
        );

        match decode_analysis(&response.content) {
            Ok(analysis) => {
                tracing::info!(
                    truthfulness = analysis.truthfulness(),
                    confidence = analysis.confidence(),
                    "Analysis decoded"
                );
                analysis
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model response rejected, using fallback analysis");
                AnalysisResult::fallback(format!("model response could not be decoded: {}", e))
            }
        }
    }
}

impl std::fmt::Debug for VerdictAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerdictAnalyzer")
            .field("provider", &self.provider.name())
            .field("model", &self.completion.model)
            .finish()
    }
}
