//! Search providers that supply evidence for a headline.
//!
//! Each backend implements [`SearchProvider`]. The retriever consults them in
//! a fixed priority order and stops at the first one that returns anything:
//!
//! 1. [`InstantAnswerProvider`] - DuckDuckGo Instant Answer API
//! 2. [`NewsSearchProvider`] - NewsAPI, only when a key is configured
//! 3. [`WebSearchProvider`] - DuckDuckGo HTML results

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use factline_core::EvidenceItem;

mod instant_answer;
mod news;
mod web;

pub use instant_answer::InstantAnswerProvider;
pub use news::{NewsSearchProvider, TopHeadline};
pub use web::WebSearchProvider;

/// Errors from a single search provider. The retriever recovers from all of
/// them; none reach the caller of `fact_check`.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("unexpected status {status} from {provider}")]
    Status { provider: &'static str, status: u16 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// A pluggable evidence source.
///
/// Providers never judge stance: every item they return starts out
/// [`Stance::Unclear`](factline_core::Stance::Unclear).
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Human-readable name used in logs and status.
    fn name(&self) -> &str;

    /// Whether the provider can be queried at all. Unconfigured providers are
    /// skipped without a request.
    fn is_configured(&self) -> bool {
        true
    }

    /// Query the provider for evidence about `text`.
    async fn query(&self, text: &str) -> Result<Vec<EvidenceItem>, SearchError>;
}

/// Build the HTTP client shared by a provider's requests.
pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Map a reqwest failure into a [`SearchError`] with provider context.
pub(crate) fn http_error(provider: &str, e: reqwest::Error) -> SearchError {
    SearchError::Http(format!("{provider} request failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use factline_core::{Relevance, Stance};

    struct StaticProvider {
        items: Vec<EvidenceItem>,
    }

    #[async_trait]
    impl SearchProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        async fn query(&self, _text: &str) -> Result<Vec<EvidenceItem>, SearchError> {
            Ok(self.items.clone())
        }
    }

    #[test]
    fn provider_trait_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SearchProvider>();
    }

    #[tokio::test]
    async fn default_is_configured() {
        let provider = StaticProvider {
            items: vec![EvidenceItem::retrieved("Reuters", "s", Relevance::High)],
        };
        assert!(provider.is_configured());
        let items = provider.query("anything").await.unwrap();
        assert_eq!(items[0].stance(), Stance::Unclear);
    }

    #[test]
    fn build_client_succeeds() {
        assert!(build_client("factline/test", Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn error_display() {
        let err = SearchError::Status {
            provider: "NewsAPI",
            status: 426,
        };
        assert_eq!(err.to_string(), "unexpected status 426 from NewsAPI");
    }
}
