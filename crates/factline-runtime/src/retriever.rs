//! Evidence retrieval across the search-provider cascade.

use std::sync::Arc;
use std::time::Duration;

use factline_core::{EvidenceItem, EvidenceSet};

use crate::search::SearchProvider;

/// Cascades through search providers in priority order.
///
/// Retrieval never fails: provider errors and timeouts are logged and
/// treated as "no result from this provider". When every provider comes up
/// empty the caller gets the synthetic fallback set.
#[derive(Clone)]
pub struct EvidenceRetriever {
    providers: Vec<Arc<dyn SearchProvider>>,
    provider_timeout: Duration,
    max_results: usize,
}

impl EvidenceRetriever {
    pub fn new(
        providers: Vec<Arc<dyn SearchProvider>>,
        provider_timeout: Duration,
        max_results: usize,
    ) -> Self {
        Self {
            providers,
            provider_timeout,
            max_results,
        }
    }

    pub fn providers(&self) -> &[Arc<dyn SearchProvider>] {
        &self.providers
    }

    /// Retrieve evidence for a headline. Never empty.
    pub async fn retrieve(&self, headline: &str) -> EvidenceSet {
        let items = self.search(headline).await;
        if items.is_empty() {
            tracing::info!("No provider returned evidence, using fallback item");
        }
        EvidenceSet::from_items(headline, items)
    }

    /// Run the cascade and return the first non-empty result, truncated to
    /// `max_results`. Empty when every provider fails or finds nothing.
    pub async fn search(&self, text: &str) -> Vec<EvidenceItem> {
        for provider in &self.providers {
            if !provider.is_configured() {
                tracing::debug!(provider = provider.name(), "Provider not configured, skipping");
                continue;
            }

            let mut items = match tokio::time::timeout(self.provider_timeout, provider.query(text)).await {
                Ok(Ok(items)) => items,
                Ok(Err(e)) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Search provider failed");
                    continue;
                }
                Err(_) => {
                    tracing::warn!(
                        provider = provider.name(),
                        timeout = ?self.provider_timeout,
                        "Search provider timed out"
                    );
                    continue;
                }
            };

            items.retain(|item| !item.summary().trim().is_empty());
            if items.is_empty() {
                tracing::debug!(provider = provider.name(), "Provider returned no usable items");
                continue;
            }

            items.truncate(self.max_results);
            tracing::info!(provider = provider.name(), items = items.len(), "Evidence retrieved");
            return items;
        }

        Vec::new()
    }
}

impl std::fmt::Debug for EvidenceRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceRetriever")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("provider_timeout", &self.provider_timeout)
            .field("max_results", &self.max_results)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchError;
    use async_trait::async_trait;
    use factline_core::{Relevance, Stance, FALLBACK_SOURCE};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Items(Vec<EvidenceItem>),
        Fail,
        Hang,
        Unconfigured,
    }

    struct MockProvider {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchProvider for MockProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn is_configured(&self) -> bool {
            !matches!(self.behavior, Behavior::Unconfigured)
        }

        async fn query(&self, _text: &str) -> Result<Vec<EvidenceItem>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Items(items) => Ok(items.clone()),
                Behavior::Fail => Err(SearchError::Http("connection refused".into())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(vec![])
                }
                Behavior::Unconfigured => Err(SearchError::NotConfigured("mock")),
            }
        }
    }

    fn items(source: &str, n: usize) -> Vec<EvidenceItem> {
        (0..n)
            .map(|i| EvidenceItem::retrieved(source, format!("{} item {}", source, i), Relevance::Medium))
            .collect()
    }

    fn retriever(providers: Vec<Arc<dyn SearchProvider>>) -> EvidenceRetriever {
        EvidenceRetriever::new(providers, Duration::from_secs(10), 5)
    }

    #[tokio::test]
    async fn first_non_empty_provider_wins() {
        let first = MockProvider::new("first", Behavior::Items(vec![]));
        let second = MockProvider::new("second", Behavior::Items(items("B", 2)));
        let third = MockProvider::new("third", Behavior::Items(items("C", 2)));

        let set = retriever(vec![first.clone(), second.clone(), third.clone()])
            .retrieve("Rain floods Mumbai")
            .await;

        assert_eq!(set.sources(), vec!["B"]);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);
    }

    #[tokio::test]
    async fn failures_fall_through() {
        let failing = MockProvider::new("failing", Behavior::Fail);
        let working = MockProvider::new("working", Behavior::Items(items("W", 1)));

        let set = retriever(vec![failing, working]).retrieve("headline").await;
        assert_eq!(set.len(), 1);
        assert_eq!(set.items()[0].source(), "W");
    }

    #[tokio::test]
    async fn unconfigured_providers_are_never_queried() {
        let skipped = MockProvider::new("news", Behavior::Unconfigured);
        let working = MockProvider::new("web", Behavior::Items(items("W", 1)));

        retriever(vec![skipped.clone(), working]).retrieve("headline").await;
        assert_eq!(skipped.calls(), 0);
    }

    #[tokio::test]
    async fn results_are_truncated() {
        let many = MockProvider::new("many", Behavior::Items(items("M", 9)));
        let set = retriever(vec![many]).retrieve("headline").await;
        assert_eq!(set.len(), 5);
    }

    #[tokio::test]
    async fn blank_summaries_are_dropped() {
        let mut list = items("A", 1);
        list.push(EvidenceItem::retrieved("A", "   ", Relevance::High));
        let provider = MockProvider::new("a", Behavior::Items(list));

        let set = retriever(vec![provider]).retrieve("headline").await;
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn all_failing_yields_fallback() {
        let set = retriever(vec![
            MockProvider::new("a", Behavior::Fail),
            MockProvider::new("b", Behavior::Items(vec![])),
        ])
        .retrieve("Munich got nuked today")
        .await;

        assert_eq!(set.len(), 1);
        assert!(set.is_fallback());
        assert_eq!(set.items()[0].source(), FALLBACK_SOURCE);
        assert_eq!(set.items()[0].stance(), Stance::Contradicts);
    }

    #[tokio::test]
    async fn no_providers_yields_fallback() {
        let set = retriever(vec![]).retrieve("headline").await;
        assert!(set.is_fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let slow = MockProvider::new("slow", Behavior::Hang);
        let fast = MockProvider::new("fast", Behavior::Items(items("F", 1)));

        let retriever = EvidenceRetriever::new(vec![slow, fast], Duration::from_millis(50), 5);
        let set = retriever.retrieve("headline").await;
        assert_eq!(set.items()[0].source(), "F");
    }

    #[tokio::test]
    async fn retrieved_items_stay_unclear() {
        let provider = MockProvider::new("p", Behavior::Items(items("P", 3)));
        let set = retriever(vec![provider]).retrieve("headline").await;
        assert!(set.iter().all(|i| i.stance() == Stance::Unclear));
    }
}
