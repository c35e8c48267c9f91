//! The end-to-end fact-checking pipeline.
//!
//! 1. Validate the headline (no network on failure)
//! 2. Retrieve evidence through the provider cascade
//! 3. Ask the model for an analysis
//! 4. Merge stance assessments into the evidence
//! 5. Classify and assemble the [`Report`]

use chrono::{DateTime, Utc};
use std::sync::Arc;

use factline_core::{validate_headline, ProviderStatus, Region, Report, ServiceStatus, TrendingReport};

use crate::analyzer::VerdictAnalyzer;
use crate::config::{ConfigError, FactCheckConfig, Settings};
use crate::providers::{CompletionConfig, GeminiProvider, LlmProvider, GEMINI_API_KEY_ENV};
use crate::retriever::EvidenceRetriever;
use crate::search::{InstantAnswerProvider, NewsSearchProvider, SearchProvider, WebSearchProvider};
use crate::trending::TrendingService;
use crate::FactCheckError;

/// Source of report timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Checks headlines against retrieved evidence.
///
/// Holds only shared immutable state, so one instance can serve concurrent
/// calls from multiple tasks.
#[derive(Clone)]
pub struct FactChecker {
    retriever: EvidenceRetriever,
    analyzer: VerdictAnalyzer,
    trending: TrendingService,
    clock: Clock,
}

impl FactChecker {
    /// Build the default cascade (Instant Answer, NewsAPI, web) and the
    /// Gemini provider from configuration.
    pub fn from_config(config: FactCheckConfig) -> Result<Self, FactCheckError> {
        config.validate()?;

        let FactCheckConfig {
            gemini_api_key,
            news_api_key,
            settings,
        } = config;

        let agent = settings.user_agent.as_str();
        let timeout = settings.provider_timeout;
        let endpoints = &settings.endpoints;

        let instant = Arc::new(InstantAnswerProvider::new(
            endpoints.instant_answer.as_str(),
            agent,
            timeout,
            settings.max_results,
        )?);
        let news = Arc::new(NewsSearchProvider::new(
            endpoints.news_api.as_str(),
            news_api_key,
            agent,
            timeout,
        )?);
        let web = Arc::new(WebSearchProvider::new(
            endpoints.web_search.as_str(),
            agent,
            timeout,
            settings.max_results,
        )?);
        let llm = Arc::new(GeminiProvider::new(gemini_api_key, agent)?.with_base_url(endpoints.gemini.as_str()));

        tracing::info!(
            model = %settings.model,
            news_api = news.is_configured(),
            "Fact checker configured"
        );

        Self::builder()
            .search_provider(instant)
            .search_provider(news.clone())
            .search_provider(web)
            .news(news)
            .llm(llm)
            .settings(settings)
            .build()
    }

    pub fn builder() -> FactCheckerBuilder {
        FactCheckerBuilder::new()
    }

    /// Fact-check one headline.
    ///
    /// Only an invalid headline fails; provider trouble shows up in the
    /// report as fallback evidence or an `UNVERIFIED` verdict.
    pub async fn fact_check(&self, headline: &str) -> Result<Report, FactCheckError> {
        let headline = validate_headline(headline)?;
        tracing::info!(headline, "Starting fact-check");

        let evidence = self.retriever.retrieve(headline).await;
        tracing::info!(items = evidence.len(), fallback = evidence.is_fallback(), "Evidence gathered");

        let analysis = self.analyzer.analyze(headline, &evidence).await;
        let evidence = evidence.with_assessments(analysis.assessments());

        let report = Report::new(headline, analysis, evidence, (self.clock)());
        tracing::info!(
            verdict = %report.verdict(),
            truthfulness = report.truthfulness(),
            confidence = report.confidence(),
            "Fact-check complete"
        );
        Ok(report)
    }

    /// Which providers this instance can use.
    pub fn status(&self) -> ServiceStatus {
        let mut providers = vec![ProviderStatus::new(
            "Google Gemini",
            self.analyzer.provider().is_configured(),
            true,
        )];
        providers.extend(
            self.retriever
                .providers()
                .iter()
                .map(|p| ProviderStatus::new(p.name(), p.is_configured(), false)),
        );

        ServiceStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: self.analyzer.model().to_string(),
            providers,
            checked_at: (self.clock)(),
        }
    }

    pub async fn trending_topics(&self, region: Region) -> TrendingReport {
        self.trending.topics(region, (self.clock)()).await
    }
}

impl std::fmt::Debug for FactChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactChecker")
            .field("retriever", &self.retriever)
            .field("analyzer", &self.analyzer)
            .finish()
    }
}

/// Builder for [`FactChecker`].
pub struct FactCheckerBuilder {
    search: Vec<Arc<dyn SearchProvider>>,
    news: Option<Arc<NewsSearchProvider>>,
    llm: Option<Arc<dyn LlmProvider>>,
    settings: Settings,
    clock: Clock,
}

impl FactCheckerBuilder {
    pub fn new() -> Self {
        Self {
            search: Vec::new(),
            news: None,
            llm: None,
            settings: Settings::default(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Append a search provider. Providers are consulted in the order added.
    pub fn search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search.push(provider);
        self
    }

    /// NewsAPI client used for trending top headlines.
    pub fn news(mut self, news: Arc<NewsSearchProvider>) -> Self {
        self.news = Some(news);
        self
    }

    /// Set the language model.
    pub fn llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Override the timestamp source.
    pub fn clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<FactChecker, FactCheckError> {
        self.settings.validate()?;
        let llm = self.llm.ok_or(ConfigError::MissingCredential {
            var: GEMINI_API_KEY_ENV,
            name: "Gemini API key",
        })?;

        let settings = self.settings;
        let retriever = EvidenceRetriever::new(self.search, settings.provider_timeout, settings.max_results);
        let completion = CompletionConfig {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout: settings.llm_timeout,
            json_output: true,
        };
        let trending = TrendingService::new(
            self.news,
            retriever.clone(),
            settings.feeds.clone(),
            &settings.user_agent,
            settings.provider_timeout,
        )?;

        Ok(FactChecker {
            retriever,
            analyzer: VerdictAnalyzer::new(llm, completion),
            trending,
            clock: self.clock,
        })
    }
}

impl Default for FactCheckerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
