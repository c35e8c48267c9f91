//! # factline-runtime
//!
//! Networked half of factline: evidence retrieval, LLM-assisted analysis and
//! trending-topic discovery.
//!
//! `factline-core` holds the deterministic pieces (verdict bands, decoding,
//! formatting). This crate wires them to the outside world:
//!
//! - [`search`]: DuckDuckGo Instant Answer, NewsAPI and DuckDuckGo HTML
//!   search behind one [`SearchProvider`](search::SearchProvider) trait
//! - [`providers`]: the Gemini model behind [`LlmProvider`](providers::LlmProvider)
//! - [`FactChecker`]: the end-to-end pipeline
//!
//! ## Failure Model
//!
//! Only configuration and headline validation fail loudly. Search failures
//! fall through to the next provider and end in a fallback evidence item;
//! model failures end in a fallback analysis with an `UNVERIFIED` verdict.
//! A fact-check that got past validation always yields a [`Report`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use factline_runtime::{FactCheckConfig, FactChecker};
//! use factline_core::ReportFormatter;
//!
//! let checker = FactChecker::from_config(FactCheckConfig::from_env()?)?;
//! let report = checker.fact_check("Munich got nuked today").await?;
//! println!("{}", ReportFormatter::format(&report));
//! ```
//!
//! [`Report`]: factline_core::Report

use thiserror::Error;

use factline_core::HeadlineError;

pub mod analyzer;
pub mod checker;
pub mod config;
pub mod prompts;
pub mod providers;
pub mod retriever;
pub mod search;
pub mod trending;

pub use analyzer::VerdictAnalyzer;
pub use checker::{FactChecker, FactCheckerBuilder};
pub use config::{ConfigError, Endpoints, FactCheckConfig, Feeds, Settings};
pub use providers::{ApiCredential, CredentialSource, GeminiProvider, LlmProvider, ProviderError};
pub use retriever::EvidenceRetriever;
pub use search::{SearchError, SearchProvider};
pub use trending::TrendingService;

/// Errors a caller of [`FactChecker`] can see.
#[derive(Error, Debug)]
pub enum FactCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid headline: {0}")]
    InvalidHeadline(#[from] HeadlineError),

    #[error("Failed to initialise HTTP client: {0}")]
    Http(String),
}

impl From<SearchError> for FactCheckError {
    fn from(e: SearchError) -> Self {
        FactCheckError::Http(e.to_string())
    }
}

impl From<ProviderError> for FactCheckError {
    fn from(e: ProviderError) -> Self {
        FactCheckError::Http(e.to_string())
    }
}
