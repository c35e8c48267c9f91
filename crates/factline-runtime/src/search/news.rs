//! NewsAPI search.
//!
//! Requires a key. Without one the provider reports itself unconfigured and
//! the retriever never calls it.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;

use factline_core::{EvidenceItem, Relevance};

use super::{build_client, http_error, SearchError, SearchProvider};
use crate::providers::ApiCredential;

const NAME: &str = "NewsAPI";

/// Articles requested per search.
const PAGE_SIZE: usize = 5;

pub struct NewsSearchProvider {
    base_url: String,
    api_key: Option<ApiCredential>,
    client: reqwest::Client,
}

/// One article from the top-headlines endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TopHeadline {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    source: Option<ArticleSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

impl Article {
    /// Title, unless missing or a removed-article placeholder.
    fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != "[Removed]")
    }

    fn description(&self) -> &str {
        self.description.as_deref().map(str::trim).unwrap_or_default()
    }

    fn source_name(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NAME)
    }

    fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
            .map(|p| p.with_timezone(&Utc))
    }
}

/// Relevance by rank: first HIGH, next two MEDIUM, rest LOW.
fn rank_relevance(rank: usize) -> Relevance {
    match rank {
        0 => Relevance::High,
        1 | 2 => Relevance::Medium,
        _ => Relevance::Low,
    }
}

fn article_items(articles: &[Article]) -> Vec<EvidenceItem> {
    articles
        .iter()
        .filter(|a| a.title().is_some())
        .enumerate()
        .map(|(rank, article)| {
            let title = article.title().unwrap_or_default();
            let mut summary = match article.description() {
                "" => title.to_string(),
                description => format!("{}: {}", title, description),
            };
            if let Some(at) = article.published() {
                summary.push_str(&format!(" (published {})", at.format("%Y-%m-%d")));
            }

            EvidenceItem::retrieved(article.source_name(), summary, rank_relevance(rank))
                .with_url(article.url.clone().unwrap_or_default())
        })
        .collect()
}

/// First day of the month containing `today`.
fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

impl NewsSearchProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<ApiCredential>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: build_client(user_agent, timeout)?,
        })
    }

    fn key(&self) -> Result<&ApiCredential, SearchError> {
        self.api_key.as_ref().ok_or(SearchError::NotConfigured(NAME))
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<Article>, SearchError> {
        let key = self.key()?;

        // Key goes in a header so it never appears in a logged URL
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .header("X-Api-Key", key.expose())
            .query(params)
            .send()
            .await
            .map_err(|e| http_error(NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                provider: NAME,
                status: status.as_u16(),
            });
        }

        let body: ArticlesResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("NewsAPI payload: {e}")))?;

        tracing::debug!(endpoint, articles = body.articles.len(), "NewsAPI returned articles");
        Ok(body.articles)
    }

    /// Current top headlines for a country code ("in", "us").
    pub async fn top_headlines(&self, country: &str, page_size: usize) -> Result<Vec<TopHeadline>, SearchError> {
        let articles = self
            .fetch(
                "top-headlines",
                &[
                    ("country", country.to_string()),
                    ("pageSize", page_size.to_string()),
                ],
            )
            .await?;

        Ok(articles
            .iter()
            .filter_map(|a| {
                Some(TopHeadline {
                    title: a.title()?.to_string(),
                    description: a.description().to_string(),
                    url: a.url.clone().filter(|u| !u.is_empty()),
                    source: a.source_name().to_string(),
                    published_at: a.published(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl SearchProvider for NewsSearchProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn query(&self, text: &str) -> Result<Vec<EvidenceItem>, SearchError> {
        tracing::trace!(query = text, "NewsAPI search");

        let from = month_start(Utc::now().date_naive());
        let articles = self
            .fetch(
                "everything",
                &[
                    ("q", text.to_string()),
                    ("sortBy", "relevancy".to_string()),
                    ("pageSize", PAGE_SIZE.to_string()),
                    ("language", "en".to_string()),
                    ("from", from.format("%Y-%m-%d").to_string()),
                ],
            )
            .await?;

        Ok(article_items(&articles))
    }
}
