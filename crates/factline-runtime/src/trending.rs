//! Trending-topic discovery.
//!
//! Strategies run in order and the first non-empty one wins:
//! 1. NewsAPI top headlines (needs a key)
//! 2. RSS feeds of major outlets
//! 3. Canned search queries through the evidence cascade

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

use factline_core::{Region, TrendingReport, TrendingTopic};

use crate::config::Feeds;
use crate::retriever::EvidenceRetriever;
use crate::search::{build_client, NewsSearchProvider, SearchError, SearchProvider};

/// Items taken from each RSS feed.
const ITEMS_PER_FEED: usize = 5;
/// Results kept per search query.
const RESULTS_PER_QUERY: usize = 2;
/// Headlines requested from NewsAPI.
const HEADLINE_PAGE_SIZE: usize = 10;

lazy_static! {
    static ref ITEM_PATTERN: Regex = Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").unwrap();
    static ref TITLE_PATTERN: Regex = Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").unwrap();
    static ref LINK_PATTERN: Regex = Regex::new(r"(?is)<link\b[^>]*>(.*?)</link>").unwrap();
    static ref DESCRIPTION_PATTERN: Regex =
        Regex::new(r"(?is)<description\b[^>]*>(.*?)</description>").unwrap();
    static ref PUB_DATE_PATTERN: Regex = Regex::new(r"(?is)<pubDate\b[^>]*>(.*?)</pubDate>").unwrap();
    static ref CDATA_PATTERN: Regex = Regex::new(r"(?s)^\s*<!\[CDATA\[(.*?)\]\]>\s*$").unwrap();
    static ref TAG_PATTERN: Regex = Regex::new(r"(?s)<[^>]+>").unwrap();
}

fn country_code(region: Region) -> &'static str {
    match region {
        Region::Local => "in",
        Region::International => "us",
    }
}

fn search_queries(region: Region) -> [&'static str; 3] {
    match region {
        Region::Local => [
            "India news today trending",
            "Indian politics latest news",
            "Bollywood news today",
        ],
        Region::International => [
            "world news today trending",
            "international politics current",
            "global economy news latest",
        ],
    }
}

/// Strip CDATA, markup and the common XML entities.
fn clean_text(raw: &str) -> String {
    let inner = CDATA_PATTERN
        .captures(raw)
        .and_then(|c| c.get(1))
        .map_or(raw, |m| m.as_str());

    let text = TAG_PATTERN.replace_all(inner, " ");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capture(pattern: &Regex, block: &str) -> Option<String> {
    pattern
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}

/// Host part of a feed URL, used as the topic source.
fn feed_host(feed_url: &str) -> String {
    url::Url::parse(feed_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| feed_url.to_string())
}

/// Parse up to `limit` items from an RSS document.
fn parse_rss(xml: &str, source: &str, limit: usize) -> Vec<TrendingTopic> {
    ITEM_PATTERN
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .filter_map(|block| {
            let block = block.as_str();
            let title = capture(&TITLE_PATTERN, block)?;
            if matches!(title.to_ascii_lowercase().as_str(), "rss" | "news") {
                return None;
            }

            let description = capture(&DESCRIPTION_PATTERN, block).unwrap_or_default();
            let published = capture(&PUB_DATE_PATTERN, block)
                .and_then(|d| DateTime::parse_from_rfc2822(&d).ok())
                .map(|d| d.with_timezone(&Utc));

            Some(
                TrendingTopic::new(title, &description, capture(&LINK_PATTERN, block), source)
                    .published(published),
            )
        })
        .take(limit)
        .collect()
}

/// Fetches trending topics for a region.
#[derive(Clone)]
pub struct TrendingService {
    news: Option<Arc<NewsSearchProvider>>,
    retriever: EvidenceRetriever,
    feeds: Feeds,
    client: reqwest::Client,
}

impl TrendingService {
    pub fn new(
        news: Option<Arc<NewsSearchProvider>>,
        retriever: EvidenceRetriever,
        feeds: Feeds,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            news,
            retriever,
            feeds,
            client: build_client(user_agent, timeout)?,
        })
    }

    /// Trending topics for `region`, stamped with `now`. Never fails; an
    /// empty report means every strategy came up empty.
    pub async fn topics(&self, region: Region, now: DateTime<Utc>) -> TrendingReport {
        tracing::info!(region = %region, "Fetching trending topics");

        let mut topics = self.from_news_api(region).await;

        if topics.is_empty() {
            topics = self.from_feeds(region).await;
        }
        if topics.is_empty() {
            topics = self.from_search(region).await;
        }

        tracing::info!(region = %region, topics = topics.len(), "Trending topics retrieved");
        TrendingReport::new(region, topics, now)
    }

    async fn from_news_api(&self, region: Region) -> Vec<TrendingTopic> {
        let Some(news) = self.news.as_ref().filter(|n| n.is_configured()) else {
            tracing::debug!("NewsAPI not configured, skipping top headlines");
            return Vec::new();
        };

        match news.top_headlines(country_code(region), HEADLINE_PAGE_SIZE).await {
            Ok(headlines) => headlines
                .into_iter()
                .map(|h| {
                    TrendingTopic::new(h.title, &h.description, h.url, h.source).published(h.published_at)
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "NewsAPI top headlines failed");
                Vec::new()
            }
        }
    }

    async fn from_feeds(&self, region: Region) -> Vec<TrendingTopic> {
        let feeds = match region {
            Region::Local => &self.feeds.local,
            Region::International => &self.feeds.international,
        };

        let mut topics = Vec::new();
        for feed in feeds {
            match self.fetch_feed(feed).await {
                Ok(items) => {
                    tracing::debug!(feed = %feed, items = items.len(), "Parsed RSS feed");
                    topics.extend(items);
                }
                Err(e) => tracing::warn!(feed = %feed, error = %e, "RSS feed failed"),
            }
        }
        topics
    }

    async fn fetch_feed(&self, feed: &str) -> Result<Vec<TrendingTopic>, SearchError> {
        let response = self
            .client
            .get(feed)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("RSS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                provider: "RSS",
                status: status.as_u16(),
            });
        }

        let xml = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("RSS read failed: {e}")))?;

        Ok(parse_rss(&xml, &feed_host(feed), ITEMS_PER_FEED))
    }

    async fn from_search(&self, region: Region) -> Vec<TrendingTopic> {
        let mut topics = Vec::new();
        for query in search_queries(region) {
            let items = self.retriever.search(query).await;
            topics.extend(items.iter().take(RESULTS_PER_QUERY).map(|item| {
                let (title, description) = match item.summary().split_once(": ") {
                    Some((title, rest)) => (title.to_string(), rest),
                    None => (item.summary().to_string(), ""),
                };
                TrendingTopic::new(title, description, item.url().map(str::to_string), item.source())
            }));
        }
        topics
    }
}
