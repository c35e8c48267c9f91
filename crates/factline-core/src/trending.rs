//! Trending-topic data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum topics kept in one trending report.
pub const MAX_TRENDING_TOPICS: usize = 10;

/// Maximum description length, in characters, before truncation.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// News coverage area for trending topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Indian regional news.
    Local,
    #[default]
    International,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Local => "local",
            Region::International => "international",
        }
    }

    /// Display name used in rendered reports.
    pub fn coverage_area(&self) -> &'static str {
        match self {
            Region::Local => "🇮🇳 INDIA/MUMBAI REGIONAL",
            Region::International => "🌍 INTERNATIONAL/GLOBAL",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl fmt::Display for UnknownRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown region '{}' (expected local, india or international)",
            self.0
        )
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "india" => Ok(Region::Local),
            "international" | "global" | "world" => Ok(Region::International),
            _ => Err(UnknownRegion(s.to_string())),
        }
    }
}

/// One trending news topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingTopic {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl TrendingTopic {
    /// Build a topic, truncating the description and discarding non-http URLs.
    pub fn new(
        title: impl Into<String>,
        description: &str,
        url: Option<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: truncate_description(description.trim()),
            url: url.filter(|u| u.starts_with("http")),
            source: source.into(),
            published_at: None,
        }
    }

    pub fn published(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.published_at = at;
        self
    }
}

/// Truncate to [`MAX_DESCRIPTION_CHARS`] characters, appending "..." when cut.
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let cut: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Trending topics for one region at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingReport {
    pub region: Region,
    pub topics: Vec<TrendingTopic>,
    pub generated_at: DateTime<Utc>,
}

impl TrendingReport {
    /// Build a report, keeping at most [`MAX_TRENDING_TOPICS`] topics.
    pub fn new(region: Region, mut topics: Vec<TrendingTopic>, generated_at: DateTime<Utc>) -> Self {
        topics.truncate(MAX_TRENDING_TOPICS);
        Self {
            region,
            topics,
            generated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        assert_eq!("local".parse::<Region>().unwrap(), Region::Local);
        assert_eq!("India".parse::<Region>().unwrap(), Region::Local);
        assert_eq!(" international ".parse::<Region>().unwrap(), Region::International);
        assert!("mars".parse::<Region>().is_err());
    }

    #[test]
    fn test_description_truncation() {
        let long = "x".repeat(250);
        let topic = TrendingTopic::new("t", &long, None, "s");
        assert_eq!(topic.description.chars().count(), 203);
        assert!(topic.description.ends_with("..."));

        assert_eq!(truncate_description("short"), "short");
    }

    #[test]
    fn test_non_http_urls_dropped() {
        let topic = TrendingTopic::new("t", "d", Some("javascript:void(0)".into()), "s");
        assert_eq!(topic.url, None);
        let topic = TrendingTopic::new("t", "d", Some("https://bbc.co.uk/a".into()), "s");
        assert_eq!(topic.url.as_deref(), Some("https://bbc.co.uk/a"));
    }

    #[test]
    fn test_report_keeps_ten_topics() {
        let topics = (0..15)
            .map(|i| TrendingTopic::new(format!("Topic {}", i), "", None, "s"))
            .collect();
        let report = TrendingReport::new(Region::Local, topics, Utc::now());
        assert_eq!(report.topics.len(), MAX_TRENDING_TOPICS);
        assert_eq!(report.topics[0].title, "Topic 0");
    }
}
