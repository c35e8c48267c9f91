//! DuckDuckGo Instant Answer API.
//!
//! Keyless JSON endpoint. Useful for well-known entities and events; returns
//! nothing for most breaking news, which is why it sits first in the cascade
//! but rarely ends it.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use factline_core::{EvidenceItem, Relevance};

use super::{build_client, http_error, SearchError, SearchProvider};

/// Nested topic groups contribute at most this many entries each.
const MAX_SUBTOPICS: usize = 2;

const NAME: &str = "DuckDuckGo Instant Answer";

pub struct InstantAnswerProvider {
    base_url: String,
    max_topics: usize,
    client: reqwest::Client,
}

impl InstantAnswerProvider {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
        max_results: usize,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            base_url: base_url.into(),
            max_topics: max_results.saturating_sub(1).max(1),
            client: build_client(user_agent, timeout)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default, rename = "Abstract")]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    abstract_source: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RelatedTopic {
    #[serde(default)]
    text: String,
    #[serde(default, rename = "FirstURL")]
    first_url: String,
    /// Present on topic groups instead of `Text`
    #[serde(default)]
    topics: Vec<RelatedTopic>,
}

fn topic_item(topic: &RelatedTopic) -> Option<EvidenceItem> {
    let text = topic.text.trim();
    if text.is_empty() {
        return None;
    }
    Some(EvidenceItem::retrieved("DuckDuckGo", text, Relevance::Medium).with_url(topic.first_url.as_str()))
}

/// Convert an Instant Answer payload into evidence items.
fn parse_instant_answer(answer: &InstantAnswer, max_topics: usize) -> Vec<EvidenceItem> {
    let mut items = Vec::new();

    let abstract_text = answer.abstract_text.trim();
    if !abstract_text.is_empty() {
        let source = match answer.abstract_source.trim() {
            "" => "DuckDuckGo",
            s => s,
        };
        let summary = match answer.heading.trim() {
            "" => abstract_text.to_string(),
            heading => format!("{}: {}", heading, abstract_text),
        };
        items.push(
            EvidenceItem::retrieved(source, summary, Relevance::High)
                .with_url(answer.abstract_url.as_str()),
        );
    }

    for topic in answer.related_topics.iter().take(max_topics) {
        if topic.topics.is_empty() {
            items.extend(topic_item(topic));
        } else {
            items.extend(topic.topics.iter().take(MAX_SUBTOPICS).filter_map(topic_item));
        }
    }

    items
}

#[async_trait]
impl SearchProvider for InstantAnswerProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn query(&self, text: &str) -> Result<Vec<EvidenceItem>, SearchError> {
        tracing::trace!(query = text, "Instant Answer search");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", text),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
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

        // DuckDuckGo serves this as application/x-javascript, so decode by hand
        let body = response.text().await.map_err(|e| http_error(NAME, e))?;
        let answer: InstantAnswer = serde_json::from_str(&body)
            .map_err(|e| SearchError::Parse(format!("Instant Answer payload: {e}")))?;

        let items = parse_instant_answer(&answer, self.max_topics);
        tracing::debug!(count = items.len(), "Instant Answer results parsed");
        Ok(items)
    }
}
