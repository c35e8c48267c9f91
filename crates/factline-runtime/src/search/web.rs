//! Direct web search via the DuckDuckGo HTML endpoint.
//!
//! Last provider in the cascade. Scrapes organic results from the HTML-only
//! page, which needs no JavaScript and no key.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use factline_core::{EvidenceItem, Relevance};

use super::{build_client, http_error, SearchError, SearchProvider};

const NAME: &str = "DuckDuckGo Web";

pub struct WebSearchProvider {
    endpoint: String,
    max_results: usize,
    client: reqwest::Client,
}

impl WebSearchProvider {
    pub fn new(
        endpoint: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
        max_results: usize,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            endpoint: endpoint.into(),
            max_results,
            client: build_client(user_agent, timeout)?,
        })
    }
}

/// Unwrap DuckDuckGo's redirect links.
///
/// Result links look like `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`;
/// the target is the decoded `uddg` parameter.
fn extract_url(href: &str) -> Option<String> {
    let full_href = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full_href).ok()?;

    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full_href)
    }
}

/// Site name shown as the evidence source, e.g. `reuters.com`.
fn source_for(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| "DuckDuckGo".to_string())
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector '{css}': {e:?}")))
}

/// Parse the HTML results page. First result MEDIUM, the rest LOW.
fn parse_results(html: &str, max_results: usize) -> Result<Vec<EvidenceItem>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = selector(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut items = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(url) = title_el.value().attr("href").and_then(extract_url) else {
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let summary = if snippet.is_empty() {
            title
        } else {
            format!("{}: {}", title, snippet)
        };

        let relevance = if items.is_empty() {
            Relevance::Medium
        } else {
            Relevance::Low
        };

        items.push(EvidenceItem::retrieved(source_for(&url), summary, relevance).with_url(url));

        if items.len() >= max_results {
            break;
        }
    }

    Ok(items)
}

#[async_trait]
impl SearchProvider for WebSearchProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn query(&self, text: &str) -> Result<Vec<EvidenceItem>, SearchError> {
        tracing::trace!(query = text, "DuckDuckGo HTML search");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", text)])
            .header("Accept-Language", "en-US,en;q=0.9")
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

        let html = response.text().await.map_err(|e| http_error(NAME, e))?;
        tracing::trace!(bytes = html.len(), "DuckDuckGo HTML received");

        let items = parse_results(&html, self.max_results)?;
        tracing::debug!(count = items.len(), "DuckDuckGo HTML results parsed");
        Ok(items)
    }
}
