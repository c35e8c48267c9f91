//! Evidence gathered for a headline.
//!
//! Every verdict must be traceable to the evidence the analyzer saw. An
//! [`EvidenceSet`] is never empty: when no search provider returns anything,
//! a single synthetic fallback item stands in for the absence of evidence.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Source name used for the synthetic item produced when retrieval finds nothing.
pub const FALLBACK_SOURCE: &str = "Fallback Search";

/// How closely an evidence item bears on the headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relevance {
    High,
    Medium,
    Low,
}

impl Relevance {
    /// Upper-case label as shown in prompts and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Relevance::High => "HIGH",
            Relevance::Medium => "MEDIUM",
            Relevance::Low => "LOW",
        }
    }

    /// Parse a label leniently ("high", "HIGH", " Medium ").
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Relevance::High),
            "medium" | "med" => Some(Relevance::Medium),
            "low" => Some(Relevance::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an evidence item supports or contradicts the headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stance {
    Supports,
    Contradicts,
    Unclear,
}

impl Stance {
    pub fn label(&self) -> &'static str {
        match self {
            Stance::Supports => "SUPPORTS",
            Stance::Contradicts => "CONTRADICTS",
            Stance::Unclear => "UNCLEAR",
        }
    }

    /// Icon rendered next to the stance in reports.
    pub fn icon(&self) -> &'static str {
        match self {
            Stance::Supports => "✅",
            Stance::Contradicts => "❌",
            Stance::Unclear => "❔",
        }
    }

    /// Parse a stance leniently. Accepts the labels plus the boolean-ish
    /// spellings models tend to produce ("supports", "true", "contradicts").
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "supports" | "support" | "supporting" | "true" => Some(Stance::Supports),
            "contradicts" | "contradict" | "contradicting" | "false" => {
                Some(Stance::Contradicts)
            }
            "unclear" | "neutral" | "unknown" => Some(Stance::Unclear),
            _ => None,
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One piece of retrieved information bearing on a headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    relevance: Relevance,
    stance: Stance,
    summary: String,
}

impl EvidenceItem {
    /// Create an item retrieved from a search provider.
    ///
    /// Retrieval never judges stance; that is left to the analyzer, so new
    /// items always start out [`Stance::Unclear`].
    pub fn retrieved(
        source: impl Into<String>,
        summary: impl Into<String>,
        relevance: Relevance,
    ) -> Self {
        Self {
            source: source.into(),
            url: None,
            relevance,
            stance: Stance::Unclear,
            summary: summary.into(),
        }
    }

    /// Attach a URL. Empty strings are treated as "no URL".
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = if url.trim().is_empty() { None } else { Some(url) };
        self
    }

    /// Return a copy of this item with a different stance.
    pub fn with_stance(&self, stance: Stance) -> Self {
        Self {
            stance,
            ..self.clone()
        }
    }

    /// Return a copy of this item with a different relevance.
    pub fn with_relevance(&self, relevance: Relevance) -> Self {
        Self {
            relevance,
            ..self.clone()
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn relevance(&self) -> Relevance {
        self.relevance
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Whether this is the synthetic "nothing found" item.
    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }
}

/// The model's judgement of one numbered evidence item.
///
/// `index` is 1-based, matching the numbering used in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceAssessment {
    pub index: usize,
    pub stance: Stance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<Relevance>,
}

/// Rejected attempt to build an [`EvidenceSet`] with no items.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("evidence set must contain at least one item")]
pub struct EmptyEvidenceSet;

/// Ordered, never-empty collection of evidence.
///
/// Order is the provider cascade order. Serialized as a plain array;
/// deserializing an empty array fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EvidenceItem>", into = "Vec<EvidenceItem>")]
pub struct EvidenceSet {
    items: Vec<EvidenceItem>,
}

impl TryFrom<Vec<EvidenceItem>> for EvidenceSet {
    type Error = EmptyEvidenceSet;

    fn try_from(items: Vec<EvidenceItem>) -> Result<Self, Self::Error> {
        if items.is_empty() {
            return Err(EmptyEvidenceSet);
        }
        Ok(Self { items })
    }
}

impl From<EvidenceSet> for Vec<EvidenceItem> {
    fn from(set: EvidenceSet) -> Self {
        set.items
    }
}

impl EvidenceSet {
    /// Build a set from retrieved items, substituting the fallback item when
    /// the list is empty.
    pub fn from_items(headline: &str, items: Vec<EvidenceItem>) -> Self {
        if items.is_empty() {
            Self::fallback(headline)
        } else {
            Self { items }
        }
    }

    /// The single-item set used when no provider returned anything.
    pub fn fallback(headline: &str) -> Self {
        let encoded: String = url::form_urlencoded::byte_serialize(headline.as_bytes()).collect();
        let item = EvidenceItem {
            source: FALLBACK_SOURCE.to_string(),
            url: Some(format!("https://duckduckgo.com/?q={}", encoded)),
            relevance: Relevance::High,
            stance: Stance::Contradicts,
            summary: format!(
                "Unable to retrieve detailed search results for \"{}\". Manual verification recommended.",
                headline
            ),
        };
        Self { items: vec![item] }
    }

    /// Apply the analyzer's stance assessments, producing a new set.
    ///
    /// Indices outside `1..=len` are ignored. The fallback set keeps its
    /// synthetic stance.
    pub fn with_assessments(&self, assessments: &[StanceAssessment]) -> Self {
        if self.is_fallback() {
            return self.clone();
        }

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                // Last assessment for an index wins
                match assessments.iter().rev().find(|a| a.index == i + 1) {
                    Some(a) => {
                        let updated = item.with_stance(a.stance);
                        match a.relevance {
                            Some(r) => updated.with_relevance(r),
                            None => updated,
                        }
                    }
                    None => item.clone(),
                }
            })
            .collect();

        Self { items }
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvidenceItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether this set is the synthetic "nothing found" set.
    pub fn is_fallback(&self) -> bool {
        self.items.len() == 1 && self.items[0].is_fallback()
    }

    /// Distinct source names in order of first appearance.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.source()) {
                seen.push(item.source());
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a EvidenceSet {
    type Item = &'a EvidenceItem;
    type IntoIter = std::slice::Iter<'a, EvidenceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
