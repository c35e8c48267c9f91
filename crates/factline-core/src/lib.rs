//! # factline-core
//!
//! Pure data model and decision logic for headline fact-checking.
//!
//! This crate performs no I/O. It answers:
//! - Is this headline acceptable input?
//! - Can this model output be trusted as an analysis?
//! - Which verdict does an analysis deserve?
//! - How is the result rendered?
//!
//! ## Key Guarantees
//!
//! 1. **Derived verdicts**: a verdict is a pure function of the analysis
//! 2. **Never empty**: every [`EvidenceSet`] holds at least one item
//! 3. **Bounded scores**: truthfulness and confidence stay within 0-100
//! 4. **Deterministic rendering**: formatting never reads the clock
//!
//! ## Example
//!
//! ```rust,ignore
//! use factline_core::{decode_analysis, AnalysisResult, EvidenceSet, Report, ReportFormatter};
//!
//! let evidence = EvidenceSet::fallback("Munich got nuked today");
//! let analysis = decode_analysis(&model_text)
//!     .unwrap_or_else(|e| AnalysisResult::fallback(e.to_string()));
//! let report = Report::new("Munich got nuked today", analysis, evidence, chrono::Utc::now());
//!
//! println!("{}", ReportFormatter::format(&report));
//! ```

pub mod analysis;
pub mod evidence;
pub mod format;
pub mod headline;
pub mod patterns;
pub mod report;
pub mod status;
pub mod trending;
pub mod verdict;

// Re-export main types at crate root
pub use analysis::{decode_analysis, AnalysisOrigin, AnalysisResult, DecodeError, FieldError};
pub use evidence::{EmptyEvidenceSet, EvidenceItem, EvidenceSet, Relevance, Stance, StanceAssessment, FALLBACK_SOURCE};
pub use format::ReportFormatter;
pub use headline::{validate_headline, HeadlineError, MAX_HEADLINE_CHARS, MIN_HEADLINE_CHARS};
pub use report::Report;
pub use status::{ProviderStatus, ServiceStatus};
pub use trending::{Region, TrendingReport, TrendingTopic, UnknownRegion};
pub use verdict::Verdict;
