//! The fact-check report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::evidence::EvidenceSet;
use crate::verdict::Verdict;

/// Final output of one fact-check.
///
/// The verdict is derived from the analysis when the report is built and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    headline: String,
    verdict: Verdict,
    analysis: AnalysisResult,
    evidence: EvidenceSet,
    generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        headline: impl Into<String>,
        analysis: AnalysisResult,
        evidence: EvidenceSet,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let verdict = Verdict::for_analysis(&analysis);
        Self {
            headline: headline.into(),
            verdict,
            analysis,
            evidence,
            generated_at,
        }
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    pub fn evidence(&self) -> &EvidenceSet {
        &self.evidence
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn truthfulness(&self) -> u8 {
        self.analysis.truthfulness()
    }

    pub fn confidence(&self) -> f64 {
        self.analysis.confidence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_verdict_is_derived() {
        let analysis = AnalysisResult::new(92, 80.0, "Confirmed by several outlets", vec![], "");
        let report = Report::new("Rain in Mumbai", analysis, EvidenceSet::fallback("x"), at());
        assert_eq!(report.verdict(), Verdict::True);
        assert_eq!(report.truthfulness(), 92);
    }

    #[test]
    fn test_fallback_analysis_report() {
        let report = Report::new(
            "Rain in Mumbai",
            AnalysisResult::fallback("timeout"),
            EvidenceSet::fallback("Rain in Mumbai"),
            at(),
        );
        assert_eq!(report.verdict(), Verdict::Unverified);
        assert_eq!(report.confidence(), 0.0);
    }

    #[test]
    fn test_serializes_verdict_and_timestamp() {
        let analysis = AnalysisResult::new(5, 90.0, "No such event", vec![], "");
        let report = Report::new("Munich got nuked today", analysis, EvidenceSet::fallback("m"), at());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "FALSE");
        assert_eq!(json["generated_at"], "2025-03-14T09:30:00Z");
        assert_eq!(json["evidence"][0]["source"], "Fallback Search");
        assert_eq!(json["analysis"]["origin"], "model");
    }
}
