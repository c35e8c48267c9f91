//! Plain-text rendering of reports.
//!
//! All renderers are pure: timestamps come from the value being rendered,
//! never from the clock, so the same input always yields the same text.

use chrono::{DateTime, Utc};

use crate::evidence::EvidenceItem;
use crate::report::Report;
use crate::status::ServiceStatus;
use crate::trending::TrendingReport;
use crate::verdict::Verdict;

const RULE_WIDTH: usize = 80;
const DATE_FORMAT: &str = "%B %d, %Y at %H:%M UTC";

const TRUTHFULNESS_GUIDE: &[&str] = &[
    "• 85-100%: ✅ TRUE - Well-supported by evidence",
    "• 0-15%:   ❌ FALSE - Contradicted by evidence or no such event",
    "• 40-75%:  ⚠️ PARTIALLY TRUE - Mixed accuracy, no deceptive framing",
    "• 20-50%:  🚨 MISLEADING - Deceptive framing of partial truths",
    "• Other:   ❓ UNVERIFIED - Insufficient evidence for a verdict",
];

const CONFIDENCE_GUIDE: &[&str] = &[
    "• 90-100%: Very confident in analysis",
    "• 70-89%:  Confident with good evidence",
    "• 50-69%:  Moderate confidence, some uncertainty",
    "• 30-49%:  Low confidence, limited evidence",
    "• 0-29%:   Very uncertain, insufficient data",
];

/// Renders reports into the fixed textual layout.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Render a fact-check report.
    pub fn format(report: &Report) -> String {
        let analysis = report.analysis();
        let mut out = Lines::default();

        out.banner("🔍 FACT-CHECK VERIFICATION REPORT");
        out.blank();
        out.push(report.verdict().banner(report.truthfulness()));
        out.blank();

        out.push("📰 HEADLINE ANALYZED:");
        out.push(format!("\"{}\"", report.headline()));
        out.blank();

        out.push("📊 VERIFICATION METRICS:");
        out.push(format!("• Truthfulness Score: {}%", report.truthfulness()));
        out.push(format!("• AI Confidence Level: {:.1}%", report.confidence()));
        out.push(format!("• Sources Analyzed: {}", report.evidence().len()));
        out.push(format!("• Analysis Date: {}", timestamp(report.generated_at())));
        out.blank();

        out.push("🎯 DETAILED ANALYSIS:");
        out.push(analysis.analysis());
        out.blank();

        out.push("📋 EVIDENCE:");
        for (i, item) in report.evidence().iter().enumerate() {
            evidence_lines(&mut out, i + 1, item);
        }
        out.blank();

        out.push("⚠️ IDENTIFIED CONCERNS:");
        if analysis.concerns().is_empty() {
            out.push("No concerns identified.");
        } else {
            for (i, concern) in analysis.concerns().iter().enumerate() {
                out.push(format!("{}. {}", i + 1, concern));
            }
        }
        out.blank();

        out.push("💡 RECOMMENDATIONS FOR READERS:");
        if analysis.recommendations().trim().is_empty() {
            out.push("No specific recommendations.");
        } else {
            out.push(analysis.recommendations());
        }
        out.blank();

        out.push("📈 TRUTHFULNESS SCORE GUIDE:");
        out.extend(TRUTHFULNESS_GUIDE);
        out.blank();
        out.push("🔍 CONFIDENCE LEVEL GUIDE:");
        out.extend(CONFIDENCE_GUIDE);
        out.blank();

        out.footer(report.generated_at());
        out.finish()
    }

    /// Render a trending-topics report.
    pub fn format_trending(report: &TrendingReport) -> String {
        let mut out = Lines::default();

        out.banner("📈 TRENDING NEWS TOPICS REPORT");
        out.blank();
        out.push(format!("🌍 COVERAGE AREA: {}", report.region.coverage_area()));
        out.push(format!("⏰ REPORT GENERATED: {}", timestamp(report.generated_at)));

        if report.is_empty() {
            out.blank();
            out.push("❓ NO TRENDING TOPICS AVAILABLE");
            out.blank();
            out.push(format!(
                "Currently unable to retrieve trending topics for {} news coverage.",
                report.region
            ));
            out.push("This could be due to:");
            out.push("• Temporary API service issues");
            out.push("• Network connectivity problems");
            out.push("• RSS feed parsing errors");
            out.blank();
            out.push("Please try again in a few minutes or check the service status.");
            out.blank();
            out.rule();
            return out.finish();
        }

        out.push(format!("📊 TOPICS IDENTIFIED: {}", report.topics.len()));
        out.blank();

        for (i, topic) in report.topics.iter().enumerate() {
            out.push(format!("{:2}. 🔥 {}", i + 1, topic.title));

            let published = topic
                .published_at
                .map(|at| format!(" | 📅 {}", at.format("%m/%d/%Y %H:%M")))
                .unwrap_or_default();
            out.push(format!("    📰 SOURCE: {}{}", topic.source, published));

            let summary = if topic.description.is_empty() {
                "No description available"
            } else {
                topic.description.as_str()
            };
            out.push(format!("    📝 SUMMARY: {}", summary));

            if let Some(url) = &topic.url {
                out.push(format!("    🔗 READ MORE: {}", url));
            }
            out.blank();
        }

        out.push("⚠️ IMPORTANT DISCLAIMERS:");
        out.push("• This report contains trending topics, not verified facts");
        out.push("• Use the check command to verify specific claims");
        out.push("• Always cross-reference important information with multiple sources");
        out.blank();
        out.rule();
        out.finish()
    }

    /// Render a service status snapshot.
    pub fn format_status(status: &ServiceStatus) -> String {
        let mut out = Lines::default();

        out.banner("NEWS FACT-CHECKER SERVICE STATUS");
        out.blank();

        let state = if status.is_operational() {
            "🟢 OPERATIONAL"
        } else {
            "🔴 NOT OPERATIONAL"
        };
        out.push(format!("SERVICE STATUS: {}", state));
        out.push(format!("TIMESTAMP: {}", timestamp(status.checked_at)));
        out.push(format!("VERSION: {}", status.version));
        out.push(format!("MODEL: {}", status.model));
        out.blank();

        out.push("🔧 CONFIGURED PROVIDERS:");
        for provider in &status.providers {
            let state = match (provider.configured, provider.required) {
                (true, _) => "✅ Configured",
                (false, true) => "❌ Not configured (required)",
                (false, false) => "⚠️ Not configured (optional)",
            };
            out.push(format!("• {}: {}", provider.name, state));
        }
        out.blank();
        out.rule();
        out.finish()
    }
}

fn evidence_lines(out: &mut Lines, index: usize, item: &EvidenceItem) {
    let stance = item.stance();
    out.push(format!(
        "{}. {} {} | RELEVANCE: {}",
        index,
        stance.icon(),
        stance.label(),
        item.relevance().label()
    ));
    out.push(format!("   SOURCE: {}", item.source()));
    out.push(format!("   SUMMARY: {}", item.summary()));
    if let Some(url) = item.url() {
        out.push(format!("   URL: {}", url));
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// Line accumulator joined with `\n`.
#[derive(Default)]
struct Lines(Vec<String>);

impl Lines {
    fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    fn extend(&mut self, lines: &[&str]) {
        self.0.extend(lines.iter().map(|l| l.to_string()));
    }

    fn blank(&mut self) {
        self.0.push(String::new());
    }

    fn rule(&mut self) {
        self.0.push("=".repeat(RULE_WIDTH));
    }

    fn banner(&mut self, title: &str) {
        self.rule();
        self.push(centered(title));
        self.rule();
    }

    fn footer(&mut self, at: DateTime<Utc>) {
        self.rule();
        self.push(format!("⏰ REPORT GENERATED: {}", timestamp(at)));
        self.rule();
    }

    fn finish(self) -> String {
        self.0.join("\n")
    }
}

fn centered(title: &str) -> String {
    let width = title.chars().count();
    let pad = RULE_WIDTH.saturating_sub(width) / 2;
    format!("{}{}", " ".repeat(pad), title)
}

impl Verdict {
    /// The banner line shown at the top of a report.
    pub fn banner(&self, truthfulness: u8) -> String {
        format!("{} FINAL VERDICT: {} ({}% ACCURATE)", self.icon(), self.label(), truthfulness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::evidence::{EvidenceItem, EvidenceSet, Relevance};
    use crate::status::ProviderStatus;
    use crate::trending::{Region, TrendingTopic};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 4, 18, 5, 0).unwrap()
    }

    fn report(analysis: AnalysisResult) -> Report {
        let evidence = EvidenceSet::from_items(
            "Rain floods Mumbai suburbs",
            vec![
                EvidenceItem::retrieved("Reuters", "Heavy rain in Mumbai", Relevance::High)
                    .with_url("https://reuters.com/x"),
                EvidenceItem::retrieved("DuckDuckGo", "Monsoon season", Relevance::Medium),
            ],
        );
        Report::new("Rain floods Mumbai suburbs", analysis, evidence, at())
    }

    #[test]
    fn test_sections_in_order() {
        let text = ReportFormatter::format(&report(AnalysisResult::new(
            90,
            82.25,
            "Widely reported.",
            vec!["Exact figures vary".into()],
            "Follow official updates.",
        )));

        let order = [
            "FACT-CHECK VERIFICATION REPORT",
            "✅ FINAL VERDICT: TRUE (90% ACCURATE)",
            "HEADLINE ANALYZED:",
            "\"Rain floods Mumbai suburbs\"",
            "VERIFICATION METRICS:",
            "DETAILED ANALYSIS:",
            "EVIDENCE:",
            "IDENTIFIED CONCERNS:",
            "RECOMMENDATIONS FOR READERS:",
            "TRUTHFULNESS SCORE GUIDE",
            "CONFIDENCE LEVEL GUIDE",
            "REPORT GENERATED:",
        ];
        let mut cursor = 0;
        for marker in order {
            let pos = text[cursor..]
                .find(marker)
                .unwrap_or_else(|| panic!("missing or out of order: {}", marker));
            cursor += pos + marker.len();
        }

        assert!(text.starts_with(&"=".repeat(80)));
        assert!(text.ends_with(&"=".repeat(80)));
    }

    #[test]
    fn test_metrics_and_evidence_lines() {
        let text = ReportFormatter::format(&report(AnalysisResult::new(
            60,
            82.26,
            "Partly.",
            vec![],
            "",
        )));
        assert!(text.contains("• Truthfulness Score: 60%"));
        assert!(text.contains("• AI Confidence Level: 82.3%"));
        assert!(text.contains("• Sources Analyzed: 2"));
        assert!(text.contains("• Analysis Date: July 04, 2025 at 18:05 UTC"));
        assert!(text.contains("1. ❔ UNCLEAR | RELEVANCE: HIGH"));
        assert!(text.contains("   SOURCE: Reuters"));
        assert!(text.contains("   URL: https://reuters.com/x"));
        assert!(text.contains("2. ❔ UNCLEAR | RELEVANCE: MEDIUM"));
    }

    #[test]
    fn test_empty_concerns_and_recommendations() {
        let text = ReportFormatter::format(&report(AnalysisResult::new(60, 50.0, "x", vec![], "")));
        assert!(text.contains("No concerns identified."));
        assert!(text.contains("No specific recommendations."));
    }

    #[test]
    fn test_fallback_report_renders_unverified() {
        let report = Report::new(
            "Munich got nuked today",
            AnalysisResult::fallback("model timed out"),
            EvidenceSet::fallback("Munich got nuked today"),
            at(),
        );
        let text = ReportFormatter::format(&report);
        assert!(text.contains("❓ FINAL VERDICT: UNVERIFIED (0% ACCURATE)"));
        assert!(text.contains("• AI Confidence Level: 0.0%"));
        assert!(text.contains("1. ❌ CONTRADICTS | RELEVANCE: HIGH"));
        assert!(text.contains("   SOURCE: Fallback Search"));
    }

    #[test]
    fn test_format_is_deterministic() {
        let r = report(AnalysisResult::new(45, 70.0, "x", vec!["Misleading framing".into()], "y"));
        assert_eq!(ReportFormatter::format(&r), ReportFormatter::format(&r));
        assert!(ReportFormatter::format(&r).contains("🚨 FINAL VERDICT: MISLEADING (45% ACCURATE)"));
    }

    #[test]
    fn test_verdict_banner_matches_report() {
        let r = report(AnalysisResult::new(10, 90.0, "x", vec![], ""));
        assert!(ReportFormatter::format(&r).contains(&Verdict::False.banner(10)));
    }

    #[test]
    fn test_trending_empty() {
        let text = ReportFormatter::format_trending(&TrendingReport::new(Region::Local, vec![], at()));
        assert!(text.contains("NO TRENDING TOPICS AVAILABLE"));
        assert!(text.contains("for local news coverage"));
    }

    #[test]
    fn test_trending_topics() {
        let topics = vec![
            TrendingTopic::new(
                "Markets rally",
                "Stocks rose sharply.",
                Some("https://bbc.co.uk/news/1".into()),
                "BBC News",
            )
            .published(Some(at())),
            TrendingTopic::new("Quiet day", "", None, "feeds.bbci.co.uk"),
        ];
        let text = ReportFormatter::format_trending(&TrendingReport::new(Region::International, topics, at()));
        assert!(text.contains("🌍 INTERNATIONAL/GLOBAL"));
        assert!(text.contains("📊 TOPICS IDENTIFIED: 2"));
        assert!(text.contains(" 1. 🔥 Markets rally"));
        assert!(text.contains("    📰 SOURCE: BBC News | 📅 07/04/2025 18:05"));
        assert!(text.contains("    🔗 READ MORE: https://bbc.co.uk/news/1"));
        assert!(text.contains("    📝 SUMMARY: No description available"));
    }

    #[test]
    fn test_status_rendering() {
        let status = ServiceStatus {
            version: "0.1.0".into(),
            model: "gemini-2.5-flash".into(),
            providers: vec![
                ProviderStatus::new("Google Gemini", true, true),
                ProviderStatus::new("NewsAPI", false, false),
            ],
            checked_at: at(),
        };
        let text = ReportFormatter::format_status(&status);
        assert!(text.contains("SERVICE STATUS: 🟢 OPERATIONAL"));
        assert!(text.contains("• Google Gemini: ✅ Configured"));
        assert!(text.contains("• NewsAPI: ⚠️ Not configured (optional)"));
    }
}
