//! Verdict classification.
//!
//! A verdict is derived, never set. The classification table is applied
//! strictly top to bottom and the first matching row wins:
//!
//! | # | Truthfulness | Condition                        | Verdict          |
//! |---|--------------|----------------------------------|------------------|
//! | 1 | 85-100       |                                  | `TRUE`           |
//! | 2 | 0-15         |                                  | `FALSE`          |
//! | 3 | 40-75        | no deceptive-framing concern     | `PARTIALLY_TRUE` |
//! | 4 | 20-50        | a deceptive-framing concern      | `MISLEADING`     |
//! | 5 | otherwise    |                                  | `UNVERIFIED`     |
//!
//! Rows 3 and 4 overlap on 40-50; the concern flag decides between them.
//! These rules are the policy, not a tuning surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::analysis::AnalysisResult;
use crate::patterns::any_deceptive_framing;

/// Truthfulness band for `TRUE`.
pub const TRUE_BAND: RangeInclusive<u8> = 85..=100;
/// Truthfulness band for `FALSE`.
pub const FALSE_BAND: RangeInclusive<u8> = 0..=15;
/// Truthfulness band for `PARTIALLY_TRUE`.
pub const PARTIALLY_TRUE_BAND: RangeInclusive<u8> = 40..=75;
/// Truthfulness band for `MISLEADING`.
pub const MISLEADING_BAND: RangeInclusive<u8> = 20..=50;

/// The outcome category of a fact-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    True,
    False,
    PartiallyTrue,
    Unverified,
    Misleading,
}

impl Verdict {
    /// Classify a truthfulness score given the analysis concerns.
    pub fn classify<S: AsRef<str>>(truthfulness: u8, concerns: &[S]) -> Verdict {
        let deceptive = any_deceptive_framing(concerns);

        if TRUE_BAND.contains(&truthfulness) {
            Verdict::True
        } else if FALSE_BAND.contains(&truthfulness) {
            Verdict::False
        } else if PARTIALLY_TRUE_BAND.contains(&truthfulness) && !deceptive {
            Verdict::PartiallyTrue
        } else if MISLEADING_BAND.contains(&truthfulness) && deceptive {
            Verdict::Misleading
        } else {
            Verdict::Unverified
        }
    }

    /// Derive the verdict for an analysis result.
    ///
    /// A fallback analysis carries no information about the headline, so it
    /// is always `UNVERIFIED` regardless of its zeroed score.
    pub fn for_analysis(analysis: &AnalysisResult) -> Verdict {
        if analysis.is_fallback() {
            return Verdict::Unverified;
        }
        Verdict::classify(analysis.truthfulness(), analysis.concerns())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::True => "TRUE",
            Verdict::False => "FALSE",
            Verdict::PartiallyTrue => "PARTIALLY_TRUE",
            Verdict::Unverified => "UNVERIFIED",
            Verdict::Misleading => "MISLEADING",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Verdict::True => "✅",
            Verdict::False => "❌",
            Verdict::PartiallyTrue => "⚠️",
            Verdict::Unverified => "❓",
            Verdict::Misleading => "🚨",
        }
    }

    /// All verdicts in classification-table order.
    pub fn all() -> [Verdict; 5] {
        [
            Verdict::True,
            Verdict::False,
            Verdict::PartiallyTrue,
            Verdict::Misleading,
            Verdict::Unverified,
        ]
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
