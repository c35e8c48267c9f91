//! Analysis results produced by the language model.
//!
//! The model's output is untrusted text. [`decode_analysis`] turns it into a
//! validated [`AnalysisResult`] or a typed [`DecodeError`]; callers substitute
//! [`AnalysisResult::fallback`] on the error tag and never propagate it.

mod decode;
mod schema;
mod validator;

pub use decode::{decode_analysis, DecodeError};
pub use schema::validate_payload_schema;
pub use validator::{FieldError, PayloadValidator};

use serde::Serialize;

use crate::evidence::StanceAssessment;

/// Upper bound for truthfulness and confidence.
pub const SCORE_MAX: u8 = 100;

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOrigin {
    /// Decoded from a well-formed model response.
    Model,
    /// Synthesized after the model call or decoding failed.
    Fallback,
}

/// Structured outcome of one fact-check analysis.
///
/// Truthfulness and confidence are clamped to `[0, 100]` on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    truthfulness: u8,
    confidence: f64,
    analysis: String,
    concerns: Vec<String>,
    recommendations: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    assessments: Vec<StanceAssessment>,
    origin: AnalysisOrigin,
}

impl AnalysisResult {
    /// Create a model-originated result.
    pub fn new(
        truthfulness: i64,
        confidence: f64,
        analysis: impl Into<String>,
        concerns: Vec<String>,
        recommendations: impl Into<String>,
    ) -> Self {
        Self {
            truthfulness: clamp_truthfulness(truthfulness),
            confidence: clamp_confidence(confidence),
            analysis: analysis.into(),
            concerns,
            recommendations: recommendations.into(),
            assessments: Vec::new(),
            origin: AnalysisOrigin::Model,
        }
    }

    /// Attach per-item stance assessments.
    pub fn with_assessments(mut self, assessments: Vec<StanceAssessment>) -> Self {
        self.assessments = assessments;
        self
    }

    /// The neutral result used whenever the model cannot be trusted.
    ///
    /// Truthfulness and confidence are both zero; the diagnostic explains why.
    pub fn fallback(diagnostic: impl Into<String>) -> Self {
        let diagnostic = diagnostic.into();
        Self {
            truthfulness: 0,
            confidence: 0.0,
            analysis: format!("Automated analysis unavailable: {}", diagnostic),
            concerns: vec![format!("Analysis could not be completed ({})", diagnostic)],
            recommendations: "Manual verification recommended. Consult established news outlets and fact-checking organizations before sharing.".to_string(),
            assessments: Vec::new(),
            origin: AnalysisOrigin::Fallback,
        }
    }

    pub fn truthfulness(&self) -> u8 {
        self.truthfulness
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    pub fn concerns(&self) -> &[String] {
        &self.concerns
    }

    pub fn recommendations(&self) -> &str {
        &self.recommendations
    }

    pub fn assessments(&self) -> &[StanceAssessment] {
        &self.assessments
    }

    pub fn origin(&self) -> AnalysisOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == AnalysisOrigin::Fallback
    }
}

fn clamp_truthfulness(value: i64) -> u8 {
    value.clamp(0, SCORE_MAX as i64) as u8
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, SCORE_MAX as f64)
    }
}
