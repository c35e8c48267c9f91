//! Field validation for decoded model payloads.
//!
//! The model produces a proposal, not a verdict. Every field is checked
//! before it becomes part of an [`AnalysisResult`]; recoverable quirks are
//! repaired, everything else is rejected with a typed error.

use serde_json::{Map, Value};
use thiserror::Error;

use super::{AnalysisResult, SCORE_MAX};
use crate::evidence::{Relevance, Stance, StanceAssessment};

/// Errors from payload field validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field '{field}' is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },

    #[error("Field '{field}' out of range 0-100: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Validates one decoded payload object.
pub struct PayloadValidator<'a> {
    payload: &'a Map<String, Value>,
}

impl<'a> PayloadValidator<'a> {
    pub fn new(payload: &'a Map<String, Value>) -> Self {
        Self { payload }
    }

    /// Validate every field and build the result.
    pub fn validate(&self) -> Result<AnalysisResult, FieldError> {
        let truthfulness = self.truthfulness()?;
        let confidence = self.confidence()?;
        let analysis = self.analysis()?;

        let result = AnalysisResult::new(
            truthfulness,
            confidence,
            analysis,
            self.concerns(),
            self.recommendations(),
        )
        .with_assessments(self.assessments());

        Ok(result)
    }

    fn truthfulness(&self) -> Result<i64, FieldError> {
        let value = self.required_number("truthfulness")?;
        check_range("truthfulness", value)?;
        Ok(value.round() as i64)
    }

    fn confidence(&self) -> Result<f64, FieldError> {
        let mut value = self.required_number("confidence")?;

        // Models often answer on a 0-1 scale despite instructions. A bare
        // `1` is a percentage; `1.0` is full confidence on that scale.
        let fractional = (value > 0.0 && value < 1.0)
            || (value == 1.0 && self.payload.get("confidence").is_some_and(written_as_fraction));
        if fractional {
            tracing::debug!(confidence = value, "Rescaling fractional confidence to 0-100");
            value *= 100.0;
        }

        check_range("confidence", value)?;
        Ok(value)
    }

    fn analysis(&self) -> Result<String, FieldError> {
        match self.payload.get("analysis").and_then(Value::as_str) {
            Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Err(FieldError::MissingField("analysis")),
        }
    }

    fn concerns(&self) -> Vec<String> {
        match self.payload.get("concerns") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        }
    }

    fn recommendations(&self) -> String {
        match self.payload.get("recommendations") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            _ => String::new(),
        }
    }

    fn assessments(&self) -> Vec<StanceAssessment> {
        let Some(Value::Array(items)) = self.payload.get("evidence_assessments") else {
            return Vec::new();
        };

        items.iter().filter_map(parse_assessment).collect()
    }

    fn required_number(&self, field: &'static str) -> Result<f64, FieldError> {
        let value = self
            .payload
            .get(field)
            .filter(|v| !v.is_null())
            .ok_or(FieldError::MissingField(field))?;

        as_number(value).ok_or_else(|| FieldError::NotNumeric {
            field,
            value: value.to_string(),
        })
    }
}

fn check_range(field: &'static str, value: f64) -> Result<(), FieldError> {
    if (0.0..=SCORE_MAX as f64).contains(&value) {
        Ok(())
    } else {
        Err(FieldError::OutOfRange { field, value })
    }
}

/// Read a number from a JSON number or a numeric string ("85", "85%").
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Whether a number was written with a decimal point rather than as a
/// whole number or percentage.
fn written_as_fraction(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_f64(),
        Value::String(s) => s.contains('.') && !s.contains('%'),
        _ => false,
    }
}

fn parse_assessment(value: &Value) -> Option<StanceAssessment> {
    let obj = value.as_object()?;

    let index = as_number(obj.get("index")?)?;
    if index < 1.0 || index.fract() != 0.0 {
        return None;
    }

    let stance = match obj.get("stance").or_else(|| obj.get("supports"))? {
        Value::String(s) => Stance::parse(s)?,
        Value::Bool(true) => Stance::Supports,
        Value::Bool(false) => Stance::Contradicts,
        _ => return None,
    };

    let relevance = obj
        .get("relevance")
        .and_then(Value::as_str)
        .and_then(Relevance::parse);

    Some(StanceAssessment {
        index: index as usize,
        stance,
        relevance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: Value) -> Result<AnalysisResult, FieldError> {
        let map = value.as_object().cloned().unwrap();
        PayloadValidator::new(&map).validate()
    }

    #[test]
    fn test_valid_payload() {
        let result = validate(json!({
            "truthfulness": 12,
            "confidence": 88,
            "analysis": "  No outlet reports this.  ",
            "concerns": ["No sources", "", 42],
            "recommendations": "Wait for official statements."
        }))
        .unwrap();

        assert_eq!(result.truthfulness(), 12);
        assert_eq!(result.confidence(), 88.0);
        assert_eq!(result.analysis(), "No outlet reports this.");
        assert_eq!(result.concerns(), &["No sources".to_string()]);
        assert_eq!(result.recommendations(), "Wait for official statements.");
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let result = validate(json!({
            "truthfulness": "75%",
            "confidence": "60",
            "analysis": "x"
        }))
        .unwrap();
        assert_eq!(result.truthfulness(), 75);
        assert_eq!(result.confidence(), 60.0);
    }

    #[test]
    fn test_fractional_confidence_is_rescaled() {
        let result = validate(json!({
            "truthfulness": 50,
            "confidence": 0.85,
            "analysis": "x"
        }))
        .unwrap();
        assert!((result.confidence() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_confidence_follows_notation() {
        let fraction = validate(json!({"truthfulness": 50, "confidence": 1.0, "analysis": "x"})).unwrap();
        assert_eq!(fraction.confidence(), 100.0);

        let quoted = validate(json!({"truthfulness": 50, "confidence": "1.0", "analysis": "x"})).unwrap();
        assert_eq!(quoted.confidence(), 100.0);

        let percent = validate(json!({"truthfulness": 50, "confidence": 1, "analysis": "x"})).unwrap();
        assert_eq!(percent.confidence(), 1.0);

        let labelled = validate(json!({"truthfulness": 50, "confidence": "1%", "analysis": "x"})).unwrap();
        assert_eq!(labelled.confidence(), 1.0);
    }

    #[test]
    fn test_truthfulness_is_rounded() {
        let result = validate(json!({
            "truthfulness": 84.6,
            "confidence": 50,
            "analysis": "x"
        }))
        .unwrap();
        assert_eq!(result.truthfulness(), 85);
    }

    #[test]
    fn test_non_numeric_truthfulness() {
        let err = validate(json!({
            "truthfulness": "mostly",
            "confidence": 50,
            "analysis": "x"
        }))
        .unwrap_err();
        assert!(matches!(err, FieldError::NotNumeric { field: "truthfulness", .. }));
    }

    #[test]
    fn test_out_of_range() {
        let err = validate(json!({
            "truthfulness": 150,
            "confidence": 50,
            "analysis": "x"
        }))
        .unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { field: "truthfulness", .. }));

        let err = validate(json!({
            "truthfulness": 50,
            "confidence": -3,
            "analysis": "x"
        }))
        .unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { field: "confidence", .. }));
    }

    #[test]
    fn test_missing_fields() {
        let err = validate(json!({ "confidence": 50, "analysis": "x" })).unwrap_err();
        assert_eq!(err, FieldError::MissingField("truthfulness"));

        let err = validate(json!({ "truthfulness": 5, "confidence": 50, "analysis": "  " }))
            .unwrap_err();
        assert_eq!(err, FieldError::MissingField("analysis"));
    }

    #[test]
    fn test_single_string_concern_and_list_recommendations() {
        let result = validate(json!({
            "truthfulness": 30,
            "confidence": 50,
            "analysis": "x",
            "concerns": "Misleading framing",
            "recommendations": ["Check sources.", "Wait."]
        }))
        .unwrap();
        assert_eq!(result.concerns(), &["Misleading framing".to_string()]);
        assert_eq!(result.recommendations(), "Check sources. Wait.");
    }

    #[test]
    fn test_assessments_are_parsed_leniently() {
        let result = validate(json!({
            "truthfulness": 30,
            "confidence": 50,
            "analysis": "x",
            "evidence_assessments": [
                { "index": 1, "stance": "supports", "relevance": "high" },
                { "index": "2", "supports": false },
                { "index": 0, "stance": "supports" },
                { "index": 3, "stance": "perhaps" },
                "garbage"
            ]
        }))
        .unwrap();

        let assessments = result.assessments();
        assert_eq!(assessments.len(), 2);
        assert_eq!(assessments[0].stance, Stance::Supports);
        assert_eq!(assessments[0].relevance, Some(Relevance::High));
        assert_eq!(assessments[1].index, 2);
        assert_eq!(assessments[1].stance, Stance::Contradicts);
    }
}
