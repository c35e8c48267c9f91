//! Decoding of raw model output into an [`AnalysisResult`].

use thiserror::Error;

use super::schema::validate_payload_schema;
use super::validator::{FieldError, PayloadValidator};
use super::AnalysisResult;
use crate::patterns::extract_json_object;

/// Why a model response could not be turned into an analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("no JSON object found in model response")]
    NoPayload,

    #[error("invalid JSON in model response: {0}")]
    InvalidJson(String),

    #[error("response does not match the analysis schema: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Decode raw model text into a validated analysis.
///
/// This never panics and never partially succeeds: the caller gets either a
/// complete, range-checked result or the reason it was rejected.
pub fn decode_analysis(text: &str) -> Result<AnalysisResult, DecodeError> {
    let span = extract_json_object(text).ok_or(DecodeError::NoPayload)?;

    let payload: serde_json::Value =
        serde_json::from_str(span).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    validate_payload_schema(&payload).map_err(DecodeError::Schema)?;

    // Schema guarantees an object
    let object = payload
        .as_object()
        .ok_or_else(|| DecodeError::Schema(vec!["payload is not an object".to_string()]))?;

    let result = PayloadValidator::new(object).validate()?;
    Ok(result)
}
