//! JSON Schema for the model's analysis payload.
//!
//! The schema only checks shape (required keys, coarse types). Range checks
//! and repairs live in the validator, which can give more specific errors.

use std::sync::OnceLock;

/// Embedded payload schema.
const ANALYSIS_SCHEMA_JSON: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "FactCheckAnalysis",
  "type": "object",
  "required": ["truthfulness", "confidence", "analysis"],
  "properties": {
    "truthfulness": { "type": ["number", "string"] },
    "confidence": { "type": ["number", "string"] },
    "analysis": { "type": "string" },
    "concerns": { "type": ["array", "string", "null"] },
    "recommendations": { "type": ["string", "null"] },
    "evidence_assessments": {
      "type": ["array", "null"],
      "items": { "type": "object" }
    }
  }
}"#;

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(ANALYSIS_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result.as_ref().map_err(|e| e.clone())
}

/// Validate a decoded payload against the analysis schema.
///
/// Returns every violation as `"<message> at <path>"`.
pub fn validate_payload_schema(payload: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(payload)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
