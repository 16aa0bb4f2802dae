//! Structural validation of submitted payloads
//!
//! Runs on the raw request bytes before any typed parsing, so later stages
//! only ever see shape-checked documents.

use jsonschema::{ValidationError, Validator};
use serde_json::{Value, json};
use shared::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to compile payload schema: {0}")]
    InvalidSchema(String),
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload does not match schema: {}", .0.join("; "))]
    Mismatch(Vec<String>),
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::InvalidSchema(msg) => AppError::internal(msg),
            other => AppError::invalid_payload(other.to_string()),
        }
    }
}

/// Compiled performance payload schema
pub struct PayloadSchema {
    validator: Validator,
}

impl PayloadSchema {
    pub fn new() -> Result<Self, SchemaError> {
        let validator = Validator::new(&performance_schema())
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Parse `bytes` as JSON and check it against the schema.
    ///
    /// Returns the parsed document so callers do not parse twice.
    pub fn validate(&self, bytes: &[u8]) -> Result<Value, SchemaError> {
        let value: Value = serde_json::from_slice(bytes)?;

        if let Err(errors) = self.validator.validate(&value) {
            let messages: Vec<String> = errors.map(|e| format_validation_error(&e)).collect();
            return Err(SchemaError::Mismatch(messages));
        }

        Ok(value)
    }
}

fn format_validation_error(error: &ValidationError) -> String {
    format!("{}: {}", error.instance_path, error)
}

fn performance_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Performance test results",
        "type": "object",
        "properties": {
            "sessionId": { "type": "string" },
            "userId": { "type": "string" },
            "events": {
                "type": "array",
                "items": { "$ref": "#/definitions/event" }
            }
        },
        "required": ["sessionId", "userId", "events"],
        "definitions": {
            "event": {
                "type": "object",
                "required": ["eventName"],
                "properties": {
                    "eventName": { "type": "string" },
                    "attributes": { "$ref": "#/definitions/attributes" }
                }
            },
            "attributes": {
                "type": "array",
                "items": { "$ref": "#/definitions/attribute" }
            },
            "attribute": {
                "type": "object",
                "required": ["name", "value"],
                "properties": {
                    "name": { "type": "string" },
                    "value": { "type": "string" }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> PayloadSchema {
        PayloadSchema::new().unwrap()
    }

    #[test]
    fn test_accepts_minimal_payload() {
        let body = br#"{"sessionId":"a-2024.01.01-00.00.00","userId":"a","events":[]}"#;
        assert!(schema().validate(body).is_ok());
    }

    #[test]
    fn test_accepts_event_without_attributes() {
        let body = br#"{"sessionId":"a-b","userId":"a","buildInfo":"1.0","events":[{"eventName":"Boot"}]}"#;
        assert!(schema().validate(body).is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = schema().validate(b"{\"sessionId\":").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_rejects_missing_required_fields() {
        let s = schema();
        for body in [
            r#"{"userId":"a","events":[]}"#,
            r#"{"sessionId":"a-b","events":[]}"#,
            r#"{"sessionId":"a-b","userId":"a"}"#,
            r#"{"sessionId":"a-b","userId":"a","events":[{"attributes":[]}]}"#,
            r#"{"sessionId":"a-b","userId":"a","events":[{"eventName":"E","attributes":[{"name":"n"}]}]}"#,
        ] {
            let err = s.validate(body.as_bytes()).unwrap_err();
            assert!(matches!(err, SchemaError::Mismatch(_)), "{body}");
        }
    }

    #[test]
    fn test_rejects_wrong_types() {
        let s = schema();
        for body in [
            r#"[]"#,
            r#"{"sessionId":1,"userId":"a","events":[]}"#,
            r#"{"sessionId":"a-b","userId":"a","events":{}}"#,
            r#"{"sessionId":"a-b","userId":"a","events":[{"eventName":"E","attributes":{}}]}"#,
            r#"{"sessionId":"a-b","userId":"a","events":[{"eventName":"E","attributes":[{"name":"n","value":10}]}]}"#,
        ] {
            assert!(s.validate(body.as_bytes()).is_err(), "{body}");
        }
    }

    #[test]
    fn test_error_maps_to_invalid_payload() {
        let err: AppError = schema().validate(b"nope").unwrap_err().into();
        assert_eq!(err.code, shared::ErrorCode::InvalidPayload);
    }
}
