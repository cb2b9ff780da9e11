//! Argument validation against a tool's parameter schema.
//!
//! Pure domain logic: no I/O. The registry runs the validator before
//! any tool is invoked, so a tool only ever sees normalized arguments.

use super::entities::{ParamType, ToolCall, ToolDefinition, json_kind};
use super::value_objects::ToolError;
use thiserror::Error;

/// Why a proposal's arguments do not fit the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter '{param}' for tool '{tool}'")]
    MissingParameter { tool: String, param: String },

    #[error("Unknown parameter '{param}' for tool '{tool}'")]
    UnknownParameter { tool: String, param: String },

    #[error("Parameter '{param}' of tool '{tool}' expects {expected}, got {found}")]
    TypeMismatch {
        tool: String,
        param: String,
        expected: ParamType,
        found: &'static str,
    },
}

impl From<ValidationError> for ToolError {
    fn from(err: ValidationError) -> Self {
        ToolError::invalid_argument(err.to_string())
    }
}

/// Validator for tool calls
pub trait ToolValidator {
    /// Check `call` against `definition` and return the call with
    /// defaults filled in.
    fn validate(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<ToolCall, ValidationError>;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<ToolCall, ValidationError> {
        // Unknown names first: a misspelled required parameter then reports
        // the typo rather than the missing name.
        if let Some(name) = call
            .arguments
            .keys()
            .find(|name| definition.parameter(name).is_none())
        {
            return Err(ValidationError::UnknownParameter {
                tool: definition.name.clone(),
                param: name.clone(),
            });
        }

        let mut normalized = call.clone();
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                // null is treated as omitted
                Some(value) if !value.is_null() => {
                    if !param.param_type.accepts(value) {
                        return Err(ValidationError::TypeMismatch {
                            tool: definition.name.clone(),
                            param: param.name.clone(),
                            expected: param.param_type,
                            found: json_kind(value),
                        });
                    }
                }
                _ => {
                    normalized.arguments.remove(&param.name);
                    if let Some(default) = &param.default {
                        normalized
                            .arguments
                            .insert(param.name.clone(), default.clone());
                    } else if param.required {
                        return Err(ValidationError::MissingParameter {
                            tool: definition.name.clone(),
                            param: param.name.clone(),
                        });
                    }
                }
            }
        }

        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{SideEffect, ToolParameter};
    use crate::tool::value_objects::ErrorCode;
    use serde_json::json;

    fn read_file_def() -> ToolDefinition {
        ToolDefinition::new("read_file", "Read a file", SideEffect::ReadOnly)
            .with_parameter(ToolParameter::required("path", "File path", ParamType::Path))
            .with_parameter(
                ToolParameter::optional("offset", "First line", ParamType::Integer)
                    .with_default(0),
            )
            .with_parameter(ToolParameter::optional("limit", "Line count", ParamType::Integer))
    }

    #[test]
    fn test_missing_required() {
        let call = ToolCall::new("read_file");
        let err = DefaultToolValidator
            .validate(&call, &read_file_def())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter {
                tool: "read_file".into(),
                param: "path".into()
            }
        );
    }

    #[test]
    fn test_unknown_param() {
        let call = ToolCall::new("read_file")
            .with_arg("path", "/tmp/a.txt")
            .with_arg("encoding", "utf-8");
        let err = DefaultToolValidator
            .validate(&call, &read_file_def())
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownParameter { ref param, .. } if param == "encoding"));
    }

    #[test]
    fn test_type_mismatch() {
        let call = ToolCall::new("read_file")
            .with_arg("path", "/tmp/a.txt")
            .with_arg("offset", "ten");
        let err = DefaultToolValidator
            .validate(&call, &read_file_def())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter 'offset' of tool 'read_file' expects integer, got string"
        );
    }

    #[test]
    fn test_defaults_filled_and_null_dropped() {
        let call = ToolCall::new("read_file")
            .with_arg("path", "/tmp/a.txt")
            .with_arg("limit", serde_json::Value::Null);
        let normalized = DefaultToolValidator
            .validate(&call, &read_file_def())
            .unwrap();
        assert_eq!(normalized.arguments.get("offset"), Some(&json!(0)));
        assert!(!normalized.arguments.contains_key("limit"));
        assert_eq!(normalized.get_str("path"), Some("/tmp/a.txt"));
    }

    #[test]
    fn test_converts_to_invalid_argument() {
        let err: ToolError = ValidationError::MissingParameter {
            tool: "write_file".into(),
            param: "content".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }
}
