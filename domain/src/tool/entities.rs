//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Side-effect class of a tool.
///
/// Decides whether an invocation has to pass the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideEffect {
    /// Only observes state (read_file, list_directory, glob/grep search)
    ReadOnly,
    /// May change file-system, shell or external state (write_file, run_shell_command)
    Mutating,
}

impl SideEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideEffect::ReadOnly => "read-only",
            SideEffect::Mutating => "mutating",
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        matches!(self, SideEffect::Mutating)
    }
}

impl std::fmt::Display for SideEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    /// A file-system path; a string on the wire
    Path,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    /// JSON Schema type name.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String | ParamType::Path => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }

    /// Whether `value` is acceptable for this type.
    ///
    /// `Integer` only accepts integral numbers; `Number` accepts any number.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String | ParamType::Path => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Path => f.write_str("path"),
            other => f.write_str(other.json_type()),
        }
    }
}

/// Name of the JSON type a value actually has, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Registration metadata of a tool: its name, parameter schema and side-effect class.
///
/// Immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "read_file")
    pub name: String,
    /// Description shown to the LLM to inform tool selection
    pub description: String,
    pub side_effect: SideEffect,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        side_effect: SideEffect,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            side_effect,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn requires_confirmation(&self) -> bool {
        self.side_effect.requires_confirmation()
    }
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub param_type: ParamType,
    /// Value filled in when the argument is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolParameter {
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        param_type: ParamType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
            param_type,
            default: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        param_type: ParamType,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, param_type)
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A proposal to call one tool with concrete arguments.
///
/// Produced by the LLM backend. It only reaches a tool after the
/// registry has resolved the name and the validator has accepted
/// (and normalized) the arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: BTreeMap<String, Value>,
    /// Text the model emitted alongside the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Backend-assigned call id, echoed back with the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: BTreeMap::new(),
            reasoning: None,
            call_id: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    pub fn require_str(&self, key: &str) -> Result<&str, String> {
        self.get_str(key)
            .ok_or_else(|| format!("Missing required string argument '{}'", key))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Non-negative integer argument; negative values read as absent.
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_u64())
            .and_then(|n| usize::try_from(n).ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Arguments as a JSON object, as sent back to the backend.
    pub fn arguments_json(&self) -> Value {
        Value::Object(
            self.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
