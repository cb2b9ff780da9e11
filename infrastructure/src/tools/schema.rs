//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`]. The output is
//! provider-neutral; each gateway reshapes it for its own API.

use severino_application::ToolSchemaPort;
use severino_domain::ToolDefinition;
use serde_json::{Map, Value, json};

/// Produces `{name, description, input_schema}` objects.
///
/// `path` parameters are plain strings on the wire. Parameter defaults
/// are carried in the schema so the model knows what omission means.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(param.param_type.json_type()));
            prop.insert("description".to_string(), json!(param.description));
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.clone());
            }
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
