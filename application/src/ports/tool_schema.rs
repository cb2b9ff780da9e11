//! Tool schema conversion port.
//!
//! The domain says which tools exist; this port says how they are
//! serialized for a backend's function-calling API.

use severino_domain::ToolDefinition;

/// Port for converting tool definitions to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to provider-neutral JSON Schema.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools, sorted by name.
    fn all_tools_schema(&self, tools: &[&ToolDefinition]) -> Vec<serde_json::Value> {
        let mut sorted: Vec<&ToolDefinition> = tools.to_vec();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
