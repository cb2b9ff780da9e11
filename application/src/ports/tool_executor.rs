//! Tool Executor port
//!
//! Lookup, validation and execution of registered tools.

use async_trait::async_trait;
use severino_domain::{
    DefaultToolValidator, ToolCall, ToolDefinition, ToolError, ToolResult, ToolValidator,
};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Definitions of all registered tools, sorted by name.
    fn definitions(&self) -> Vec<&ToolDefinition>;

    /// The definition registered under `name`, or a `NOT_FOUND` error.
    fn lookup(&self, name: &str) -> Result<&ToolDefinition, ToolError>;

    fn has_tool(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Resolve the tool and check the arguments against its schema.
    ///
    /// Returns the definition and the call with defaults filled in.
    fn prepare(&self, call: &ToolCall) -> Result<(&ToolDefinition, ToolCall), ToolError> {
        let definition = self.lookup(&call.tool_name)?;
        let normalized = DefaultToolValidator.validate(call, definition)?;
        Ok((definition, normalized))
    }

    /// Execute one call.
    ///
    /// Never invokes the tool when [`prepare`](Self::prepare) would fail;
    /// tool failures come back as a `ToolResult` with `success == false`.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
