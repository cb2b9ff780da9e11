//! The invocation contract every tool implements.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::{ToolError, ToolResult};
use async_trait::async_trait;

/// A tool the agent can call.
///
/// Implementations are registered once at startup, keyed by
/// `definition().name`. `invoke` receives arguments that already passed
/// [`ToolValidator`](super::validation::ToolValidator), with defaults filled in.
///
/// An `Err` is a failure of the tool itself; the caller turns it into a
/// failed [`ToolResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ParamType, SideEffect, ToolParameter};

    struct Echo {
        definition: ToolDefinition,
    }

    #[async_trait]
    impl Tool for Echo {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
            let text = call.require_str("text").map_err(ToolError::invalid_argument)?;
            Ok(ToolResult::success(&self.definition.name, text))
        }
    }

    #[tokio::test]
    async fn test_tool_object_invocation() {
        let tool: Box<dyn Tool> = Box::new(Echo {
            definition: ToolDefinition::new("echo", "Echo text", SideEffect::ReadOnly)
                .with_parameter(ToolParameter::required("text", "Text", ParamType::String)),
        });

        let ok = tool
            .invoke(&ToolCall::new("echo").with_arg("text", "hello"))
            .await
            .unwrap();
        assert_eq!(ok.output(), Some("hello"));

        let err = tool.invoke(&ToolCall::new("echo")).await.unwrap_err();
        assert_eq!(err.code, crate::tool::value_objects::ErrorCode::InvalidArgument);
    }
}
