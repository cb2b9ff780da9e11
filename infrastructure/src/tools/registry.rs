//! Tool Registry
//!
//! The [`ToolRegistry`] owns every tool available to the agent and
//! implements [`ToolExecutorPort`]. It is filled once at startup and
//! never shrinks.
//!
//! # Usage
//!
//! ```ignore
//! use severino_infrastructure::tools::{ToolRegistry, ToolSettings, default_registry};
//!
//! let registry = default_registry(Arc::new(ToolSettings::default()), true)?;
//! assert!(registry.has_tool("read_file"));
//!
//! let call = ToolCall::new("read_file").with_arg("path", "README.md");
//! let result = registry.execute(&call).await;
//! ```
//!
//! # Execution
//!
//! `execute` re-runs lookup and argument validation, so a call that was
//! never prepared still cannot reach a tool with bad arguments. Errors
//! returned by a tool, and panics inside it, come back as failed
//! [`ToolResult`]s.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use severino_application::ToolExecutorPort;
use severino_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolResult};
use thiserror::Error;
use tracing::{debug, error};

/// Errors raised while populating the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    Duplicate(String),

    #[error("Invalid tool name: {0:?}")]
    InvalidName(String),
}

/// Name-keyed set of tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A second tool with the same name is refused and the
    /// first registration stays in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.definition().name.clone();
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name));
        }
        if self.tools.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!(
            tool = %name,
            side_effect = %tool.definition().side_effect,
            "Registered tool"
        );
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    fn lookup(&self, name: &str) -> Result<&ToolDefinition, ToolError> {
        self.tools
            .get(name)
            .map(|t| t.definition())
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let normalized = match self.prepare(call) {
            Ok((_, normalized)) => normalized,
            Err(e) => {
                debug!(tool = %call.tool_name, error = %e, "Refusing tool call");
                return ToolResult::failure(&call.tool_name, e);
            }
        };
        let Some(tool) = self.tools.get(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name));
        };

        let start = Instant::now();
        let outcome = AssertUnwindSafe(tool.invoke(&normalized))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => ToolResult::failure(&call.tool_name, e),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(tool = %call.tool_name, panic = %message, "Tool panicked");
                ToolResult::failure(
                    &call.tool_name,
                    ToolError::execution_failed(format!("Tool panicked: {}", message)),
                )
            }
        };

        if result.metadata.duration_ms.is_some() {
            result
        } else {
            result.with_duration(start.elapsed().as_millis() as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use severino_domain::{ErrorCode, ParamType, SideEffect, ToolParameter};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTool {
        definition: ToolDefinition,
        calls: AtomicUsize,
    }

    impl CountingTool {
        fn new(name: &str) -> Self {
            Self {
                definition: ToolDefinition::new(name, "counts", SideEffect::ReadOnly).with_parameter(
                    ToolParameter::optional("n", "number", ParamType::Integer).with_default(7),
                ),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ToolResult::success(
                &self.definition.name,
                format!("n={}", call.get_i64("n").unwrap_or_default()),
            ))
        }
    }

    struct PanickingTool(ToolDefinition);

    #[async_trait]
    impl Tool for PanickingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.0
        }

        async fn invoke(&self, _call: &ToolCall) -> Result<ToolResult, ToolError> {
            panic!("boom");
        }
    }

    struct FailingTool(ToolDefinition);

    #[async_trait]
    impl Tool for FailingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.0
        }

        async fn invoke(&self, _call: &ToolCall) -> Result<ToolResult, ToolError> {
            Err(ToolError::permission_denied("/root"))
        }
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(CountingTool::new("count")))
            .unwrap();

        let second = Arc::new(FailingTool(ToolDefinition::new(
            "count",
            "imposter",
            SideEffect::Mutating,
        )));
        assert_eq!(
            registry.register(second),
            Err(RegistryError::Duplicate("count".to_string()))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("count").unwrap().description, "counts");
    }

    #[test]
    fn test_invalid_name_rejected() {
        let mut registry = ToolRegistry::new();
        let err = registry
            .register(Arc::new(CountingTool::new("two words")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_definitions_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CountingTool::new("zeta"))).unwrap();
        registry.register(Arc::new(CountingTool::new("alpha"))).unwrap();

        let names: Vec<_> = registry.definitions().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_execute_fills_defaults() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CountingTool::new("count"))).unwrap();

        let result = registry.execute(&ToolCall::new("count")).await;
        assert!(result.is_success());
        assert_eq!(result.output(), Some("n=7"));
        assert!(result.metadata.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry.execute(&ToolCall::new("nonexistent")).await;

        assert!(!result.is_success());
        assert_eq!(result.error_code(), Some(ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn test_execute_invalid_arguments_never_reach_tool() {
        let tool = Arc::new(CountingTool::new("count"));
        let mut registry = ToolRegistry::new();
        registry.register(tool.clone()).unwrap();

        let result = registry
            .execute(&ToolCall::new("count").with_arg("n", "seven"))
            .await;

        assert_eq!(result.error_code(), Some(ErrorCode::InvalidArgument));
        assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tool_error_becomes_failed_result() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(FailingTool(ToolDefinition::new(
                "fail",
                "always fails",
                SideEffect::ReadOnly,
            ))))
            .unwrap();

        let result = registry.execute(&ToolCall::new("fail")).await;
        assert_eq!(result.error_code(), Some(ErrorCode::PermissionDenied));
        assert_eq!(result.tool_name, "fail");
    }

    #[tokio::test]
    async fn test_panicking_tool_is_contained() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(PanickingTool(ToolDefinition::new(
                "explode",
                "panics",
                SideEffect::ReadOnly,
            ))))
            .unwrap();

        let result = registry.execute(&ToolCall::new("explode")).await;
        assert_eq!(result.error_code(), Some(ErrorCode::ExecutionFailed));
        assert!(result.error().unwrap().message.contains("boom"));
    }
}
