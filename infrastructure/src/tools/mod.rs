//! Built-in tools and the registry that holds them
//!
//! | Tool | Side effect |
//! |------|-------------|
//! | `read_file` | read-only |
//! | `list_directory` | read-only |
//! | `glob_search` | read-only |
//! | `grep_search` | read-only |
//! | `write_file` | mutating |
//! | `run_shell_command` | mutating |

pub mod command;
pub mod file;
pub mod search;

mod registry;
mod schema;
mod settings;

pub use registry::{RegistryError, ToolRegistry};
pub use schema::JsonSchemaToolConverter;
pub use settings::ToolSettings;

use severino_domain::Tool;
use std::sync::Arc;

/// Every built-in tool, configured with `settings`.
///
/// The search tools are left out when `enable_search` is false.
pub fn builtin_tools(settings: Arc<ToolSettings>, enable_search: bool) -> Vec<Arc<dyn Tool>> {
    let mut tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(file::ReadFileTool::new(settings.clone())),
        Arc::new(file::ListDirectoryTool::new(settings.clone())),
        Arc::new(file::WriteFileTool::new(settings.clone())),
        Arc::new(command::RunShellCommandTool::new(settings.clone())),
    ];
    if enable_search {
        tools.push(Arc::new(search::GlobSearchTool::new(settings.clone())));
        tools.push(Arc::new(search::GrepSearchTool::new(settings)));
    }
    tools
}

/// A registry holding the built-in tools.
pub fn default_registry(
    settings: Arc<ToolSettings>,
    enable_search: bool,
) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    for tool in builtin_tools(settings, enable_search) {
        registry.register(tool)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use severino_application::{
        ConfirmationError, ConfirmationPort, GatewayError, GenerateRequest, LlmGateway,
        NoTurnProgress, RunTurnUseCase, ToolExecutorPort, TurnInput, TurnParams,
    };
    use severino_domain::{
        ConfirmationMode, ContentBlock, Decision, ErrorCode, LlmResponse, Session, SideEffect,
        StopReason, SystemPrompt, ToolCall, ToolDefinition,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct ScriptedGateway(Mutex<VecDeque<Result<LlmResponse, GatewayError>>>);

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn provider(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn generate(
            &self,
            _request: GenerateRequest<'_>,
        ) -> Result<LlmResponse, GatewayError> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(LlmResponse::from_text("done")))
        }
    }

    struct Answer(Decision);

    #[async_trait]
    impl ConfirmationPort for Answer {
        async fn confirm(
            &self,
            _call: &ToolCall,
            _definition: &ToolDefinition,
        ) -> Result<Decision, ConfirmationError> {
            Ok(self.0)
        }
    }

    fn write_proposal(path: &str) -> Result<LlmResponse, GatewayError> {
        let input = [
            ("path".to_string(), Value::from(path)),
            ("content".to_string(), json!("written by the agent")),
        ]
        .into_iter()
        .collect();
        Ok(LlmResponse {
            content: vec![ContentBlock::ToolUse {
                id: None,
                name: file::WRITE_FILE.to_string(),
                input,
            }],
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        })
    }

    fn agent(
        dir: &TempDir,
        script: Vec<Result<LlmResponse, GatewayError>>,
        mode: ConfirmationMode,
        decision: Decision,
    ) -> RunTurnUseCase {
        let settings = Arc::new(ToolSettings::new(dir.path()));
        let registry = default_registry(settings, true).unwrap();
        RunTurnUseCase::new(
            Arc::new(ScriptedGateway(Mutex::new(script.into()))),
            Arc::new(registry),
            &JsonSchemaToolConverter,
            &SystemPrompt::default(),
            TurnParams::default().with_confirmation(mode),
        )
        .with_confirmation_port(Arc::new(Answer(decision)))
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_disk_untouched() {
        let dir = TempDir::new().unwrap();
        let uc = agent(
            &dir,
            vec![
                write_proposal("notes.txt"),
                Ok(LlmResponse::from_text("Left it alone.")),
            ],
            ConfirmationMode::Interactive,
            Decision::Reject,
        );

        let mut session = Session::new("s");
        let output = uc
            .execute(&mut session, TurnInput::new("save notes"), &NoTurnProgress)
            .await
            .unwrap();

        assert!(!dir.path().join("notes.txt").exists());
        assert_eq!(output.executed_tools, 0);
        let invocation = session.invocations().next().unwrap();
        assert!(!invocation.executed);
        assert_eq!(invocation.result.error_code(), Some(ErrorCode::UserRejected));
    }

    #[tokio::test]
    async fn test_auto_reject_mode_leaves_disk_untouched() {
        let dir = TempDir::new().unwrap();
        let uc = agent(
            &dir,
            vec![write_proposal("notes.txt")],
            ConfirmationMode::AutoReject,
            Decision::Accept,
        );

        let mut session = Session::new("s");
        uc.execute(&mut session, TurnInput::new("save notes"), &NoTurnProgress)
            .await
            .unwrap();

        assert!(!dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_backend_failure_after_write_keeps_it_in_history() {
        let dir = TempDir::new().unwrap();
        let uc = agent(
            &dir,
            vec![write_proposal("notes.txt"), Err(GatewayError::Timeout)],
            ConfirmationMode::AutoApprove,
            Decision::Reject,
        );

        let mut session = Session::new("s");
        let err = uc
            .execute(&mut session, TurnInput::new("save notes"), &NoTurnProgress)
            .await
            .unwrap_err();

        assert!(err.is_backend());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "written by the agent"
        );
        assert_eq!(session.len(), 2);
        let invocation = session.invocations().next().unwrap();
        assert_eq!(invocation.call.tool_name, file::WRITE_FILE);
        assert!(invocation.executed);
        assert!(invocation.result.is_success());
    }

    #[test]
    fn test_default_registry_side_effects() {
        let registry = default_registry(Arc::new(ToolSettings::default()), true).unwrap();

        assert_eq!(registry.len(), 6);
        for name in ["read_file", "list_directory", "glob_search", "grep_search"] {
            assert_eq!(
                registry.lookup(name).unwrap().side_effect,
                SideEffect::ReadOnly,
                "{name}"
            );
        }
        for name in ["write_file", "run_shell_command"] {
            assert!(registry.lookup(name).unwrap().requires_confirmation(), "{name}");
        }
    }

    #[test]
    fn test_search_can_be_disabled() {
        let registry = default_registry(Arc::new(ToolSettings::default()), false).unwrap();
        assert!(!registry.has_tool("grep_search"));
        assert!(registry.has_tool("read_file"));
    }
}
