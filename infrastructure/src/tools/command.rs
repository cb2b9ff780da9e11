//! Command execution tool: run_shell_command

use super::file::io_error;
use super::settings::ToolSettings;
use async_trait::async_trait;
use severino_domain::{
    ParamType, SideEffect, Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Tool name constant
pub const RUN_SHELL_COMMAND: &str = "run_shell_command";

const TRUNCATION_MARKER: &str = "\n... (output truncated)";

/// Get the tool definition for run_shell_command
pub fn run_shell_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_SHELL_COMMAND,
        "Execute a shell command and return its combined stdout/stderr. A non-zero exit code is reported in the output.",
        SideEffect::Mutating,
    )
    .with_parameter(ToolParameter::required(
        "command",
        "The command line to execute",
        ParamType::String,
    ))
    .with_parameter(ToolParameter::optional(
        "working_dir",
        "Directory to run the command in",
        ParamType::Path,
    ))
    .with_parameter(ToolParameter::optional(
        "timeout_secs",
        "Timeout in seconds",
        ParamType::Integer,
    ))
}

fn shell_command(command_line: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command_line]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]);
        cmd
    }
}

/// Cut `output` to at most `max` bytes on a char boundary.
fn truncate_output(mut output: String, max: usize) -> String {
    if output.len() <= max {
        return output;
    }
    let mut end = max;
    while !output.is_char_boundary(end) {
        end -= 1;
    }
    output.truncate(end);
    output.push_str(TRUNCATION_MARKER);
    output
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);

    let mut combined = String::new();
    combined.push_str(&stdout);
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&stderr);
    }
    combined
}

pub struct RunShellCommandTool {
    definition: ToolDefinition,
    settings: Arc<ToolSettings>,
}

impl RunShellCommandTool {
    pub fn new(settings: Arc<ToolSettings>) -> Self {
        Self {
            definition: run_shell_command_definition(),
            settings,
        }
    }
}

#[async_trait]
impl Tool for RunShellCommandTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let command_line = call
            .require_str("command")
            .map_err(ToolError::invalid_argument)?;
        if command_line.trim().is_empty() {
            return Err(ToolError::invalid_argument("command must not be empty"));
        }

        let working_dir = match call.get_str("working_dir") {
            Some(dir) => self.settings.resolve(dir),
            None => self.settings.working_dir.clone(),
        };
        if !working_dir.is_dir() {
            return Err(ToolError::not_found(working_dir.display())
                .with_details("working directory does not exist"));
        }

        let timeout = call
            .get_usize("timeout_secs")
            .map(|secs| Duration::from_secs(secs as u64))
            .unwrap_or(self.settings.shell_timeout);

        debug!(command = command_line, dir = %working_dir.display(), "Spawning shell command");

        let child = shell_command(command_line)
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => io_error(e, &working_dir),
                _ => ToolError::execution_failed(format!("Failed to spawn command: {}", e)),
            })?;

        // Dropping the wait future on timeout kills the child.
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ToolError::timeout(format!(
                    "command did not finish within {} seconds: {}",
                    timeout.as_secs(),
                    command_line
                ))
            })?
            .map_err(|e| ToolError::execution_failed(format!("Failed to wait for process: {}", e)))?;

        let exit_code = output.status.code().unwrap_or(-1);
        let combined = truncate_output(
            combine_output(&output.stdout, &output.stderr),
            self.settings.max_output_bytes,
        );

        let text = if output.status.success() {
            combined
        } else {
            format!("Command exited with code {}\n{}", exit_code, combined)
        };
        let bytes = text.len();

        Ok(ToolResult::success(RUN_SHELL_COMMAND, text)
            .with_exit_code(exit_code)
            .with_bytes(bytes))
    }
}
