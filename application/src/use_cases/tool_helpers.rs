//! Shared helpers for tool use cases.

use severino_domain::ToolCall;
use severino_domain::core::string::truncate;

/// Short preview of a call's arguments for logs and progress lines.
///
/// Prefers the well-known keys (`command`, `path`, `pattern`), then the
/// first string argument.
pub fn tool_args_preview(call: &ToolCall) -> String {
    const KEYS: [&str; 3] = ["command", "path", "pattern"];

    let preview = KEYS
        .iter()
        .find_map(|key| call.get_str(key))
        .or_else(|| call.arguments.values().find_map(|v| v.as_str()))
        .unwrap_or_default();
    truncate(&preview.replace('\n', " "), 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_preferred_over_path() {
        let call = ToolCall::new("run_shell_command")
            .with_arg("working_dir", "/srv")
            .with_arg("command", "ls -la");
        assert_eq!(tool_args_preview(&call), "ls -la");
    }

    #[test]
    fn test_fallback_to_first_string() {
        let call = ToolCall::new("custom")
            .with_arg("count", 3)
            .with_arg("query", "needle");
        assert_eq!(tool_args_preview(&call), "needle");
    }

    #[test]
    fn test_newlines_flattened_and_truncated() {
        let long = format!("echo one\necho {}", "x".repeat(80));
        let call = ToolCall::new("run_shell_command").with_arg("command", long);
        let preview = tool_args_preview(&call);
        assert!(!preview.contains('\n'));
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= 60);
    }

    #[test]
    fn test_no_string_args() {
        assert_eq!(tool_args_preview(&ToolCall::new("noop")), "");
    }
}
