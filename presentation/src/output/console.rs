//! Console output for answers, tool listings and session history

use colored::Colorize;
use severino_application::{TurnError, TurnOutput, tool_args_preview};
use severino_domain::core::string::first_line;
use severino_domain::{SideEffect, ToolDefinition, Turn};

/// Formats turn results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The final answer of a turn, with a dimmed footer when tools ran.
    pub fn format_answer(output: &TurnOutput) -> String {
        let mut text = format!("\n{}\n", output.answer.trim_end());
        if output.executed_tools > 0 {
            text.push_str(&format!(
                "\n{}\n",
                format!(
                    "({} tool{} executed, {} LLM call{})",
                    output.executed_tools,
                    plural(output.executed_tools),
                    output.state.routing_rounds(),
                    plural(output.state.routing_rounds())
                )
                .dimmed()
            ));
        }
        text
    }

    /// Table of registered tools, read-only first.
    pub fn format_tools(definitions: &[&ToolDefinition]) -> String {
        let mut output = Self::header("Available Tools");
        output.push('\n');

        for (title, side_effect) in [
            ("Read-only", SideEffect::ReadOnly),
            ("Mutating (asks first)", SideEffect::Mutating),
        ] {
            let group: Vec<_> = definitions
                .iter()
                .filter(|d| d.side_effect == side_effect)
                .collect();
            if group.is_empty() {
                continue;
            }
            output.push_str(&Self::section_header(title));
            for def in group {
                output.push_str(&format!(
                    "  {:<20} {}\n",
                    def.name.bold(),
                    first_line(&def.description, 60)
                ));
                for param in &def.parameters {
                    let marker = if param.required { "*" } else { " " };
                    output.push_str(&format!(
                        "      {}{:<16} {}\n",
                        marker.red(),
                        param.name,
                        param.param_type.to_string().dimmed()
                    ));
                }
            }
        }
        output.push_str(&format!("\n{}\n", "* required".dimmed()));
        output
    }

    /// Compact transcript of a session.
    pub fn format_history(turns: &[Turn]) -> String {
        if turns.is_empty() {
            return format!("{}\n", "(no history yet)".dimmed());
        }
        let mut output = String::new();
        for turn in turns {
            let line = match turn {
                Turn::User { content } => {
                    format!("{} {}", "you  ".cyan().bold(), first_line(content, 100))
                }
                Turn::Agent { content } => {
                    format!("{} {}", "agent".green().bold(), first_line(content, 100))
                }
                Turn::ToolInvocation(invocation) => {
                    let status = if invocation.result.success {
                        "ok".green()
                    } else {
                        invocation
                            .result
                            .error
                            .as_ref()
                            .map(|e| e.code.as_str())
                            .unwrap_or("failed")
                            .red()
                    };
                    format!(
                        "{} {} {} [{}]",
                        "tool ".yellow().bold(),
                        invocation.call.tool_name,
                        tool_args_preview(&invocation.call).dimmed(),
                        status
                    )
                }
            };
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    pub fn format_error(err: &TurnError) -> String {
        let hint = match err {
            TurnError::Backend(_) => Some("check that the backend is reachable and the model exists"),
            TurnError::ToolRoundLimit(_) => Some("raise agent.max_tool_rounds or split the request"),
            _ => None,
        };
        let mut text = format!("{} {}", "Error:".red().bold(), err);
        if let Some(hint) = hint {
            text.push_str(&format!("\n  {}", hint.dimmed()));
        }
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use severino_domain::{
        Decision, ParamType, ToolCall, ToolInvocation, ToolParameter, ToolResult, TurnState,
    };

    #[test]
    fn test_format_tools_groups_by_side_effect() {
        let read = ToolDefinition::new("read_file", "Read a file", SideEffect::ReadOnly)
            .with_parameter(ToolParameter::required("path", "File", ParamType::Path));
        let write = ToolDefinition::new("write_file", "Write a file", SideEffect::Mutating);

        let text = ConsoleFormatter::format_tools(&[&write, &read]);

        let read_pos = text.find("read_file").unwrap();
        let write_pos = text.find("write_file").unwrap();
        assert!(read_pos < write_pos);
        assert!(text.contains("Mutating"));
        assert!(text.contains("path"));
    }

    #[test]
    fn test_format_history() {
        let turns = vec![
            Turn::User {
                content: "delete tmp".to_string(),
            },
            Turn::ToolInvocation(ToolInvocation {
                call: ToolCall::new("run_shell_command").with_arg("command", "rm -r tmp"),
                side_effect: Some(SideEffect::Mutating),
                decision: Some(Decision::Reject),
                executed: false,
                result: ToolResult::user_rejected("run_shell_command"),
            }),
            Turn::Agent {
                content: "Okay, I left tmp alone.".to_string(),
            },
        ];

        let text = ConsoleFormatter::format_history(&turns);

        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("rm -r tmp"));
        assert!(text.contains("USER_REJECTED"));
        assert!(text.contains("left tmp alone"));
        assert!(ConsoleFormatter::format_history(&[]).contains("no history"));
    }

    #[test]
    fn test_format_answer_footer() {
        let output = TurnOutput {
            answer: "Done.\n".to_string(),
            state: TurnState::new(),
            executed_tools: 0,
        };
        let text = ConsoleFormatter::format_answer(&output);
        assert!(text.contains("Done."));
        assert!(!text.contains("executed"));
    }

    #[test]
    fn test_format_error_hint() {
        let text = ConsoleFormatter::format_error(&TurnError::ToolRoundLimit(25));
        assert!(text.contains("25"));
        assert!(text.contains("max_tool_rounds"));
    }
}
