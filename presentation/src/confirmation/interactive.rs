//! Terminal confirmation for mutating tool calls.
//!
//! # User Interface
//!
//! ```text
//! ═══════════════════════════════════════════════════════════════
//!   ⚠  Confirm: run_shell_command (mutating)
//! ═══════════════════════════════════════════════════════════════
//!
//! Execute a shell command and return its combined stdout/stderr.
//!
//! Reason:
//!   Cleaning the build directory.
//!
//! Arguments:
//!   command: "rm -rf target"
//!
//! This tool can change files or run commands on your machine.
//!
//! Run it? [y]es / [n]o >
//! ```
//!
//! # Answers
//!
//! | Answer | Aliases |
//! |--------|---------|
//! | accept | `y`, `yes`, `a`, `approve` |
//! | reject | `n`, `no`, `r`, `reject` |
//!
//! Empty input asks again. End of input counts as a rejection.

use async_trait::async_trait;
use colored::Colorize;
use severino_application::{ConfirmationError, ConfirmationPort};
use severino_domain::core::string::truncate;
use severino_domain::{Decision, ToolCall, ToolDefinition};
use std::io::{self, BufRead, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Longest argument value shown in full
const MAX_ARG_PREVIEW: usize = 2000;

/// Terminal-based [`ConfirmationPort`].
///
/// Blocks the turn until the user answers; there is no timeout.
#[derive(Debug, Default)]
pub struct InteractiveConfirmation;

impl InteractiveConfirmation {
    pub fn new() -> Self {
        Self
    }

    /// The box shown before asking.
    pub fn render(call: &ToolCall, definition: &ToolDefinition) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!("{}\n", RULE.yellow().bold()));
        out.push_str(&format!(
            "{}\n",
            format!(
                "  ⚠  Confirm: {} ({})",
                call.tool_name, definition.side_effect
            )
            .yellow()
            .bold()
        ));
        out.push_str(&format!("{}\n\n", RULE.yellow().bold()));
        out.push_str(&format!("{}\n\n", definition.description.dimmed()));

        if let Some(reasoning) = call.reasoning.as_deref().filter(|r| !r.trim().is_empty()) {
            out.push_str(&format!("{}\n", "Reason:".cyan().bold()));
            for line in reasoning.lines() {
                out.push_str(&format!("  {}\n", line));
            }
            out.push('\n');
        }

        out.push_str(&format!("{}\n", "Arguments:".cyan().bold()));
        if call.arguments.is_empty() {
            out.push_str("  (none)\n");
        }
        for (key, value) in &call.arguments {
            let rendered = match value {
                serde_json::Value::String(s) if s.contains('\n') => {
                    let body = truncate(s, MAX_ARG_PREVIEW);
                    let indented: Vec<String> =
                        body.lines().map(|l| format!("    │ {}", l)).collect();
                    format!("\n{}", indented.join("\n"))
                }
                other => truncate(
                    &serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
                    MAX_ARG_PREVIEW,
                ),
            };
            out.push_str(&format!("  {}: {}\n", key.bold(), rendered));
        }
        out.push('\n');
        out.push_str(&format!(
            "{}\n",
            "This tool can change files or run commands on your machine.".red()
        ));
        out
    }
}

/// Map one line of input to a decision. `None` means "ask again".
pub fn parse_answer(input: &str) -> Option<Decision> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "a" | "approve" => Some(Decision::Accept),
        "n" | "no" | "r" | "reject" => Some(Decision::Reject),
        _ => None,
    }
}

/// Prompt on `writer` until `reader` yields an answer.
pub fn read_decision<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<Decision, ConfirmationError> {
    let io_err = |e: io::Error| ConfirmationError::IoError(e.to_string());
    loop {
        write!(writer, "{} ", "Run it? [y]es / [n]o >".magenta().bold()).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        let mut line = String::new();
        if reader.read_line(&mut line).map_err(io_err)? == 0 {
            writeln!(writer).map_err(io_err)?;
            return Ok(Decision::Reject);
        }

        if line.trim().is_empty() {
            continue;
        }
        match parse_answer(&line) {
            Some(decision) => return Ok(decision),
            None => {
                writeln!(
                    writer,
                    "{} Unknown answer: {}. Type y or n.",
                    "⚠".yellow(),
                    line.trim().red()
                )
                .map_err(io_err)?;
            }
        }
    }
}

#[async_trait]
impl ConfirmationPort for InteractiveConfirmation {
    async fn confirm(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<Decision, ConfirmationError> {
        print!("{}", Self::render(call, definition));

        let decision = tokio::task::spawn_blocking(|| {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            read_decision(&mut stdin.lock(), &mut stdout)
        })
        .await
        .map_err(|e| ConfirmationError::IoError(e.to_string()))??;

        match decision {
            Decision::Accept => println!("{}\n", "✓ Accepted".green()),
            Decision::Reject => println!("{}\n", "✗ Rejected".red()),
        }
        Ok(decision)
    }
}
