//! Progress reporting for a turn

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use severino_application::{TurnProgressNotifier, tool_args_preview};
use severino_domain::core::string::first_line;
use severino_domain::{Decision, ToolCall, ToolResult};
use std::sync::Mutex;
use std::time::Duration;

/// Prints one line per tool call and shows a spinner while the model thinks.
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn finish_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    /// One-line summary of a finished proposal.
    pub fn result_line(result: &ToolResult) -> String {
        if result.success {
            let mut line = format!("  {} {}", "✓".green(), result.tool_name.green());
            if let Some(ms) = result.metadata.duration_ms {
                line.push_str(&format!(" {}", format!("({} ms)", ms).dimmed()));
            }
            if let Some(code) = result.metadata.exit_code.filter(|c| *c != 0) {
                line.push_str(&format!(" {}", format!("exit {}", code).yellow()));
            }
            line
        } else {
            let message = result
                .error
                .as_ref()
                .map(|e| format!("[{}] {}", e.code, first_line(&e.message, 80)))
                .unwrap_or_else(|| "failed".to_string());
            format!("  {} {} {}", "✗".red(), result.tool_name.red(), message.dimmed())
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.finish_spinner();
    }
}

impl TurnProgressNotifier for ConsoleProgress {
    fn on_routing(&self, round: usize) {
        self.finish_spinner();

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Thinking");
        if round > 1 {
            pb.set_message(format!("(round {})", round));
        } else {
            pb.set_message("...");
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_routing_done(&self) {
        self.finish_spinner();
    }

    fn on_proposal(&self, call: &ToolCall) {
        println!(
            "  {} {} {}",
            "🔧".dimmed(),
            call.tool_name.cyan(),
            tool_args_preview(call).dimmed()
        );
    }

    fn on_decision(&self, call: &ToolCall, decision: Decision) {
        if decision == Decision::Reject {
            println!("  {} {} skipped", "⊘".yellow(), call.tool_name.yellow());
        }
    }

    fn on_tool_result(&self, result: &ToolResult) {
        println!("{}", Self::result_line(result));
    }

    fn on_turn_error(&self, message: &str) {
        self.finish_spinner();
        eprintln!("{} {}", "✗".red(), message.red());
    }
}
