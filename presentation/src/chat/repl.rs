//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ConsoleProgress;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use severino_application::{
    NoTurnProgress, RunTurnUseCase, ToolExecutorPort, TurnInput, TurnProgressNotifier,
};
use severino_domain::Session;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 1000;

/// What the loop should do after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplAction {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: RunTurnUseCase,
    tools: Arc<dyn ToolExecutorPort>,
    session: Session,
    config: ReplConfig,
}

impl ChatRepl {
    pub fn new(use_case: RunTurnUseCase, tools: Arc<dyn ToolExecutorPort>, session: Session) -> Self {
        Self {
            use_case,
            tools,
            session,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn line_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.config.history_file else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "History file unavailable");
                editor
            }
        }
    }

    /// Run the interactive REPL until `exit`, `quit` or Ctrl+D.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("severino".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    if self.handle_line(&line).await == ReplAction::Exit {
                        break;
                    }
                }
                Signal::CtrlC => {
                    println!("^C");
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Dispatch one line of input.
    pub async fn handle_line(&mut self, line: &str) -> ReplAction {
        let line = line.trim();
        if line.is_empty() {
            return ReplAction::Continue;
        }
        if matches!(line, "exit" | "quit") {
            println!("Bye!");
            return ReplAction::Exit;
        }
        if line.starts_with('/') {
            return self.handle_command(line);
        }
        self.process_input(line).await;
        ReplAction::Continue
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Severino - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Confirmation: {}   Tools: {}",
            self.use_case.params().confirmation.to_string().cyan(),
            self.tools.definitions().len()
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /tools          - List available tools");
        println!("  /history        - Show the conversation so far");
        println!("  /clear          - Forget the conversation");
        println!("  /help           - Show this help");
        println!("  exit, quit      - Leave (or Ctrl+D)");
        println!();
        println!("Ctrl+C while the agent works cancels the current request.");
        println!();
    }

    fn handle_command(&mut self, cmd: &str) -> ReplAction {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return ReplAction::Exit;
            }
            "/help" | "/h" | "/?" => {
                println!();
                Self::print_help();
            }
            "/tools" => {
                println!("{}", ConsoleFormatter::format_tools(&self.tools.definitions()));
            }
            "/history" => {
                println!();
                print!("{}", ConsoleFormatter::format_history(self.session.turns()));
                println!();
            }
            "/clear" => {
                self.session.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        ReplAction::Continue
    }

    async fn process_input(&mut self, text: &str) {
        println!();

        let token = CancellationToken::new();
        let watcher = {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    debug!("Ctrl+C received, cancelling turn");
                    token.cancel();
                }
            })
        };

        let input = TurnInput::new(text).with_cancellation(token);
        let progress: Box<dyn TurnProgressNotifier> = if self.config.show_progress {
            Box::new(ConsoleProgress::new())
        } else {
            Box::new(NoTurnProgress)
        };

        let result = self
            .use_case
            .execute(&mut self.session, input, progress.as_ref())
            .await;
        watcher.abort();
        drop(progress);

        match result {
            Ok(output) => println!("{}", ConsoleFormatter::format_answer(&output)),
            Err(e) if e.is_cancelled() => println!("{}", "Cancelled.".yellow()),
            Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e)),
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use severino_application::{
        GatewayError, GenerateRequest, LlmGateway, ToolSchemaPort, TurnParams,
    };
    use severino_domain::{LlmResponse, SystemPrompt, ToolCall, ToolDefinition, ToolError, ToolResult};

    struct EchoGateway;

    #[async_trait]
    impl LlmGateway for EchoGateway {
        fn provider(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, GatewayError> {
            Ok(LlmResponse::from_text(format!("{} turns seen", request.history.len())))
        }
    }

    struct NoTools;

    #[async_trait]
    impl ToolExecutorPort for NoTools {
        fn definitions(&self) -> Vec<&ToolDefinition> {
            Vec::new()
        }

        fn lookup(&self, name: &str) -> Result<&ToolDefinition, ToolError> {
            Err(ToolError::unknown_tool(name))
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name))
        }
    }

    struct NoSchema;

    impl ToolSchemaPort for NoSchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
            serde_json::json!({"name": tool.name})
        }
    }

    fn repl() -> ChatRepl {
        let tools: Arc<dyn ToolExecutorPort> = Arc::new(NoTools);
        let use_case = RunTurnUseCase::new(
            Arc::new(EchoGateway),
            tools.clone(),
            &NoSchema,
            &SystemPrompt::new("test"),
            TurnParams::default(),
        );
        ChatRepl::new(use_case, tools, Session::new("test")).with_config(ReplConfig {
            show_progress: false,
            history_file: None,
        })
    }

    #[tokio::test]
    async fn test_turns_accumulate_and_clear() {
        let mut repl = repl();

        assert_eq!(repl.handle_line("hello").await, ReplAction::Continue);
        assert_eq!(repl.handle_line("again").await, ReplAction::Continue);
        assert_eq!(repl.session().len(), 4);
        assert_eq!(repl.session().last_agent_message(), Some("3 turns seen"));

        assert_eq!(repl.handle_line("/clear").await, ReplAction::Continue);
        assert!(repl.session().is_empty());
    }

    #[tokio::test]
    async fn test_exit_words_and_blank_lines() {
        let mut repl = repl();
        assert_eq!(repl.handle_line("   ").await, ReplAction::Continue);
        assert_eq!(repl.handle_line("/unknown").await, ReplAction::Continue);
        assert!(repl.session().is_empty());
        assert_eq!(repl.handle_line("quit").await, ReplAction::Exit);
        assert_eq!(repl.handle_line(" exit ").await, ReplAction::Exit);
    }
}
