//! CLI entrypoint for severino
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use severino_application::{
    ConversationLogger, NoConversationLogger, NoTurnProgress, RunTurnUseCase, ToolExecutorPort,
    TurnInput, TurnParams,
};
use severino_domain::{ConfigIssue, ConfirmationMode, ProviderKind, Session, SystemPrompt};
use severino_infrastructure::{
    ConfigLoader, FileConfig, JsonSchemaToolConverter, JsonlConversationLogger, build_gateway,
    default_registry,
};
use severino_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, ConsoleProgress, InteractiveConfirmation,
    ReplConfig,
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Replaces the built-in persona when present in the working directory
const LOCAL_PROMPT_FILE: &str = "system_prompt.txt";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);

    let _log_guard = init_tracing(cli.verbose, &config);

    let issues = config.validate();
    report_issues(&issues);
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Invalid configuration");
    }

    let (provider_kind, _) = config.provider.parse_kind();
    let (confirmation, _) = config.agent.parse_confirmation();
    let working_dir = config.working_dir();
    info!(
        provider = %provider_kind,
        confirmation = %confirmation,
        working_dir = %working_dir.display(),
        "Starting severino"
    );

    // === Dependency Injection ===
    let settings = Arc::new(config.tools.to_settings(working_dir.clone()));
    let registry = default_registry(settings, config.tools.enable_search)?;
    let tools: Arc<dyn ToolExecutorPort> = Arc::new(registry);

    if matches!(cli.command, Some(Command::Tools)) {
        println!("{}", ConsoleFormatter::format_tools(&tools.definitions()));
        return Ok(());
    }

    let gateway = build_gateway(&config.provider)?;
    let system_prompt = load_system_prompt(&config, &working_dir)?;

    let session = Session::new(new_session_id());
    let logger = conversation_logger(&config, session.id());

    let params = TurnParams::default()
        .with_max_tool_rounds(config.agent.max_tool_rounds)
        .with_confirmation(confirmation);
    let use_case = RunTurnUseCase::new(
        gateway.clone(),
        tools.clone(),
        &JsonSchemaToolConverter,
        &system_prompt,
        params,
    )
    .with_confirmation_port(Arc::new(InteractiveConfirmation::new()))
    .with_conversation_logger(logger);

    let show_progress = config.repl.show_progress && !cli.quiet;

    match cli.command {
        Some(Command::Ask { prompt }) => {
            run_once(&use_case, session, &prompt, show_progress).await
        }
        Some(Command::Chat) | None => {
            if !cli.quiet {
                println!(
                    "{} {} / {}",
                    "Backend:".dimmed(),
                    gateway.provider(),
                    gateway.model()
                );
            }
            let repl_config = ReplConfig {
                show_progress,
                history_file: config.repl.history_path(),
            };
            let mut repl = ChatRepl::new(use_case, tools, session).with_config(repl_config);
            repl.run().await?;
            Ok(())
        }
        Some(Command::Tools) => Ok(()),
    }
}

/// `ask`: one turn, answer on stdout, non-zero exit on failure.
async fn run_once(
    use_case: &RunTurnUseCase,
    mut session: Session,
    prompt: &str,
    show_progress: bool,
) -> Result<()> {
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let input = TurnInput::new(prompt).with_cancellation(token);
    let result = if show_progress {
        let progress = ConsoleProgress::new();
        use_case.execute(&mut session, input, &progress).await
    } else {
        use_case.execute(&mut session, input, &NoTurnProgress).await
    };
    watcher.abort();

    match result {
        Ok(output) => {
            println!("{}", output.answer.trim_end());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// CLI flags win over every config source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(provider) = cli.provider {
        config.provider.kind = ProviderKind::from(provider).as_str().to_string();
    }
    if let Some(model) = &cli.model {
        config.provider.model = Some(model.clone());
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.provider.max_tokens = max_tokens;
    }
    if let Some(temperature) = cli.temperature {
        config.provider.temperature = temperature;
    }
    if let Some(confirm) = cli.confirm {
        config.agent.confirmation = ConfirmationMode::from(confirm).as_str().to_string();
    }
    if let Some(dir) = &cli.working_dir {
        config.agent.working_dir = Some(dir.display().to_string());
    }
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        if issue.is_error() {
            eprintln!("{} {}", "error:".red().bold(), issue);
        } else {
            eprintln!("{} {}", "warning:".yellow().bold(), issue);
        }
    }
}

/// Stderr logging from `-v`, plus a daily log file when configured.
///
/// The returned guard flushes the file writer on drop.
fn init_tracing(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match file_writer(config) {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn file_writer(
    config: &FileConfig,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let path = config.logging.log_file()?;
    let dir = path.parent()?;
    let file_name = path.file_name()?;
    if std::fs::create_dir_all(dir).is_err() {
        eprintln!("warning: cannot create log directory {}", dir.display());
        return None;
    }
    let appender = tracing_appender::rolling::daily(dir, file_name);
    Some(tracing_appender::non_blocking(appender))
}

/// Persona from `agent.system_prompt_file`, else `system_prompt.txt` in the
/// working directory, else the built-in one.
fn load_system_prompt(config: &FileConfig, working_dir: &Path) -> Result<SystemPrompt> {
    let explicit = config
        .agent
        .system_prompt_file
        .as_deref()
        .map(severino_infrastructure::config::expand_home);
    let local = working_dir.join(LOCAL_PROMPT_FILE);

    let persona = match explicit {
        Some(path) => Some(
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read system prompt {}", path.display()))?,
        ),
        None if local.is_file() => std::fs::read_to_string(&local).ok(),
        None => None,
    };

    let prompt = match persona.filter(|p| !p.trim().is_empty()) {
        Some(text) => SystemPrompt::new(text),
        None => SystemPrompt::default(),
    };
    Ok(prompt.with_working_dir(working_dir.display().to_string()))
}

fn conversation_logger(config: &FileConfig, session_id: &str) -> Arc<dyn ConversationLogger> {
    let Some(dir) = config.logging.transcript_dir() else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::in_dir(&dir, session_id) {
        Ok(logger) => {
            info!(path = %logger.path().display(), "Writing conversation transcript");
            Arc::new(logger)
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Transcript disabled");
            Arc::new(NoConversationLogger)
        }
    }
}

fn new_session_id() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}
