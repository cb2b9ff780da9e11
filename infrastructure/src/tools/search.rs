//! Search tools: glob_search, grep_search
//!
//! Both walk the file system synchronously, so the work runs on the
//! blocking pool.

use super::settings::ToolSettings;
use async_trait::async_trait;
use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};
use severino_domain::{
    ParamType, SideEffect, Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Tool name constants
pub const GLOB_SEARCH: &str = "glob_search";
pub const GREP_SEARCH: &str = "grep_search";

/// Maximum number of paths returned by glob_search
const MAX_GLOB_RESULTS: usize = 1000;

/// Default cap on grep matches
const DEFAULT_MAX_MATCHES: usize = 200;

/// Files larger than this are skipped by grep (5 MB)
const MAX_GREP_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Skips dotfiles and dot-directories such as `.git`.
const WALK_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Get the tool definition for glob_search
pub fn glob_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        GLOB_SEARCH,
        "Find files matching a glob pattern (e.g. '**/*.rs').",
        SideEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::required(
        "pattern",
        "Glob pattern, relative to path",
        ParamType::String,
    ))
    .with_parameter(
        ToolParameter::optional("path", "Base directory to search from", ParamType::Path)
            .with_default("."),
    )
}

/// Get the tool definition for grep_search
pub fn grep_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        GREP_SEARCH,
        "Search file contents with a regular expression. Returns 'file:line: text' for each match.",
        SideEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::required(
        "pattern",
        "Regex pattern to search for",
        ParamType::String,
    ))
    .with_parameter(
        ToolParameter::optional("path", "File or directory to search in", ParamType::Path)
            .with_default("."),
    )
    .with_parameter(
        ToolParameter::optional(
            "max_matches",
            "Stop after this many matches",
            ParamType::Integer,
        )
        .with_default(DEFAULT_MAX_MATCHES),
    )
    .with_parameter(
        ToolParameter::optional(
            "case_insensitive",
            "Match without regard to case",
            ParamType::Boolean,
        )
        .with_default(false),
    )
    .with_parameter(ToolParameter::optional(
        "file_pattern",
        "Glob restricting which files are searched (e.g. '**/*.rs')",
        ParamType::String,
    ))
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn glob_paths(base: &Path, pattern: &str) -> Result<glob::Paths, ToolError> {
    let full = format!(
        "{}/{}",
        Pattern::escape(&base.display().to_string()),
        pattern
    );
    glob::glob_with(&full, WALK_OPTIONS)
        .map_err(|e| ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)))
}

async fn run_blocking<T, F>(work: F) -> Result<T, ToolError>
where
    F: FnOnce() -> Result<T, ToolError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ToolError::execution_failed(format!("Search task failed: {}", e)))?
}

pub struct GlobSearchTool {
    definition: ToolDefinition,
    settings: Arc<ToolSettings>,
}

impl GlobSearchTool {
    pub fn new(settings: Arc<ToolSettings>) -> Self {
        Self {
            definition: glob_search_definition(),
            settings,
        }
    }
}

fn glob_search(base: PathBuf, pattern: String) -> Result<ToolResult, ToolError> {
    if !base.is_dir() {
        return Err(ToolError::not_found(base.display()));
    }

    let mut results = Vec::new();
    let mut limited = false;
    for path in glob_paths(&base, &pattern)?.flatten() {
        if results.len() >= MAX_GLOB_RESULTS {
            limited = true;
            break;
        }
        results.push(display_relative(&path, &base));
    }

    let count = results.len();
    let mut output = if results.is_empty() {
        "No files found matching the pattern".to_string()
    } else {
        results.join("\n")
    };
    if limited {
        output.push_str(&format!("\n... (limited to {} results)", MAX_GLOB_RESULTS));
    }

    Ok(ToolResult::success(GLOB_SEARCH, output)
        .with_path(base.display().to_string())
        .with_match_count(count))
}

#[async_trait]
impl Tool for GlobSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let pattern = call
            .require_str("pattern")
            .map_err(ToolError::invalid_argument)?
            .to_string();
        let base = self.settings.resolve(call.get_str("path").unwrap_or("."));

        run_blocking(move || glob_search(base, pattern)).await
    }
}

pub struct GrepSearchTool {
    definition: ToolDefinition,
    settings: Arc<ToolSettings>,
}

impl GrepSearchTool {
    pub fn new(settings: Arc<ToolSettings>) -> Self {
        Self {
            definition: grep_search_definition(),
            settings,
        }
    }
}

struct GrepQuery {
    pattern: String,
    target: PathBuf,
    max_matches: usize,
    case_insensitive: bool,
    file_pattern: Option<String>,
}

/// Files under `dir`, yielded as the walk proceeds.
fn walk_files(
    dir: &Path,
    file_pattern: Option<&str>,
) -> Result<impl Iterator<Item = PathBuf>, ToolError> {
    Ok(glob_paths(dir, file_pattern.unwrap_or("**/*"))?
        .flatten()
        .filter(|p| p.is_file()))
}

/// Match lines until `max_matches` is exceeded. Stops pulling files
/// from `files` as soon as the limit is hit.
fn grep_files(
    regex: &Regex,
    files: impl IntoIterator<Item = PathBuf>,
    base: &Path,
    max_matches: usize,
) -> (Vec<String>, bool) {
    let mut results = Vec::new();
    for file in files {
        let too_large = std::fs::metadata(&file)
            .map(|m| m.len() > MAX_GREP_FILE_SIZE)
            .unwrap_or(true);
        if too_large {
            continue;
        }
        // Binary and non-UTF-8 files are skipped.
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let display = display_relative(&file, base);
        for (line_num, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                if results.len() >= max_matches {
                    return (results, true);
                }
                results.push(format!("{}:{}: {}", display, line_num + 1, line));
            }
        }
    }
    (results, false)
}

fn grep_search(query: GrepQuery) -> Result<ToolResult, ToolError> {
    let regex = RegexBuilder::new(&query.pattern)
        .case_insensitive(query.case_insensitive)
        .build()
        .map_err(|e| ToolError::invalid_argument(format!("Invalid regex pattern: {}", e)))?;

    let (results, limited) = if query.target.is_file() {
        let base = query
            .target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        grep_files(&regex, [query.target.clone()], &base, query.max_matches)
    } else if query.target.is_dir() {
        let files = walk_files(&query.target, query.file_pattern.as_deref())?;
        grep_files(&regex, files, &query.target, query.max_matches)
    } else {
        return Err(ToolError::not_found(query.target.display()));
    };

    let count = results.len();
    let mut output = if results.is_empty() {
        "No matches found".to_string()
    } else {
        results.join("\n")
    };
    if limited {
        output.push_str(&format!("\n... (limited to {} matches)", query.max_matches));
    }

    Ok(ToolResult::success(GREP_SEARCH, output)
        .with_path(query.target.display().to_string())
        .with_match_count(count))
}

#[async_trait]
impl Tool for GrepSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let query = GrepQuery {
            pattern: call
                .require_str("pattern")
                .map_err(ToolError::invalid_argument)?
                .to_string(),
            target: self.settings.resolve(call.get_str("path").unwrap_or(".")),
            max_matches: call.get_usize("max_matches").unwrap_or(DEFAULT_MAX_MATCHES),
            case_insensitive: call.get_bool("case_insensitive").unwrap_or(false),
            file_pattern: call.get_str("file_pattern").map(str::to_string),
        };

        run_blocking(move || grep_search(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use severino_domain::ErrorCode;
    use tempfile::{TempDir, tempdir};

    fn fixture() -> TempDir {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::write(
            dir.path().join("src/main.rs"),
            "fn main() {\n    println!(\"Hello\");\n}\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "pub fn hello() {}\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "# Hello project\n").unwrap();
        std::fs::write(dir.path().join(".git/config"), "hello = true\n").unwrap();
        dir
    }

    fn settings(dir: &TempDir) -> Arc<ToolSettings> {
        Arc::new(ToolSettings::new(dir.path()))
    }

    #[tokio::test]
    async fn test_glob_search_basic() {
        let dir = fixture();
        let tool = GlobSearchTool::new(settings(&dir));
        let result = tool
            .invoke(&ToolCall::new(GLOB_SEARCH).with_arg("pattern", "**/*.rs"))
            .await
            .unwrap();

        let output = result.output().unwrap();
        assert!(output.contains("main.rs"));
        assert!(output.contains("lib.rs"));
        assert!(!output.contains("README"));
        assert_eq!(result.metadata.match_count, Some(2));
    }

    #[tokio::test]
    async fn test_glob_search_no_matches() {
        let dir = fixture();
        let tool = GlobSearchTool::new(settings(&dir));
        let result = tool
            .invoke(&ToolCall::new(GLOB_SEARCH).with_arg("pattern", "*.xyz"))
            .await
            .unwrap();

        assert_eq!(result.output(), Some("No files found matching the pattern"));
    }

    #[tokio::test]
    async fn test_glob_search_invalid_pattern() {
        let dir = fixture();
        let tool = GlobSearchTool::new(settings(&dir));
        let err = tool
            .invoke(&ToolCall::new(GLOB_SEARCH).with_arg("pattern", "[unclosed"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_grep_search_directory_skips_hidden() {
        let dir = fixture();
        let tool = GrepSearchTool::new(settings(&dir));
        let result = tool
            .invoke(&ToolCall::new(GREP_SEARCH).with_arg("pattern", "Hello"))
            .await
            .unwrap();

        let output = result.output().unwrap();
        assert!(output.contains("main.rs:2:"));
        assert!(output.contains("README.md:1:"));
        assert!(!output.contains(".git"));
    }

    #[tokio::test]
    async fn test_grep_search_case_insensitive() {
        let dir = fixture();
        let tool = GrepSearchTool::new(settings(&dir));
        let call = ToolCall::new(GREP_SEARCH)
            .with_arg("pattern", "HELLO")
            .with_arg("path", "src/lib.rs")
            .with_arg("case_insensitive", true);
        let result = tool.invoke(&call).await.unwrap();

        assert_eq!(result.output(), Some("lib.rs:1: pub fn hello() {}"));
    }

    #[tokio::test]
    async fn test_grep_search_max_matches() {
        let dir = fixture();
        let tool = GrepSearchTool::new(settings(&dir));
        let call = ToolCall::new(GREP_SEARCH)
            .with_arg("pattern", "(?i)hello")
            .with_arg("max_matches", 1);
        let result = tool.invoke(&call).await.unwrap();

        assert_eq!(result.metadata.match_count, Some(1));
        assert!(result.output().unwrap().contains("limited to 1 matches"));
    }

    #[test]
    fn test_grep_stops_walking_at_limit() {
        let dir = tempdir().unwrap();
        for i in 0..50 {
            std::fs::write(dir.path().join(format!("f{i:02}.txt")), "needle\nneedle\n").unwrap();
        }
        let regex = Regex::new("needle").unwrap();
        let mut pulled = 0;
        let files = walk_files(dir.path(), None).unwrap().inspect(|_| pulled += 1);

        let (results, limited) = grep_files(&regex, files, dir.path(), 3);

        assert!(limited);
        assert_eq!(results.len(), 3);
        assert_eq!(pulled, 2);
    }

    #[tokio::test]
    async fn test_grep_search_no_matches() {
        let dir = fixture();
        let tool = GrepSearchTool::new(settings(&dir));
        let result = tool
            .invoke(&ToolCall::new(GREP_SEARCH).with_arg("pattern", "nonexistent_xyz"))
            .await
            .unwrap();

        assert_eq!(result.output(), Some("No matches found"));
    }

    #[tokio::test]
    async fn test_grep_search_invalid_regex() {
        let dir = fixture();
        let tool = GrepSearchTool::new(settings(&dir));
        let err = tool
            .invoke(&ToolCall::new(GREP_SEARCH).with_arg("pattern", "[invalid"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }
}
