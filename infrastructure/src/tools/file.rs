//! File operation tools: read_file, write_file, list_directory

use super::settings::ToolSettings;
use async_trait::async_trait;
use severino_domain::{
    ParamType, SideEffect, Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const LIST_DIRECTORY: &str = "list_directory";

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a text file. Use offset/limit to page through large files.",
        SideEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::required(
        "path",
        "Path to the file to read",
        ParamType::Path,
    ))
    .with_parameter(
        ToolParameter::optional(
            "offset",
            "Line number to start reading from (0-indexed)",
            ParamType::Integer,
        )
        .with_default(0),
    )
    .with_parameter(ToolParameter::optional(
        "limit",
        "Maximum number of lines to read",
        ParamType::Integer,
    ))
}

/// Get the tool definition for write_file
pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file. Creates the file if it doesn't exist, or overwrites it if it does.",
        SideEffect::Mutating,
    )
    .with_parameter(ToolParameter::required(
        "path",
        "Path to the file to write",
        ParamType::Path,
    ))
    .with_parameter(ToolParameter::required(
        "content",
        "Content to write to the file",
        ParamType::String,
    ))
    .with_parameter(
        ToolParameter::optional(
            "create_dirs",
            "Create parent directories if they don't exist",
            ParamType::Boolean,
        )
        .with_default(false),
    )
}

/// Get the tool definition for list_directory
pub fn list_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_DIRECTORY,
        "List the entries of a directory. Directories are suffixed with '/'.",
        SideEffect::ReadOnly,
    )
    .with_parameter(
        ToolParameter::optional("path", "Directory to list", ParamType::Path).with_default("."),
    )
    .with_parameter(
        ToolParameter::optional(
            "show_hidden",
            "Include entries whose name starts with '.'",
            ParamType::Boolean,
        )
        .with_default(false),
    )
}

/// Map an I/O error on `path` onto the tool error taxonomy.
pub(crate) fn io_error(err: std::io::Error, path: &Path) -> ToolError {
    match err.kind() {
        ErrorKind::NotFound => ToolError::not_found(path.display()),
        ErrorKind::PermissionDenied => ToolError::permission_denied(path.display()),
        _ => ToolError::execution_failed(format!("{}: {}", path.display(), err)),
    }
}

fn slice_lines(content: &str, offset: usize, limit: Option<usize>) -> String {
    if offset == 0 && limit.is_none() {
        return content.to_string();
    }
    let lines = content.lines().skip(offset);
    match limit {
        Some(limit) => lines.take(limit).collect::<Vec<_>>().join("\n"),
        None => lines.collect::<Vec<_>>().join("\n"),
    }
}

pub struct ReadFileTool {
    definition: ToolDefinition,
    settings: Arc<ToolSettings>,
}

impl ReadFileTool {
    pub fn new(settings: Arc<ToolSettings>) -> Self {
        Self {
            definition: read_file_definition(),
            settings,
        }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let raw = call.require_str("path").map_err(ToolError::invalid_argument)?;
        let path = self.settings.resolve(raw);

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| io_error(e, &path))?;
        if !metadata.is_file() {
            return Err(ToolError::invalid_argument(format!(
                "'{}' is not a file",
                path.display()
            )));
        }
        if metadata.len() > self.settings.max_read_bytes {
            return Err(ToolError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                self.settings.max_read_bytes
            )));
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(e, &path))?;

        let offset = call.get_usize("offset").unwrap_or(0);
        let output = slice_lines(&content, offset, call.get_usize("limit"));
        let bytes = output.len();

        Ok(ToolResult::success(READ_FILE, output)
            .with_path(path.display().to_string())
            .with_bytes(bytes))
    }
}

pub struct WriteFileTool {
    definition: ToolDefinition,
    settings: Arc<ToolSettings>,
}

impl WriteFileTool {
    pub fn new(settings: Arc<ToolSettings>) -> Self {
        Self {
            definition: write_file_definition(),
            settings,
        }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let raw = call.require_str("path").map_err(ToolError::invalid_argument)?;
        let content = call
            .require_str("content")
            .map_err(ToolError::invalid_argument)?;
        let create_dirs = call.get_bool("create_dirs").unwrap_or(false);
        let path = self.settings.resolve(raw);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            if create_dirs {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_error(e, parent))?;
            } else {
                return Err(ToolError::not_found(parent.display()).with_details(
                    "parent directory does not exist; set create_dirs to true to create it",
                ));
            }
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| io_error(e, &path))?;

        let bytes = content.len();
        Ok(
            ToolResult::success(
                WRITE_FILE,
                format!("Successfully wrote {} bytes to {}", bytes, path.display()),
            )
            .with_path(path.display().to_string())
            .with_bytes(bytes),
        )
    }
}

pub struct ListDirectoryTool {
    definition: ToolDefinition,
    settings: Arc<ToolSettings>,
}

impl ListDirectoryTool {
    pub fn new(settings: Arc<ToolSettings>) -> Self {
        Self {
            definition: list_directory_definition(),
            settings,
        }
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let path = self.settings.resolve(call.get_str("path").unwrap_or("."));
        let show_hidden = call.get_bool("show_hidden").unwrap_or(false);

        let mut reader = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| io_error(e, &path))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| io_error(e, &path))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !show_hidden && name.starts_with('.') {
                continue;
            }
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            entries.push(if is_dir { format!("{}/", name) } else { name });
        }
        entries.sort();

        let count = entries.len();
        let output = if entries.is_empty() {
            "(empty directory)".to_string()
        } else {
            entries.join("\n")
        };

        Ok(ToolResult::success(LIST_DIRECTORY, output)
            .with_path(path.display().to_string())
            .with_match_count(count))
    }
}
