//! Tool domain value objects: invocation results and errors.
//!
//! Every proposal that is looked up ends as a [`ToolResult`], including
//! the ones that never reach a tool (unknown name, bad arguments, a
//! rejected confirmation). The [`ErrorCode`] tells them apart.

use serde::{Deserialize, Serialize};

/// Machine-readable failure class of a [`ToolResult`].
///
/// | Code | Raised by | Reached the tool? |
/// |------|-----------|:---:|
/// | `NOT_FOUND` | registry lookup | no |
/// | `INVALID_ARGUMENT` | schema validation | no |
/// | `USER_REJECTED` | confirmation gate | no |
/// | `EXECUTION_FAILED` | the tool itself | yes |
/// | `PERMISSION_DENIED` | the tool itself | yes |
/// | `TIMEOUT` | the tool itself | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    InvalidArgument,
    UserRejected,
    ExecutionFailed,
    PermissionDenied,
    Timeout,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::UserRejected => "USER_REJECTED",
            ErrorCode::ExecutionFailed => "EXECUTION_FAILED",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::Timeout => "TIMEOUT",
        }
    }

    /// The model can fix these by issuing a corrected proposal.
    pub fn is_correctable(&self) -> bool {
        matches!(self, ErrorCode::NotFound | ErrorCode::InvalidArgument)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error detail attached to a failed [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Unknown tool: {}", name))
    }

    pub fn not_found(resource: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("Resource not found: {}", resource),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn user_rejected(tool_name: &str) -> Self {
        Self::new(
            ErrorCode::UserRejected,
            format!("User declined to run '{}'", tool_name),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExecutionFailed, message)
    }

    pub fn permission_denied(resource: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::PermissionDenied,
            format!("Permission denied: {}", resource),
        )
    }

    pub fn timeout(operation: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::Timeout,
            format!("Operation timed out: {}", operation),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Outcome of one proposal, appended to the session as a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured execution data, filled in per tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// The outcome of a declined confirmation. Not an error in the
    /// turn sense, but reported to the model as an unsuccessful call.
    pub fn user_rejected(tool_name: &str) -> Self {
        Self::failure(tool_name, ToolError::user_rejected(tool_name))
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.metadata.bytes = Some(bytes);
        self
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.metadata.exit_code = Some(exit_code);
        self
    }

    pub fn with_match_count(mut self, count: usize) -> Self {
        self.metadata.match_count = Some(count);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }

    pub fn is_user_rejected(&self) -> bool {
        self.error_code() == Some(ErrorCode::UserRejected)
    }

    /// Text fed back to the model for this result.
    pub fn to_model_text(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) if self.success => output.clone(),
            (_, Some(error)) => format!("Error: {}", error),
            _ => String::from("(no output)"),
        }
    }
}
