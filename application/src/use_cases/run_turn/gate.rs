//! Confirmation gate for mutating tool calls.

use super::types::TurnError;
use crate::ports::confirmation::{
    AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationError, ConfirmationPort,
};
use crate::use_cases::tool_helpers::tool_args_preview;
use severino_domain::{ConfirmationMode, Decision, ToolCall, ToolDefinition};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Obtains exactly one decision per mutating proposal.
///
/// The decision source depends on [`ConfirmationMode`]:
/// - `Interactive` → the port given to [`ConfirmationGate::with_port`]
/// - `AutoApprove` → [`AutoApproveConfirmation`]
/// - `AutoReject` → [`AutoRejectConfirmation`]
pub struct ConfirmationGate {
    mode: ConfirmationMode,
    port: Option<Arc<dyn ConfirmationPort>>,
}

impl ConfirmationGate {
    pub fn new(mode: ConfirmationMode) -> Self {
        let port: Option<Arc<dyn ConfirmationPort>> = match mode {
            ConfirmationMode::AutoReject => Some(Arc::new(AutoRejectConfirmation)),
            ConfirmationMode::AutoApprove => Some(Arc::new(AutoApproveConfirmation)),
            ConfirmationMode::Interactive => None,
        };
        Self { mode, port }
    }

    /// Install the interactive decision source. Auto modes keep theirs.
    pub fn with_port(mut self, port: Arc<dyn ConfirmationPort>) -> Self {
        if self.mode == ConfirmationMode::Interactive {
            self.port = Some(port);
        } else {
            debug!(mode = %self.mode, "Ignoring confirmation port in auto mode");
        }
        self
    }

    pub fn mode(&self) -> ConfirmationMode {
        self.mode
    }

    pub async fn decide(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<Decision, TurnError> {
        let Some(port) = &self.port else {
            warn!("No confirmation handler configured, rejecting");
            return Ok(Decision::Reject);
        };

        match self.mode {
            ConfirmationMode::AutoReject => info!(
                tool = %call.tool_name,
                args = %tool_args_preview(call),
                "Mutating call auto-rejected"
            ),
            ConfirmationMode::AutoApprove => warn!(
                tool = %call.tool_name,
                args = %tool_args_preview(call),
                "Mutating call auto-approved - use with caution!"
            ),
            ConfirmationMode::Interactive => {}
        }

        port.confirm(call, definition).await.map_err(|e| match e {
            ConfirmationError::Cancelled => TurnError::Cancelled,
            other => TurnError::Confirmation(other),
        })
    }
}
