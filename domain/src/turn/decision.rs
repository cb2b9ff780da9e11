//! Confirmation decisions and where they come from.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A user's answer at the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Accept => f.write_str("accept"),
            Decision::Reject => f.write_str("reject"),
        }
    }
}

/// Source of decisions for mutating tool calls.
///
/// Every mode still routes the call through the gate exactly once and
/// records the decision; only who decides differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmationMode {
    /// Ask the user at the terminal
    #[default]
    Interactive,
    /// Decline every mutating call (dry runs, unattended use)
    AutoReject,
    /// Accept every mutating call
    AutoApprove,
}

impl ConfirmationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationMode::Interactive => "interactive",
            ConfirmationMode::AutoReject => "auto-reject",
            ConfirmationMode::AutoApprove => "auto-approve",
        }
    }
}

impl std::fmt::Display for ConfirmationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfirmationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "interactive" | "ask" => Ok(ConfirmationMode::Interactive),
            "auto-reject" | "reject" | "dry-run" => Ok(ConfirmationMode::AutoReject),
            "auto-approve" | "approve" | "yes" => Ok(ConfirmationMode::AutoApprove),
            _ => Err(DomainError::InvalidConfirmationMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation_mode() {
        assert_eq!(
            "auto_reject".parse::<ConfirmationMode>().unwrap(),
            ConfirmationMode::AutoReject
        );
        assert_eq!(
            "Auto-Approve".parse::<ConfirmationMode>().unwrap(),
            ConfirmationMode::AutoApprove
        );
        assert!("sometimes".parse::<ConfirmationMode>().is_err());
    }

    #[test]
    fn test_mode_round_trips_through_display() {
        for mode in [
            ConfirmationMode::Interactive,
            ConfirmationMode::AutoReject,
            ConfirmationMode::AutoApprove,
        ] {
            assert_eq!(mode.to_string().parse::<ConfirmationMode>().unwrap(), mode);
        }
    }
}
