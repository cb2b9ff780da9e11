//! Configuration value objects shared across layers.

mod provider;
pub mod validation;

pub use provider::ProviderKind;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
