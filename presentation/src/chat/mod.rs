//! Interactive chat module
//!
//! A reedline-based session that keeps one conversation across turns.

mod repl;

pub use repl::{ChatRepl, ReplAction};
