//! Session domain entities

use crate::tool::entities::{SideEffect, ToolCall};
use crate::tool::value_objects::ToolResult;
use crate::turn::decision::Decision;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Role of a turn when rendered into a chat transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// One tool proposal and what became of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// The proposal, with normalized arguments when it passed validation
    pub call: ToolCall,
    /// `None` when the tool name was not registered
    pub side_effect: Option<SideEffect>,
    /// Recorded gate decision; `None` for read-only and rejected-before-gate calls
    pub decision: Option<Decision>,
    /// Whether the tool was actually invoked
    pub executed: bool,
    pub result: ToolResult,
}

/// An entry in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    User { content: String },
    Agent { content: String },
    ToolInvocation(ToolInvocation),
}

impl Turn {
    pub fn role(&self) -> Role {
        match self {
            Turn::User { .. } => Role::User,
            Turn::Agent { .. } => Role::Assistant,
            Turn::ToolInvocation(_) => Role::Tool,
        }
    }

    pub fn as_invocation(&self) -> Option<&ToolInvocation> {
        match self {
            Turn::ToolInvocation(inv) => Some(inv),
            _ => None,
        }
    }
}

/// Position in the history to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Conversation history of one interactive run.
///
/// Created when the run starts and dropped when it ends. The turn use
/// case holds it as `&mut Session`, so only one turn can touch it at a
/// time.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    started_at: u64,
    turns: Vec<Turn>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: current_timestamp(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Milliseconds since the Unix epoch.
    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::User {
            content: content.into(),
        });
    }

    pub fn push_agent(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::Agent {
            content: content.into(),
        });
    }

    pub fn push_invocation(&mut self, invocation: ToolInvocation) {
        self.turns.push(Turn::ToolInvocation(invocation));
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.turns.len())
    }

    /// Turns appended after `checkpoint`.
    pub fn turns_since(&self, checkpoint: Checkpoint) -> &[Turn] {
        &self.turns[checkpoint.0.min(self.turns.len())..]
    }

    /// Drop every turn appended after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.turns.truncate(checkpoint.0);
    }

    /// Roll back an aborted turn without forgetting side effects.
    ///
    /// Keeps everything up to the last invocation after `checkpoint` that
    /// actually ran, and drops the rest. With nothing executed this is
    /// [`Session::rollback`]. Returns the number of turns kept past the
    /// checkpoint.
    pub fn rollback_unexecuted(&mut self, checkpoint: Checkpoint) -> usize {
        let start = checkpoint.0.min(self.turns.len());
        let kept = self.turns[start..]
            .iter()
            .rposition(|t| t.as_invocation().is_some_and(|inv| inv.executed))
            .map_or(0, |last| last + 1);
        self.turns.truncate(start + kept);
        kept
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.turns.iter().filter_map(Turn::as_invocation)
    }

    pub fn last_agent_message(&self) -> Option<&str> {
        self.turns.iter().rev().find_map(|t| match t {
            Turn::Agent { content } => Some(content.as_str()),
            _ => None,
        })
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
