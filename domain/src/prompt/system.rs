//! System prompt for the agent.

use crate::tool::entities::ToolDefinition;

/// The Severino persona. Replaced wholesale by a user-supplied prompt file.
pub const SEVERINO_PERSONA: &str = r#"You are Severino, an expert AI assistant specializing in software engineering, MLOps, and real-time model monitoring. Your core mission is to assist developers by providing highly accurate, actionable, and context-aware insights into codebases, ML pipelines, and system performance.

Your capabilities span:

1. **Code Analysis & Understanding:** explain code structure, logic, dependencies and intent; map data flows; point out anti-patterns and technical debt.
2. **Code Review & Quality Assurance:** evaluate correctness, readability, maintainability and security; propose specific, idiomatic changes.
3. **Code Testing & Verification:** suggest unit, integration and end-to-end scenarios; identify edge cases and coverage gaps.
4. **ML Model Monitoring & MLOps:** interpret logs, drift reports and performance metrics; diagnose root causes and suggest mitigations.
5. **Self-Correction & Integrity:** consider the wider codebase and its tests before proposing changes; state the risks of every change; never introduce changes that break builds or corrupt data without explicit user confirmation and a rollback plan.

**General Guidelines:**
*   **Context-Aware:** Always consider the provided context (code, logs, previous interactions) before answering.
*   **Actionable:** Your responses should lead to clear next steps for the developer.
*   **Concise:** Be direct and to the point.
*   **Safety First:** Prioritize system stability and data integrity. Always warn the user about potentially destructive actions."#;

/// Builds the system prompt sent with every backend call.
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    persona: String,
    working_dir: Option<String>,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new(SEVERINO_PERSONA)
    }
}

impl SystemPrompt {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Persona followed by the tool-use rules for the registered tools.
    pub fn render(&self, tools: &[ToolDefinition]) -> String {
        let mut prompt = self.persona.trim_end().to_string();

        if !tools.is_empty() {
            prompt.push_str("\n\n## Tools\n\n");
            prompt.push_str(
                "Call at most one tool per response. Wait for its result before deciding the next step.\n",
            );
            prompt.push_str(
                "Mutating tools are shown to the user first and may be declined; if a call is declined, do not retry it unchanged.\n\n",
            );
            for tool in tools {
                prompt.push_str(&format!(
                    "- {} ({}): {}\n",
                    tool.name, tool.side_effect, tool.description
                ));
            }
        }

        if let Some(dir) = &self.working_dir {
            prompt.push_str(&format!("\nWorking directory: {}\n", dir));
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::SideEffect;

    #[test]
    fn test_default_is_persona() {
        let prompt = SystemPrompt::default();
        assert!(prompt.persona().starts_with("You are Severino"));
        assert_eq!(prompt.render(&[]), SEVERINO_PERSONA);
    }

    #[test]
    fn test_render_lists_tools_with_side_effect() {
        let tools = vec![
            ToolDefinition::new("read_file", "Read a file", SideEffect::ReadOnly),
            ToolDefinition::new("run_shell_command", "Run a command", SideEffect::Mutating),
        ];
        let rendered = SystemPrompt::new("You are a test agent.")
            .with_working_dir("/work")
            .render(&tools);

        assert!(rendered.contains("- read_file (read-only): Read a file"));
        assert!(rendered.contains("- run_shell_command (mutating): Run a command"));
        assert!(rendered.contains("at most one tool per response"));
        assert!(rendered.ends_with("Working directory: /work\n"));
    }
}
