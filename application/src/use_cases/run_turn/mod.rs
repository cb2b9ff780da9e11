//! Run Turn use case.
//!
//! Drives one user input through the tool-orchestration loop:
//!
//! ```text
//! input → IntentRouter (LLM) ─┬─ FinalAnswer → done
//!                             └─ Proposal → lookup + validate
//!                                             → ConfirmationGate (mutating only)
//!                                             → ToolExecutorPort::execute
//!                                             → result appended → IntentRouter ...
//! ```
//!
//! The session is borrowed mutably for the whole turn. If the turn is
//! aborted, entries appended after the last executed tool are rolled back;
//! tools that already ran stay in history.

mod gate;
mod router;
mod types;

pub use gate::ConfirmationGate;
pub use router::{IntentRouter, RouterOutcome};
pub use types::{TurnError, TurnInput, TurnOutput};

use crate::config::TurnParams;
use crate::ports::confirmation::ConfirmationPort;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, events,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::ports::turn_progress::TurnProgressNotifier;
use crate::use_cases::shared::check_cancelled;
use crate::use_cases::tool_helpers::tool_args_preview;
use serde_json::json;
use severino_domain::{
    Session, SystemPrompt, ToolCall, ToolInvocation, ToolResult, TurnPhase, TurnState,
};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case for running one turn of a session.
pub struct RunTurnUseCase {
    router: IntentRouter,
    tools: Arc<dyn ToolExecutorPort>,
    gate: ConfirmationGate,
    params: TurnParams,
    logger: Arc<dyn ConversationLogger>,
}

impl RunTurnUseCase {
    /// Build the use case. The system prompt and the tool schemas are
    /// rendered once here from the registered tools.
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        schema: &dyn ToolSchemaPort,
        system_prompt: &SystemPrompt,
        params: TurnParams,
    ) -> Self {
        let definitions = tools.definitions();
        let tool_schemas = schema.all_tools_schema(&definitions);
        let owned: Vec<_> = definitions.into_iter().cloned().collect();
        let router = IntentRouter::new(gateway, system_prompt.render(&owned), tool_schemas);

        Self {
            router,
            tools,
            gate: ConfirmationGate::new(params.confirmation),
            params,
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Source of decisions in interactive mode.
    pub fn with_confirmation_port(mut self, port: Arc<dyn ConfirmationPort>) -> Self {
        self.gate = ConfirmationGate::new(self.params.confirmation).with_port(port);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &TurnParams {
        &self.params
    }

    pub fn system_prompt(&self) -> &str {
        self.router.system_prompt()
    }

    /// Run one turn to its final answer.
    ///
    /// On error the session keeps the user input and every invocation up
    /// to the last one that executed. Without executed tools it is restored
    /// to exactly what it was before the call.
    pub async fn execute(
        &self,
        session: &mut Session,
        input: TurnInput,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutput, TurnError> {
        let checkpoint = session.checkpoint();
        let mut state = TurnState::new();

        match self.drive(session, &mut state, &input, progress).await {
            Ok((answer, executed_tools)) => {
                info!(
                    rounds = state.routing_rounds(),
                    tool_calls = state.tool_calls(),
                    executed_tools,
                    "Turn completed"
                );
                Ok(TurnOutput {
                    answer,
                    state,
                    executed_tools,
                })
            }
            Err(err) => {
                if !state.is_finished() {
                    // Aborted is reachable from every live phase.
                    let _ = state.transition(TurnPhase::Aborted);
                }
                let executed: Vec<String> = session
                    .turns_since(checkpoint)
                    .iter()
                    .filter_map(|t| t.as_invocation())
                    .filter(|inv| inv.executed)
                    .map(|inv| inv.call.tool_name.clone())
                    .collect();
                let kept = session.rollback_unexecuted(checkpoint);
                if !executed.is_empty() {
                    warn!(
                        tools = ?executed,
                        kept_turns = kept,
                        "Aborted turn had already executed tools, keeping them in history"
                    );
                }

                warn!(error = %err, "Turn aborted");
                progress.on_turn_error(&err.to_string());
                self.logger.log(ConversationEvent::new(
                    events::TURN_ERROR,
                    json!({ "error": err.to_string(), "cancelled": err.is_cancelled() }),
                ));
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        session: &mut Session,
        state: &mut TurnState,
        input: &TurnInput,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<(String, usize), TurnError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(TurnError::EmptyInput);
        }
        let cancellation = input.cancellation.as_ref();

        session.push_user(text);
        self.logger.log(ConversationEvent::new(
            events::USER_INPUT,
            json!({ "session": session.id(), "text": text }),
        ));

        let mut executed_tools = 0;
        loop {
            check_cancelled(cancellation)?;
            if state.routing_rounds() >= self.params.max_tool_rounds {
                return Err(TurnError::ToolRoundLimit(state.routing_rounds()));
            }

            state.transition(TurnPhase::RoutingIntent)?;
            progress.on_routing(state.routing_rounds());
            let outcome = self.router.route(session.turns(), cancellation).await;
            progress.on_routing_done();

            match outcome? {
                RouterOutcome::FinalAnswer(answer) => {
                    state.transition(TurnPhase::FinalAnswer)?;
                    self.logger.log(ConversationEvent::new(
                        events::LLM_RESPONSE,
                        json!({ "type": "final_answer", "text": answer }),
                    ));
                    session.push_agent(answer.clone());
                    progress.on_final_answer(&answer);
                    return Ok((answer, executed_tools));
                }
                RouterOutcome::Proposal(call) => {
                    state.transition(TurnPhase::ToolProposed)?;
                    info!(
                        tool = %call.tool_name,
                        args = %tool_args_preview(&call),
                        "Tool proposed"
                    );
                    self.logger.log(ConversationEvent::new(
                        events::TOOL_PROPOSAL,
                        json!({
                            "tool": call.tool_name,
                            "arguments": call.arguments_json(),
                            "reasoning": call.reasoning,
                        }),
                    ));
                    progress.on_proposal(&call);

                    let invocation = self
                        .handle_proposal(call, state, cancellation, progress)
                        .await?;
                    if invocation.executed {
                        executed_tools += 1;
                    }

                    self.logger.log(ConversationEvent::new(
                        events::TOOL_RESULT,
                        json!({
                            "tool": invocation.call.tool_name,
                            "executed": invocation.executed,
                            "success": invocation.result.success,
                            "error_code": invocation.result.error_code().map(|c| c.as_str()),
                            "duration_ms": invocation.result.metadata.duration_ms,
                        }),
                    ));
                    progress.on_tool_result(&invocation.result);
                    session.push_invocation(invocation);
                }
            }
        }
    }

    /// Lookup → validate → gate → execute, for exactly one proposal.
    async fn handle_proposal(
        &self,
        call: ToolCall,
        state: &mut TurnState,
        cancellation: Option<&CancellationToken>,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<ToolInvocation, TurnError> {
        let (definition, normalized) = match self.tools.prepare(&call) {
            Ok(prepared) => prepared,
            Err(error) => {
                warn!(
                    tool = %call.tool_name,
                    code = %error.code,
                    "Proposal rejected before execution: {}",
                    error.message
                );
                state.transition(TurnPhase::ResultReady)?;
                let side_effect = self.tools.lookup(&call.tool_name).ok().map(|d| d.side_effect);
                let result = ToolResult::failure(&call.tool_name, error);
                return Ok(ToolInvocation {
                    call,
                    side_effect,
                    decision: None,
                    executed: false,
                    result,
                });
            }
        };

        let mut decision = None;
        if definition.requires_confirmation() {
            state.transition(TurnPhase::ConfirmationPending)?;
            let answer = self.gate.decide(&normalized, definition).await?;
            decision = Some(answer);
            progress.on_decision(&normalized, answer);
            self.logger.log(ConversationEvent::new(
                events::CONFIRMATION,
                json!({
                    "tool": normalized.tool_name,
                    "mode": self.gate.mode().as_str(),
                    "decision": answer.to_string(),
                }),
            ));

            if !answer.is_accept() {
                state.transition(TurnPhase::Rejected)?;
                info!(tool = %normalized.tool_name, "User rejected tool call");
                let result = ToolResult::user_rejected(&normalized.tool_name);
                return Ok(ToolInvocation {
                    call: normalized,
                    side_effect: Some(definition.side_effect),
                    decision,
                    executed: false,
                    result,
                });
            }
            state.transition(TurnPhase::Accepted)?;
        }

        check_cancelled(cancellation)?;
        state.transition(TurnPhase::Executing)?;
        progress.on_tool_start(&normalized);

        let started = Instant::now();
        let mut result = self.tools.execute(&normalized).await;
        if result.metadata.duration_ms.is_none() {
            result.metadata.duration_ms = Some(started.elapsed().as_millis() as u64);
        }
        state.transition(TurnPhase::ResultReady)?;

        debug!(
            tool = %normalized.tool_name,
            success = result.success,
            duration_ms = ?result.metadata.duration_ms,
            "Tool finished"
        );

        Ok(ToolInvocation {
            call: normalized,
            side_effect: Some(definition.side_effect),
            decision,
            executed: true,
            result,
        })
    }
}
