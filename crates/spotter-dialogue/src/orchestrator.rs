//! Turn orchestrator: the per-message control loop.
//!
//! Sequences resolution, clarification, and dispatch for one utterance and
//! renders the outgoing reply. One `process_turn` call per inbound message;
//! the caller must not interleave turns for the same session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use spotter_core::config::DialogueConfig;
use spotter_core::error::SpotterError;
use spotter_core::types::{Intent, IntentKind, SessionId};
use spotter_memory::session::SessionMemory;
use spotter_memory::store::SessionStore;

use crate::clarify::prepare_modification;
use crate::error::DialogueError;
use crate::resolver::IntentResolver;
use crate::response::ResponseRenderer;
use crate::tool::{DispatchOutcome, Dispatcher, ScaleTarget, ToolParams, ToolRegistry};

/// Doubling is the only modification the clarification protocol offers.
const MODIFY_FACTOR: f32 = 2.0;

/// Central coordinator wiring resolver, clarification, dispatcher, and
/// session memory.
pub struct DialogueManager {
    resolver: IntentResolver,
    dispatcher: Dispatcher,
    renderer: ResponseRenderer,
    store: Arc<dyn SessionStore>,
    sessions: Mutex<HashMap<SessionId, SessionMemory>>,
    config: DialogueConfig,
}

impl DialogueManager {
    /// Create a manager with an explicit tool registry.
    pub fn new(store: Arc<dyn SessionStore>, registry: ToolRegistry, config: DialogueConfig) -> Self {
        let timeout = Duration::from_secs(config.tool_timeout_seconds);
        Self {
            resolver: IntentResolver::new(),
            dispatcher: Dispatcher::new(registry, timeout),
            renderer: ResponseRenderer::new(),
            store,
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Create a manager with the built-in tools registered.
    pub fn with_default_tools(store: Arc<dyn SessionStore>, config: DialogueConfig) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register_defaults();
        Self::new(store, registry, config)
    }

    /// Process one inbound message and return the rendered reply.
    ///
    /// Every branch appends exactly one turn to episodic memory and
    /// persists the session afterwards; a failed save is logged, not fatal.
    pub async fn process_turn(
        &self,
        session_id: &SessionId,
        utterance: &str,
    ) -> Result<String, DialogueError> {
        if utterance.trim().is_empty() {
            return Err(DialogueError::EmptyUtterance);
        }
        if utterance.chars().count() > self.config.max_utterance_chars {
            return Err(DialogueError::UtteranceTooLong(self.config.max_utterance_chars));
        }

        let mut memory = self.checkout(session_id)?;

        let intent = self.resolver.resolve(utterance, &memory.working);
        tracing::debug!(
            session = %session_id,
            intent = %intent.kind,
            confidence = intent.confidence,
            "Intent resolved"
        );
        memory.working.resolved_intent = Some(intent.clone());

        let reply = self.handle_intent(&intent, &mut memory).await;

        memory.record_turn(utterance, &reply);
        if let Err(e) = self.store.save(session_id, &memory) {
            tracing::warn!(session = %session_id, error = %e, "Failed to persist session");
        }
        self.check_in(session_id, memory)?;
        Ok(reply)
    }

    /// Persist and drop a session from the in-process cache.
    pub fn end_session(&self, session_id: &SessionId) -> Result<(), DialogueError> {
        let memory = self.lock_sessions()?.remove(session_id);
        if let Some(memory) = memory {
            self.store.save(session_id, &memory)?;
        }
        Ok(())
    }

    /// Number of sessions currently held in the cache.
    pub fn session_count(&self) -> usize {
        self.lock_sessions().map(|s| s.len()).unwrap_or(0)
    }

    /// Read a session's memory, from the cache or the store.
    pub fn memory_of(&self, session_id: &SessionId) -> Option<SessionMemory> {
        if let Ok(sessions) = self.lock_sessions() {
            if let Some(memory) = sessions.get(session_id) {
                return Some(memory.clone());
            }
        }
        self.store.load(session_id).ok().flatten()
    }

    // -- Intent handling --

    async fn handle_intent(&self, intent: &Intent, memory: &mut SessionMemory) -> String {
        match &intent.kind {
            IntentKind::ClarificationAnswer {
                choice, plan_id, ..
            } => self.handle_answer(choice, *plan_id, memory).await,

            IntentKind::ModifyWorkout => {
                self.discard_foreign_pending(intent, memory);
                match prepare_modification(intent.kind.name(), memory.working.current_plan.as_ref())
                {
                    Ok(ctx) => {
                        let reply = self.renderer.clarification(&ctx);
                        memory.working.set_pending(ctx);
                        reply
                    }
                    Err(e) => {
                        memory.working.clear_pending();
                        tracing::debug!(error = %e, "Modification rejected");
                        self.renderer.nothing_to_modify()
                    }
                }
            }

            IntentKind::NothingToModify => {
                memory.working.clear_pending();
                self.renderer.nothing_to_modify()
            }

            IntentKind::Greeting
            | IntentKind::Farewell
            | IntentKind::Thanks
            | IntentKind::HelpRequest => {
                self.discard_foreign_pending(intent, memory);
                self.renderer.conversational(&intent.kind)
            }

            IntentKind::LookupExercise { subject } => {
                self.discard_foreign_pending(intent, memory);
                match subject {
                    Some(subject) => {
                        let params = ToolParams::ExerciseLookup {
                            subject: subject.clone(),
                        };
                        let outcome = self
                            .dispatcher
                            .invoke(params.tool_name(), &params, memory)
                            .await;
                        self.apply_outcome(outcome, memory)
                    }
                    None => self.renderer.lookup_follow_up(),
                }
            }

            IntentKind::CreateWorkout {
                category,
                duration_minutes,
                level,
            } => {
                self.discard_foreign_pending(intent, memory);
                let params = ToolParams::CreateWorkout {
                    category: category.clone(),
                    duration_minutes: *duration_minutes,
                    level: *level,
                };
                let outcome = self
                    .dispatcher
                    .invoke(params.tool_name(), &params, memory)
                    .await;
                self.apply_outcome(outcome, memory)
            }

            IntentKind::ClarificationMismatch { .. } => {
                // Re-prompt with the original question; dispatcher and
                // pending state stay untouched.
                match &memory.working.pending_clarification {
                    Some(ctx) => self.renderer.mismatch(ctx),
                    None => self.renderer.unknown(),
                }
            }

            IntentKind::Unknown { .. } => match &memory.working.pending_clarification {
                Some(ctx) => self.renderer.clarification(ctx),
                None => self.renderer.unknown(),
            },
        }
    }

    /// Dispatch the scaling tool for an answered clarification.
    ///
    /// The pending question is consumed in every outcome. A stale plan
    /// reference is recoverable: pending is cleared and the user is asked
    /// to restate.
    async fn handle_answer(
        &self,
        choice: &str,
        plan_id: Option<uuid::Uuid>,
        memory: &mut SessionMemory,
    ) -> String {
        memory.working.clear_pending();

        let live_id = memory.working.current_plan.as_ref().map(|p| p.id);
        let (Some(plan_id), Some(live_id)) = (plan_id, live_id) else {
            return self.renderer.stale_clarification();
        };
        if plan_id != live_id {
            return self.renderer.stale_clarification();
        }

        let Ok(target) = choice.parse::<ScaleTarget>() else {
            tracing::warn!(choice, "Unrecognized clarification choice");
            return self.renderer.stale_clarification();
        };

        let params = ToolParams::ScaleWorkout {
            plan_id,
            factor: MODIFY_FACTOR,
            target,
        };
        let outcome = self
            .dispatcher
            .invoke(params.tool_name(), &params, memory)
            .await;
        self.apply_outcome(outcome, memory)
    }

    /// Commit a dispatch outcome into working memory and pick the reply.
    /// The error text, when present, takes priority over the message.
    fn apply_outcome(&self, outcome: DispatchOutcome, memory: &mut SessionMemory) -> String {
        let reply = if outcome.result.success {
            if let Some(plan) = outcome.result.updated_plan {
                memory.working.current_plan = Some(plan);
            }
            outcome.result.message
        } else {
            outcome.result.error.unwrap_or(outcome.result.message)
        };
        memory.working.last_action = Some(outcome.record);
        reply
    }

    /// A new primary intent supersedes a clarification raised by a
    /// different intent; the open question is dropped without comment.
    fn discard_foreign_pending(&self, intent: &Intent, memory: &mut SessionMemory) {
        if memory.working.pending_clarification.is_some()
            && !memory.working.pending_is_for(intent.kind.name())
        {
            tracing::debug!(intent = %intent.kind, "Abandoning pending clarification");
            memory.working.clear_pending();
        }
    }

    // -- Session cache --

    fn checkout(&self, session_id: &SessionId) -> Result<SessionMemory, DialogueError> {
        if let Some(memory) = self.lock_sessions()?.remove(session_id) {
            return Ok(memory);
        }
        match self.store.load(session_id) {
            Ok(Some(memory)) => Ok(memory),
            Ok(None) => Ok(SessionMemory::new(self.config.max_episodic_turns)),
            Err(e) => {
                tracing::warn!(session = %session_id, error = %e, "Failed to load session; starting fresh");
                Ok(SessionMemory::new(self.config.max_episodic_turns))
            }
        }
    }

    fn check_in(&self, session_id: &SessionId, memory: SessionMemory) -> Result<(), DialogueError> {
        self.lock_sessions()?.insert(session_id.clone(), memory);
        Ok(())
    }

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, SessionMemory>>, DialogueError> {
        self.sessions.lock().map_err(|e| {
            DialogueError::Storage(SpotterError::Storage(format!("session lock poisoned: {}", e)))
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
