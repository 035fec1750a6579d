//! Session memory aggregate and the read-only snapshot handed to tools.

use serde::{Deserialize, Serialize};
use spotter_core::types::WorkoutPlan;

use crate::episodic::EpisodicMemory;
use crate::working::WorkingMemory;

/// Where the dialogue stands between turns, derived from working memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    Idle,
    AwaitingClarification,
}

/// All memory owned by one conversation.
///
/// Created on session start, mutated every turn by the orchestrator only,
/// persisted through a [`crate::store::SessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMemory {
    pub working: WorkingMemory,
    pub episodic: EpisodicMemory,
}

impl SessionMemory {
    pub fn new(max_episodic_turns: usize) -> Self {
        Self {
            working: WorkingMemory::default(),
            episodic: EpisodicMemory::new(max_episodic_turns),
        }
    }

    pub fn phase(&self) -> DialoguePhase {
        if self.working.pending_clarification.is_some() {
            DialoguePhase::AwaitingClarification
        } else {
            DialoguePhase::Idle
        }
    }

    /// Append a completed exchange to episodic memory.
    pub fn record_turn(&mut self, user_input: &str, agent_response: &str) {
        self.episodic.record(user_input, agent_response);
    }

    /// An owned, immutable copy handed to tools at dispatch time.
    ///
    /// Tools read the conversation state through this copy; nothing they do
    /// can reach the live memory.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            working: self.working.clone(),
            episodic: self.episodic.clone(),
        }
    }
}

/// Deep-copied view of session memory at dispatch time. Read-only.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    working: WorkingMemory,
    episodic: EpisodicMemory,
}

impl MemorySnapshot {
    pub fn working(&self) -> &WorkingMemory {
        &self.working
    }

    pub fn episodic(&self) -> &EpisodicMemory {
        &self.episodic
    }

    pub fn current_plan(&self) -> Option<&WorkoutPlan> {
        self.working.current_plan.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_core::types::{ClarificationContext, Exercise};
    use uuid::Uuid;

    #[test]
    fn test_phase_follows_pending_clarification() {
        let mut mem = SessionMemory::new(10);
        assert_eq!(mem.phase(), DialoguePhase::Idle);

        mem.working.set_pending(ClarificationContext {
            origin: "modify_workout".to_string(),
            question: "Which way?".to_string(),
            options: vec![],
            plan_id: None,
        });
        assert_eq!(mem.phase(), DialoguePhase::AwaitingClarification);

        mem.working.clear_pending();
        assert_eq!(mem.phase(), DialoguePhase::Idle);
    }

    #[test]
    fn test_record_turn_appends() {
        let mut mem = SessionMemory::new(10);
        mem.record_turn("hi", "hello!");
        assert_eq!(mem.episodic.len(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_live_memory() {
        let mut mem = SessionMemory::new(10);
        mem.working.current_plan = Some(WorkoutPlan {
            id: Uuid::new_v4(),
            name: "Leg day".to_string(),
            category: None,
            duration_minutes: None,
            level: None,
            exercises: vec![Exercise::new("Squat", 3, 10)],
        });

        let snapshot = mem.snapshot();

        // Mutate live memory after taking the snapshot.
        mem.working.current_plan.as_mut().unwrap().exercises[0].sets = 99;
        mem.record_turn("hi", "hello!");

        assert_eq!(snapshot.current_plan().unwrap().exercises[0].sets, 3);
        assert!(snapshot.episodic().is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut mem = SessionMemory::new(5);
        mem.record_turn("hi", "hello!");
        let json = serde_json::to_string(&mem).unwrap();
        let rt: SessionMemory = serde_json::from_str(&json).unwrap();
        assert_eq!(mem, rt);
    }
}
