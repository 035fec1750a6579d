//! Working memory: mutable, task-relevant facts for the current
//! point in the conversation.

use serde::{Deserialize, Serialize};
use spotter_core::types::{ActionRecord, ClarificationContext, Intent, WorkoutPlan};

/// Current task state of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingMemory {
    /// The workout plan currently being built or edited, if any.
    pub current_plan: Option<WorkoutPlan>,
    /// Audit record of the most recent tool dispatch.
    pub last_action: Option<ActionRecord>,
    /// The intent resolved for the most recent turn.
    pub resolved_intent: Option<Intent>,
    /// An open question awaiting the user's answer.
    pub pending_clarification: Option<ClarificationContext>,
}

impl WorkingMemory {
    pub fn set_pending(&mut self, ctx: ClarificationContext) {
        self.pending_clarification = Some(ctx);
    }

    pub fn clear_pending(&mut self) {
        self.pending_clarification = None;
    }

    /// Whether the open clarification, if any, was raised by `origin`.
    pub fn pending_is_for(&self, origin: &str) -> bool {
        self.pending_clarification
            .as_ref()
            .is_some_and(|c| c.origin == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_core::types::ClarificationOption;

    fn pending() -> ClarificationContext {
        ClarificationContext {
            origin: "modify_workout".to_string(),
            question: "How would you like me to scale the workout?".to_string(),
            options: vec![ClarificationOption::new("Double the sets", "sets", vec![])],
            plan_id: None,
        }
    }

    #[test]
    fn test_default_is_empty() {
        let mem = WorkingMemory::default();
        assert!(mem.current_plan.is_none());
        assert!(mem.last_action.is_none());
        assert!(mem.resolved_intent.is_none());
        assert!(mem.pending_clarification.is_none());
    }

    #[test]
    fn test_set_and_clear_pending() {
        let mut mem = WorkingMemory::default();
        mem.set_pending(pending());
        assert!(mem.pending_clarification.is_some());
        mem.clear_pending();
        assert!(mem.pending_clarification.is_none());
    }

    #[test]
    fn test_pending_is_for() {
        let mut mem = WorkingMemory::default();
        assert!(!mem.pending_is_for("modify_workout"));
        mem.set_pending(pending());
        assert!(mem.pending_is_for("modify_workout"));
        assert!(!mem.pending_is_for("greeting"));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut mem = WorkingMemory::default();
        mem.set_pending(pending());
        let json = serde_json::to_string(&mem).unwrap();
        let rt: WorkingMemory = serde_json::from_str(&json).unwrap();
        assert_eq!(mem, rt);
    }
}
