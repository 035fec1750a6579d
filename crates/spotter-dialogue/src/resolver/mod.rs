//! Staged intent resolution.
//!
//! Three stages run in order and the first to commit wins: answer-to-pending-
//! clarification, the primary keyword/regex cascade, then reconciliation
//! against pending state. Resolution is a pure function of the utterance and
//! working memory: no randomness, no clock, no external calls.

pub mod patterns;

use spotter_core::types::{ClarificationContext, ClarificationOption, Intent, IntentKind};
use spotter_memory::working::WorkingMemory;

const CONFIDENCE_ANSWER: f32 = 0.95;
const CONFIDENCE_CONVERSATIONAL: f32 = 0.9;
const CONFIDENCE_MODIFY: f32 = 0.9;
const CONFIDENCE_LOOKUP: f32 = 0.85;
const CONFIDENCE_CREATE: f32 = 0.85;
const CONFIDENCE_MISMATCH: f32 = 0.7;
const CONFIDENCE_UNKNOWN: f32 = 0.5;

#[derive(Default)]
pub struct IntentResolver;

impl IntentResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an utterance into exactly one intent. Never returns nothing:
    /// `Unknown` is the universal fallback.
    pub fn resolve(&self, utterance: &str, memory: &WorkingMemory) -> Intent {
        // Stage 1: answer to an open clarification.
        if let Some(ctx) = &memory.pending_clarification {
            if let Some(intent) = clarification_answer(utterance, ctx) {
                return intent;
            }
        }

        // Stage 2: primary keyword/regex cascade. A hit here takes
        // precedence over any pending clarification, which the orchestrator
        // then abandons.
        if let Some(intent) = primary(utterance, memory) {
            return intent;
        }

        // Stage 3: reconciliation.
        if let Some(ctx) = &memory.pending_clarification {
            return Intent::new(
                IntentKind::ClarificationMismatch {
                    question: ctx.question.clone(),
                },
                CONFIDENCE_MISMATCH,
            );
        }
        Intent::new(
            IntentKind::Unknown {
                raw: utterance.to_string(),
            },
            CONFIDENCE_UNKNOWN,
        )
    }
}

/// Match the utterance against an open clarification's options.
///
/// Match rules, in order: exact or substring term match against each
/// option's value, label, and synonyms; then ordinal match on the option's
/// 1-based position ("2" or "2.").
fn clarification_answer(utterance: &str, ctx: &ClarificationContext) -> Option<Intent> {
    let normalized = utterance.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    for option in &ctx.options {
        let mut terms: Vec<String> = vec![option.value.to_lowercase(), option.label.to_lowercase()];
        terms.extend(option.synonyms.iter().map(|s| s.to_lowercase()));
        if terms
            .iter()
            .any(|t| !t.is_empty() && (normalized == *t || normalized.contains(t.as_str())))
        {
            return Some(answer(option, ctx));
        }
    }

    let digits = normalized.strip_suffix('.').unwrap_or(&normalized);
    if let Ok(position) = digits.parse::<usize>() {
        if (1..=ctx.options.len()).contains(&position) {
            return Some(answer(&ctx.options[position - 1], ctx));
        }
    }

    None
}

fn answer(option: &ClarificationOption, ctx: &ClarificationContext) -> Intent {
    Intent::new(
        IntentKind::ClarificationAnswer {
            choice: option.value.clone(),
            origin: ctx.origin.clone(),
            plan_id: ctx.plan_id,
        },
        CONFIDENCE_ANSWER,
    )
}

/// The fixed, ordered primary cascade. Short-circuiting: the first matcher
/// that fires wins, with the bespoke modification phrase evaluated last.
fn primary(utterance: &str, memory: &WorkingMemory) -> Option<Intent> {
    if let Some(kind) = patterns::conversational(utterance) {
        return Some(Intent::new(kind, CONFIDENCE_CONVERSATIONAL));
    }
    if let Some(subject) = patterns::lookup(utterance) {
        return Some(Intent::new(
            IntentKind::LookupExercise { subject },
            CONFIDENCE_LOOKUP,
        ));
    }
    if let Some((category, duration_minutes, level)) = patterns::creation(utterance) {
        return Some(Intent::new(
            IntentKind::CreateWorkout {
                category,
                duration_minutes,
                level,
            },
            CONFIDENCE_CREATE,
        ));
    }
    if patterns::is_modify_phrase(utterance) {
        let kind = if memory.current_plan.is_some() {
            IntentKind::ModifyWorkout
        } else {
            IntentKind::NothingToModify
        };
        return Some(Intent::new(kind, CONFIDENCE_MODIFY));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_core::types::{Exercise, WorkoutPlan};
    use uuid::Uuid;

    fn resolver() -> IntentResolver {
        IntentResolver::new()
    }

    fn plan() -> WorkoutPlan {
        WorkoutPlan {
            id: Uuid::new_v4(),
            name: "Leg day".to_string(),
            category: None,
            duration_minutes: None,
            level: None,
            exercises: vec![Exercise::new("Squat", 3, 10)],
        }
    }

    fn memory_with_pending() -> WorkingMemory {
        let plan = plan();
        let ctx = crate::clarify::prepare_modification("modify_workout", Some(&plan)).unwrap();
        WorkingMemory {
            current_plan: Some(plan),
            pending_clarification: Some(ctx),
            ..WorkingMemory::default()
        }
    }

    // ---- Totality and purity ----

    #[test]
    fn test_always_resolves_exactly_one_intent() {
        let memory = WorkingMemory::default();
        for utterance in ["", "  ", "qwerty", "hi", "double it", "what is a squat?"] {
            let intent = resolver().resolve(utterance, &memory);
            assert!(intent.confidence > 0.0);
        }
    }

    #[test]
    fn test_deterministic_for_same_inputs() {
        let memory = memory_with_pending();
        for utterance in ["double the sets", "2.", "hi", "gibberish"] {
            let a = resolver().resolve(utterance, &memory);
            let b = resolver().resolve(utterance, &memory);
            assert_eq!(a, b);
        }
    }

    // ---- Stage 2: primary cascade ----

    #[test]
    fn test_greeting_resolves() {
        let intent = resolver().resolve("hello!", &WorkingMemory::default());
        assert_eq!(intent.kind, IntentKind::Greeting);
        assert!((intent.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_lookup_resolves_with_subject() {
        let intent = resolver().resolve("what is a squat?", &WorkingMemory::default());
        assert_eq!(
            intent.kind,
            IntentKind::LookupExercise {
                subject: Some("squat".to_string())
            }
        );
    }

    #[test]
    fn test_creation_resolves_with_slots() {
        let intent = resolver().resolve(
            "create a 20 minute strength workout for a beginner",
            &WorkingMemory::default(),
        );
        match intent.kind {
            IntentKind::CreateWorkout {
                category,
                duration_minutes,
                ..
            } => {
                assert_eq!(category.as_deref(), Some("strength"));
                assert_eq!(duration_minutes, Some(20));
            }
            other => panic!("unexpected kind: {}", other),
        }
    }

    #[test]
    fn test_modify_with_plan() {
        let memory = WorkingMemory {
            current_plan: Some(plan()),
            ..WorkingMemory::default()
        };
        let intent = resolver().resolve("double it", &memory);
        assert_eq!(intent.kind, IntentKind::ModifyWorkout);
    }

    #[test]
    fn test_modify_without_plan() {
        let intent = resolver().resolve("double it", &WorkingMemory::default());
        assert_eq!(intent.kind, IntentKind::NothingToModify);
    }

    // ---- Stage 1: clarification answers ----

    #[test]
    fn test_answer_by_synonym_substring() {
        let memory = memory_with_pending();
        let intent = resolver().resolve("double the sets", &memory);
        match intent.kind {
            IntentKind::ClarificationAnswer { choice, origin, plan_id } => {
                assert_eq!(choice, "sets");
                assert_eq!(origin, "modify_workout");
                assert_eq!(plan_id, Some(memory.current_plan.as_ref().unwrap().id));
            }
            other => panic!("unexpected kind: {}", other),
        }
        assert!((intent.confidence - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_answer_by_exact_value() {
        let memory = memory_with_pending();
        let intent = resolver().resolve("reps", &memory);
        assert!(matches!(
            intent.kind,
            IntentKind::ClarificationAnswer { ref choice, .. } if choice == "reps"
        ));
    }

    #[test]
    fn test_answer_by_ordinal() {
        let memory = memory_with_pending();
        let intent = resolver().resolve("2", &memory);
        assert!(matches!(
            intent.kind,
            IntentKind::ClarificationAnswer { ref choice, .. } if choice == "reps"
        ));

        let intent = resolver().resolve("3.", &memory);
        assert!(matches!(
            intent.kind,
            IntentKind::ClarificationAnswer { ref choice, .. } if choice == "both"
        ));
    }

    #[test]
    fn test_out_of_range_ordinal_is_not_an_answer() {
        let memory = memory_with_pending();
        let intent = resolver().resolve("7", &memory);
        assert!(matches!(intent.kind, IntentKind::ClarificationMismatch { .. }));
    }

    #[test]
    fn test_answer_wins_over_primary_cascade() {
        // "help" would resolve as a help request, but an open clarification
        // whose option matches must capture it first.
        let plan = plan();
        let ctx = ClarificationContext {
            origin: "modify_workout".to_string(),
            question: "Which one?".to_string(),
            options: vec![ClarificationOption::new("Help me choose", "help", vec![])],
            plan_id: Some(plan.id),
        };
        let memory = WorkingMemory {
            current_plan: Some(plan),
            pending_clarification: Some(ctx),
            ..WorkingMemory::default()
        };
        let intent = resolver().resolve("help", &memory);
        assert!(matches!(
            intent.kind,
            IntentKind::ClarificationAnswer { ref choice, .. } if choice == "help"
        ));
    }

    // ---- Stage 3: reconciliation ----

    #[test]
    fn test_new_primary_intent_beats_pending_clarification() {
        let memory = memory_with_pending();
        let intent = resolver().resolve("hi there", &memory);
        assert_eq!(intent.kind, IntentKind::Greeting);
    }

    #[test]
    fn test_mismatch_carries_original_question() {
        let memory = memory_with_pending();
        let intent = resolver().resolve("purple elephants", &memory);
        match intent.kind {
            IntentKind::ClarificationMismatch { question } => {
                assert_eq!(question, "How would you like me to scale the workout?");
            }
            other => panic!("unexpected kind: {}", other),
        }
        assert!((intent.confidence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_fallback_carries_raw_input() {
        let intent = resolver().resolve("purple elephants", &WorkingMemory::default());
        match intent.kind {
            IntentKind::Unknown { raw } => assert_eq!(raw, "purple elephants"),
            other => panic!("unexpected kind: {}", other),
        }
        assert!((intent.confidence - 0.5).abs() < f32::EPSILON);
    }
}
