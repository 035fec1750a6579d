//! Clarification planner.
//!
//! A rule-based planner, not a negotiation: the same intent shape always
//! produces the same question, and the user's next turn is captured by the
//! resolver's clarification-answer stage.

use spotter_core::types::{ClarificationContext, ClarificationOption, WorkoutPlan};

use crate::error::ClarifyError;

const SCALE_QUESTION: &str = "How would you like me to scale the workout?";

/// Plan the clarification for a modification-class intent.
///
/// Errors when there is no current plan, or the plan has no exercises to
/// modify.
pub fn prepare_modification(
    origin: &str,
    current_plan: Option<&WorkoutPlan>,
) -> Result<ClarificationContext, ClarifyError> {
    let plan = current_plan
        .filter(|p| p.has_exercises())
        .ok_or(ClarifyError::NoActivePlan)?;

    let options = vec![
        scale_option("Double the sets", "sets"),
        scale_option("Double the reps", "reps"),
        scale_option("Double both", "both"),
    ];

    Ok(ClarificationContext {
        origin: origin.to_string(),
        question: SCALE_QUESTION.to_string(),
        options,
        plan_id: Some(plan.id),
    })
}

fn scale_option(label: &str, value: &str) -> ClarificationOption {
    ClarificationOption::new(label, value, synonyms_for_label(label))
}

/// Derive match synonyms from an option label:
/// the label minus articles, its trailing noun, and that noun's singular.
fn synonyms_for_label(label: &str) -> Vec<String> {
    let lower = label.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| !matches!(*w, "the" | "a" | "an"))
        .collect();

    let mut synonyms = Vec::new();
    let collapsed = words.join(" ");
    if collapsed != lower {
        synonyms.push(collapsed);
    }
    if let Some(last) = words.last() {
        synonyms.push((*last).to_string());
        if let Some(singular) = last.strip_suffix('s') {
            if !singular.is_empty() {
                synonyms.push(singular.to_string());
            }
        }
    }
    synonyms.dedup();
    synonyms
}
