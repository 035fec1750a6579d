//! Exercise reference lookup tool.
//!
//! Deterministic in-crate reference; async so a network-backed catalogue
//! can slot in behind the same contract.

use async_trait::async_trait;

use spotter_memory::session::MemorySnapshot;

use crate::error::ToolError;
use crate::tool::{Tool, ToolParams, ToolResult};

/// (name, what it works, cue) per known exercise.
static REFERENCE: &[(&str, &str, &str)] = &[
    (
        "squat",
        "quads, glutes, and core",
        "keep your heels down and chest up",
    ),
    (
        "deadlift",
        "hamstrings, glutes, and lower back",
        "hinge at the hips and keep the bar close",
    ),
    (
        "push-up",
        "chest, shoulders, and triceps",
        "keep a straight line from head to heels",
    ),
    (
        "plank",
        "core and shoulders",
        "brace your abs and don't let your hips sag",
    ),
    (
        "lunge",
        "quads and glutes",
        "step far enough that your front knee stays over your ankle",
    ),
    (
        "burpee",
        "the whole body",
        "land softly and keep a steady rhythm",
    ),
    (
        "pull-up",
        "lats and biceps",
        "start from a dead hang and pull your chest to the bar",
    ),
    (
        "row",
        "upper back and biceps",
        "squeeze your shoulder blades together at the top",
    ),
];

pub struct ExerciseLookupTool;

#[async_trait]
impl Tool for ExerciseLookupTool {
    fn name(&self) -> &'static str {
        "exercise_lookup"
    }

    fn description(&self) -> &'static str {
        "Look up what an exercise works and how to perform it"
    }

    async fn execute(
        &self,
        params: &ToolParams,
        _snapshot: &MemorySnapshot,
    ) -> Result<ToolResult, ToolError> {
        let ToolParams::ExerciseLookup { subject } = params else {
            return Err(ToolError::InvalidParams {
                tool: self.name(),
                reason: format!("expected exercise_lookup params, got {}", params.tool_name()),
            });
        };

        let key = normalize(subject);
        if key.is_empty() {
            return Err(ToolError::InvalidParams {
                tool: self.name(),
                reason: "subject must not be empty".to_string(),
            });
        }

        match find(&key) {
            Some((name, muscles, cue)) => {
                tracing::debug!(subject = %key, "Exercise found");
                Ok(ToolResult::ok(format!(
                    "{} works {}. Tip: {}.",
                    capitalize(name),
                    muscles,
                    cue
                )))
            }
            None => Ok(ToolResult::fail(format!(
                "I don't have notes on \"{}\" yet.",
                subject.trim()
            ))),
        }
    }
}

fn normalize(subject: &str) -> String {
    subject
        .trim()
        .trim_end_matches(['?', '.', '!'])
        .trim()
        .to_lowercase()
        .replace(' ', "-")
}

fn find(key: &str) -> Option<(&'static str, &'static str, &'static str)> {
    let singular = key.strip_suffix('s').unwrap_or(key);
    REFERENCE
        .iter()
        .find(|(name, _, _)| {
            *name == key || *name == singular || name.replace('-', "") == singular.replace('-', "")
        })
        .copied()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
