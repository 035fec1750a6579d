//! Workout scaling tool.
//!
//! Multiplies the sets and/or reps of every exercise in the active plan
//! and returns the updated plan for the orchestrator to commit.

use async_trait::async_trait;

use spotter_memory::session::MemorySnapshot;

use crate::error::ToolError;
use crate::tool::{ScaleTarget, Tool, ToolParams, ToolResult};

pub struct ScaleWorkoutTool;

#[async_trait]
impl Tool for ScaleWorkoutTool {
    fn name(&self) -> &'static str {
        "scale_workout"
    }

    fn description(&self) -> &'static str {
        "Scale the sets and/or reps of the active workout by a factor"
    }

    async fn execute(
        &self,
        params: &ToolParams,
        snapshot: &MemorySnapshot,
    ) -> Result<ToolResult, ToolError> {
        let ToolParams::ScaleWorkout {
            plan_id,
            factor,
            target,
        } = params
        else {
            return Err(ToolError::InvalidParams {
                tool: self.name(),
                reason: format!("expected scale_workout params, got {}", params.tool_name()),
            });
        };

        if *factor <= 0.0 || !factor.is_finite() {
            return Err(ToolError::InvalidParams {
                tool: self.name(),
                reason: format!("factor must be positive, got {}", factor),
            });
        }

        let Some(plan) = snapshot.current_plan() else {
            return Ok(ToolResult::fail(
                "There's no active workout to scale. Create one first.",
            ));
        };
        if plan.id != *plan_id {
            return Ok(ToolResult::fail(
                "The workout we were talking about is no longer active.",
            ));
        }

        let mut updated = plan.clone();
        for exercise in &mut updated.exercises {
            if matches!(target, ScaleTarget::Sets | ScaleTarget::Both) {
                exercise.sets = scale(exercise.sets, *factor);
            }
            if matches!(target, ScaleTarget::Reps | ScaleTarget::Both) {
                exercise.reps = scale(exercise.reps, *factor);
            }
        }

        tracing::info!(plan = %updated.name, %target, factor, "Workout scaled");

        let message = format!("Done! I've {} in {}.", describe(*factor, *target), updated.name);
        Ok(ToolResult::ok_with_plan(message, updated))
    }
}

fn scale(value: u32, factor: f32) -> u32 {
    ((value as f32 * factor).round() as u32).max(1)
}

fn describe(factor: f32, target: ScaleTarget) -> String {
    let fields = match target {
        ScaleTarget::Sets => "the sets",
        ScaleTarget::Reps => "the reps",
        ScaleTarget::Both => "the sets and reps",
    };
    if (factor - 2.0).abs() < f32::EPSILON {
        format!("doubled {}", fields)
    } else {
        format!("scaled {} by {}x", fields, factor)
    }
}
