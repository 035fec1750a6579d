//! Workout creation tool.
//!
//! Builds a plan from the slots extracted at resolution time using a small
//! deterministic template per category.

use async_trait::async_trait;
use uuid::Uuid;

use spotter_core::types::{Exercise, ExperienceLevel, WorkoutPlan};
use spotter_memory::session::MemorySnapshot;

use crate::error::ToolError;
use crate::tool::{Tool, ToolParams, ToolResult};

const DEFAULT_CATEGORY: &str = "full body";
const DEFAULT_DURATION_MINUTES: u32 = 30;

pub struct CreateWorkoutTool;

#[async_trait]
impl Tool for CreateWorkoutTool {
    fn name(&self) -> &'static str {
        "create_workout"
    }

    fn description(&self) -> &'static str {
        "Create a workout plan from category, duration, and experience level"
    }

    async fn execute(
        &self,
        params: &ToolParams,
        _snapshot: &MemorySnapshot,
    ) -> Result<ToolResult, ToolError> {
        let ToolParams::CreateWorkout {
            category,
            duration_minutes,
            level,
        } = params
        else {
            return Err(ToolError::InvalidParams {
                tool: self.name(),
                reason: format!("expected create_workout params, got {}", params.tool_name()),
            });
        };

        let category = category
            .as_deref()
            .unwrap_or(DEFAULT_CATEGORY)
            .to_lowercase();
        let duration = duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        let sets = sets_for(*level);

        let exercises: Vec<Exercise> = template_for(&category)
            .iter()
            .map(|(name, reps)| Exercise::new(*name, sets, *reps))
            .collect();

        let plan = WorkoutPlan {
            id: Uuid::new_v4(),
            name: plan_name(&category),
            category: Some(category.clone()),
            duration_minutes: Some(duration),
            level: *level,
            exercises,
        };

        tracing::info!(plan = %plan.name, duration, "Workout created");

        let message = format!(
            "Created a {}-minute {} workout with {} exercises. Say \"double it\" if you want more volume.",
            duration,
            category,
            plan.exercises.len()
        );
        Ok(ToolResult::ok_with_plan(message, plan))
    }
}

fn sets_for(level: Option<ExperienceLevel>) -> u32 {
    match level {
        Some(ExperienceLevel::Beginner) => 2,
        Some(ExperienceLevel::Advanced) => 4,
        Some(ExperienceLevel::Intermediate) | None => 3,
    }
}

fn template_for(category: &str) -> &'static [(&'static str, u32)] {
    match category {
        "strength" => &[("Squat", 8), ("Deadlift", 6), ("Push-up", 12), ("Row", 10)],
        "cardio" => &[("Jumping jacks", 30), ("Burpee", 12), ("Mountain climber", 20)],
        "core" => &[("Plank", 1), ("Crunch", 15), ("Leg raise", 12)],
        "legs" | "lower body" => &[("Squat", 10), ("Lunge", 10), ("Calf raise", 15)],
        "upper body" => &[("Push-up", 12), ("Pull-up", 6), ("Row", 10)],
        _ => &[("Squat", 10), ("Push-up", 12), ("Plank", 1), ("Lunge", 10)],
    }
}

fn plan_name(category: &str) -> String {
    let mut chars = category.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("{} workout", capitalized)
}
