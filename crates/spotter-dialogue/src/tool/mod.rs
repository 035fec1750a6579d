//! Tool contract and registry.
//!
//! Tools are named, pluggable actions invoked with typed params and a
//! read-only memory snapshot. They return data; only the orchestrator
//! commits anything into live memory.

pub mod create_workout;
pub mod dispatcher;
pub mod exercise_lookup;
pub mod scale_workout;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spotter_core::types::{ExperienceLevel, WorkoutPlan};
use spotter_memory::session::MemorySnapshot;

use crate::error::ToolError;

pub use dispatcher::{DispatchOutcome, Dispatcher};

// =============================================================================
// Params
// =============================================================================

/// Which numeric fields a scaling operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleTarget {
    Sets,
    Reps,
    Both,
}

impl fmt::Display for ScaleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleTarget::Sets => write!(f, "sets"),
            ScaleTarget::Reps => write!(f, "reps"),
            ScaleTarget::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for ScaleTarget {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sets" => Ok(ScaleTarget::Sets),
            "reps" => Ok(ScaleTarget::Reps),
            "both" => Ok(ScaleTarget::Both),
            _ => Err(format!("Unknown scale target: {}", s)),
        }
    }
}

/// Typed parameters, one variant per registered tool name.
///
/// The registry stays string-keyed for registration flexibility; params and
/// results are checked at compile time through this variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolParams {
    ScaleWorkout {
        plan_id: Uuid,
        factor: f32,
        target: ScaleTarget,
    },
    ExerciseLookup {
        subject: String,
    },
    CreateWorkout {
        category: Option<String>,
        duration_minutes: Option<u32>,
        level: Option<ExperienceLevel>,
    },
}

impl ToolParams {
    /// The registry name of the tool these params belong to.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolParams::ScaleWorkout { .. } => "scale_workout",
            ToolParams::ExerciseLookup { .. } => "exercise_lookup",
            ToolParams::CreateWorkout { .. } => "create_workout",
        }
    }
}

// =============================================================================
// Result
// =============================================================================

/// What a tool hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub message: String,
    pub updated_plan: Option<WorkoutPlan>,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            updated_plan: None,
            error: None,
        }
    }

    pub fn ok_with_plan(message: impl Into<String>, plan: WorkoutPlan) -> Self {
        Self {
            success: true,
            message: message.into(),
            updated_plan: Some(plan),
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            message: message.clone(),
            updated_plan: None,
            error: Some(message),
        }
    }
}

// =============================================================================
// Trait & Registry
// =============================================================================

/// A pluggable action handler.
///
/// Tools must not assume any ability to mutate the snapshot; state changes
/// flow back through `ToolResult` and are committed by the orchestrator.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn execute(
        &self,
        params: &ToolParams,
        snapshot: &MemorySnapshot,
    ) -> Result<ToolResult, ToolError>;
}

/// Explicit, static `name -> Tool` mapping. No discovery protocol.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Register the built-in tools.
    pub fn register_defaults(&mut self) {
        self.register(Arc::new(scale_workout::ScaleWorkoutTool));
        self.register(Arc::new(exercise_lookup::ExerciseLookupTool));
        self.register(Arc::new(create_workout::CreateWorkoutTool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.tools.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- ScaleTarget ----

    #[test]
    fn test_scale_target_display_from_str_round_trip() {
        for target in [ScaleTarget::Sets, ScaleTarget::Reps, ScaleTarget::Both] {
            let s = target.to_string();
            let parsed: ScaleTarget = s.parse().unwrap();
            assert_eq!(target, parsed);
        }
        assert!("weight".parse::<ScaleTarget>().is_err());
    }

    // ---- ToolParams ----

    #[test]
    fn test_tool_params_names() {
        let params = ToolParams::ScaleWorkout {
            plan_id: Uuid::new_v4(),
            factor: 2.0,
            target: ScaleTarget::Sets,
        };
        assert_eq!(params.tool_name(), "scale_workout");

        let params = ToolParams::ExerciseLookup {
            subject: "squat".to_string(),
        };
        assert_eq!(params.tool_name(), "exercise_lookup");

        let params = ToolParams::CreateWorkout {
            category: None,
            duration_minutes: None,
            level: None,
        };
        assert_eq!(params.tool_name(), "create_workout");
    }

    #[test]
    fn test_tool_params_serde_carries_tool_tag() {
        let params = ToolParams::ExerciseLookup {
            subject: "plank".to_string(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["tool"], "exercise_lookup");
        assert_eq!(json["subject"], "plank");
        let rt: ToolParams = serde_json::from_value(json).unwrap();
        assert_eq!(params, rt);
    }

    // ---- ToolResult ----

    #[test]
    fn test_tool_result_constructors() {
        let ok = ToolResult::ok("done");
        assert!(ok.success);
        assert!(ok.error.is_none());
        assert!(ok.updated_plan.is_none());

        let fail = ToolResult::fail("nope");
        assert!(!fail.success);
        assert_eq!(fail.error.as_deref(), Some("nope"));
    }

    // ---- ToolRegistry ----

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register_defaults();
        assert_eq!(registry.len(), 3);
        assert!(registry.get("scale_workout").is_some());
        assert!(registry.get("exercise_lookup").is_some());
        assert!(registry.get("create_workout").is_some());
        assert!(registry.get("no_such_tool").is_none());
    }

    #[test]
    fn test_registry_names_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register_defaults();
        assert_eq!(
            registry.names(),
            vec!["create_workout", "exercise_lookup", "scale_workout"]
        );
    }

    #[test]
    fn test_registry_lookup_is_exact() {
        let mut registry = ToolRegistry::new();
        registry.register_defaults();
        assert!(registry.get("Scale_Workout").is_none());
        assert!(registry.get("scale_workout ").is_none());
    }
}
