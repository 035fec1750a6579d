//! Core types and value objects for the dialogue manager.
//!
//! Defines the workout domain model, resolved intents, clarification
//! contexts, and action records shared across the memory and dialogue crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Newtype Wrappers
// =============================================================================

/// Identifier of a conversation session, supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unix epoch seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Workout Domain
// =============================================================================

/// Training experience level extracted from an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "beginner"),
            ExperienceLevel::Intermediate => write!(f, "intermediate"),
            ExperienceLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(format!("Unknown experience level: {}", s)),
        }
    }
}

/// A single exercise within a workout plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
        }
    }
}

/// An in-progress workout plan, the current task of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub duration_minutes: Option<u32>,
    pub level: Option<ExperienceLevel>,
    pub exercises: Vec<Exercise>,
}

impl WorkoutPlan {
    /// A plan with no exercises cannot be modified.
    pub fn has_exercises(&self) -> bool {
        !self.exercises.is_empty()
    }
}

// =============================================================================
// Intents
// =============================================================================

/// The classified purpose of a single utterance, with extracted slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Greeting,
    Farewell,
    Thanks,
    HelpRequest,
    LookupExercise {
        subject: Option<String>,
    },
    CreateWorkout {
        category: Option<String>,
        duration_minutes: Option<u32>,
        level: Option<ExperienceLevel>,
    },
    ModifyWorkout,
    NothingToModify,
    ClarificationAnswer {
        choice: String,
        origin: String,
        plan_id: Option<Uuid>,
    },
    ClarificationMismatch {
        question: String,
    },
    Unknown {
        raw: String,
    },
}

impl IntentKind {
    /// Stable snake_case name used in logs and action records.
    pub fn name(&self) -> &'static str {
        match self {
            IntentKind::Greeting => "greeting",
            IntentKind::Farewell => "farewell",
            IntentKind::Thanks => "thanks",
            IntentKind::HelpRequest => "help_request",
            IntentKind::LookupExercise { .. } => "lookup_exercise",
            IntentKind::CreateWorkout { .. } => "create_workout",
            IntentKind::ModifyWorkout => "modify_workout",
            IntentKind::NothingToModify => "nothing_to_modify",
            IntentKind::ClarificationAnswer { .. } => "clarification_answer",
            IntentKind::ClarificationMismatch { .. } => "clarification_mismatch",
            IntentKind::Unknown { .. } => "unknown",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A resolved intent. Exactly one is produced per turn; `Unknown` is the
/// universal fallback, so a turn never resolves to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub confidence: f32,
}

impl Intent {
    pub fn new(kind: IntentKind, confidence: f32) -> Self {
        Self { kind, confidence }
    }
}

// =============================================================================
// Clarification
// =============================================================================

/// One selectable answer to a clarification question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationOption {
    pub label: String,
    pub value: String,
    pub synonyms: Vec<String>,
}

impl ClarificationOption {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        synonyms: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            synonyms,
        }
    }
}

/// An open question the system asked the user.
///
/// Created when a handler needs more information than the utterance
/// provided; consumed when the user answers, when a new primary intent
/// supersedes it, or when the plan it refers to is no longer active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationContext {
    /// Name of the intent that raised the question.
    pub origin: String,
    pub question: String,
    pub options: Vec<ClarificationOption>,
    /// Identity of the plan being disambiguated, if any.
    pub plan_id: Option<Uuid>,
}

// =============================================================================
// Action Records
// =============================================================================

/// Outcome classification of a dispatched tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Success,
    Failure,
    Exception,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Success => write!(f, "success"),
            ActionKind::Failure => write!(f, "failure"),
            ActionKind::Exception => write!(f, "exception"),
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ActionKind::Success),
            "failure" => Ok(ActionKind::Failure),
            "exception" => Ok(ActionKind::Exception),
            _ => Err(format!("Unknown action kind: {}", s)),
        }
    }
}

/// Audit record of the tool call made during a turn.
///
/// Written once per dispatching turn; read-only everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub kind: ActionKind,
    pub tool: String,
    pub params: serde_json::Value,
    pub detail: String,
    pub at: Timestamp,
}

impl ActionRecord {
    pub fn success(tool: impl Into<String>, params: serde_json::Value, detail: impl Into<String>) -> Self {
        Self::record(ActionKind::Success, tool, params, detail)
    }

    pub fn failure(tool: impl Into<String>, params: serde_json::Value, detail: impl Into<String>) -> Self {
        Self::record(ActionKind::Failure, tool, params, detail)
    }

    pub fn exception(tool: impl Into<String>, params: serde_json::Value, detail: impl Into<String>) -> Self {
        Self::record(ActionKind::Exception, tool, params, detail)
    }

    fn record(
        kind: ActionKind,
        tool: impl Into<String>,
        params: serde_json::Value,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            tool: tool.into(),
            params,
            detail: detail.into(),
            at: Timestamp::now(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
