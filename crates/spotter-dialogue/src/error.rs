//! Error types for the dialogue manager.

use spotter_core::error::SpotterError;

/// Errors from the clarification planner.
#[derive(Debug, thiserror::Error)]
pub enum ClarifyError {
    #[error("No active workout to modify")]
    NoActivePlan,
}

/// Errors from tool execution.
///
/// Distinct from a tool-reported failure (`ToolResult { success: false }`):
/// these are the exception path and are logged as such, though the user
/// sees the same kind of message either way.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid params for tool {tool}: {reason}")]
    InvalidParams { tool: &'static str, reason: String },
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Tool execution timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors surfaced by `process_turn`.
///
/// Only input validation fails hard; every dialogue-level problem is
/// recovered inside the turn and rendered as a reply.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("Utterance must not be empty")]
    EmptyUtterance,
    #[error("Utterance exceeds {0} characters")]
    UtteranceTooLong(usize),
    #[error("Storage error: {0}")]
    Storage(#[from] SpotterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clarify_error_display() {
        assert_eq!(
            ClarifyError::NoActivePlan.to_string(),
            "No active workout to modify"
        );
    }

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::InvalidParams {
            tool: "scale_workout",
            reason: "factor must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid params for tool scale_workout: factor must be positive"
        );

        let err = ToolError::ExecutionFailed("connection reset".to_string());
        assert_eq!(err.to_string(), "Tool execution failed: connection reset");

        let err = ToolError::Timeout(10);
        assert_eq!(err.to_string(), "Tool execution timed out after 10 seconds");
    }

    #[test]
    fn test_dialogue_error_display() {
        assert_eq!(
            DialogueError::EmptyUtterance.to_string(),
            "Utterance must not be empty"
        );
        assert_eq!(
            DialogueError::UtteranceTooLong(2000).to_string(),
            "Utterance exceeds 2000 characters"
        );
    }

    #[test]
    fn test_dialogue_error_from_spotter_error() {
        let err: DialogueError = SpotterError::Storage("disk full".to_string()).into();
        assert!(matches!(err, DialogueError::Storage(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
