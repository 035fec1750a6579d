//! Tool dispatcher.
//!
//! Executes one tool against an immutable snapshot of session memory and
//! classifies the outcome into an action record. Nothing that happens in
//! here propagates as an unhandled fault.

use std::time::Duration;

use spotter_core::types::ActionRecord;
use spotter_memory::session::SessionMemory;

use crate::error::ToolError;
use crate::tool::{ToolParams, ToolRegistry, ToolResult};

/// A tool result paired with its audit record.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub result: ToolResult,
    pub record: ActionRecord,
}

/// Serial, bounded tool execution over a static registry.
pub struct Dispatcher {
    registry: ToolRegistry,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke `tool_name` with `params` against a deep-copied snapshot of
    /// `memory`.
    ///
    /// Outcome classification:
    /// - unknown tool -> `Failure` record, failure result, no panic;
    /// - tool-reported failure -> `Failure` record;
    /// - tool error or timeout -> `Exception` record, presented to the user
    ///   as an ordinary failure;
    /// - success -> `Success` record; any `updated_plan` is left for the
    ///   caller to commit.
    pub async fn invoke(
        &self,
        tool_name: &str,
        params: &ToolParams,
        memory: &SessionMemory,
    ) -> DispatchOutcome {
        let params_json = serde_json::to_value(params).unwrap_or_default();

        let Some(tool) = self.registry.get(tool_name) else {
            tracing::warn!(tool = tool_name, "Dispatch to unregistered tool");
            return DispatchOutcome {
                result: ToolResult::fail("I can't do that right now."),
                record: ActionRecord::failure(
                    tool_name,
                    params_json,
                    format!("tool not registered: {}", tool_name),
                ),
            };
        };

        let snapshot = memory.snapshot();
        match tokio::time::timeout(self.timeout, tool.execute(params, &snapshot)).await {
            Ok(Ok(result)) if result.success => {
                tracing::debug!(tool = tool_name, "Tool succeeded");
                DispatchOutcome {
                    record: ActionRecord::success(tool_name, params_json, result.message.clone()),
                    result,
                }
            }
            Ok(Ok(result)) => {
                let detail = result
                    .error
                    .clone()
                    .unwrap_or_else(|| result.message.clone());
                tracing::debug!(tool = tool_name, detail = %detail, "Tool reported failure");
                DispatchOutcome {
                    record: ActionRecord::failure(tool_name, params_json, detail),
                    result,
                }
            }
            Ok(Err(err)) => {
                tracing::warn!(tool = tool_name, error = %err, "Tool raised an error");
                DispatchOutcome {
                    result: ToolResult::fail("Something went wrong while doing that."),
                    record: ActionRecord::exception(tool_name, params_json, err.to_string()),
                }
            }
            Err(_) => {
                let err = ToolError::Timeout(self.timeout.as_secs());
                tracing::warn!(tool = tool_name, error = %err, "Tool timed out");
                DispatchOutcome {
                    result: ToolResult::fail("That took too long, so I stopped it."),
                    record: ActionRecord::exception(tool_name, params_json, err.to_string()),
                }
            }
        }
    }
}
