//! Workflow and tool error types.

use crate::step::StepId;
use thiserror::Error;

/// Errors raised by tools and the tool registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ToolError {
    /// No tool is registered under the requested id.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The tool ran and reported a failure.
    #[error("Tool '{tool_id}' failed: {message}")]
    Execution {
        /// The tool that failed.
        tool_id: String,
        /// Details about the failure.
        message: String,
    },

    /// The registry rejected a tool definition.
    #[error("Invalid tool definition: {0}")]
    InvalidDefinition(String),
}

impl ToolError {
    /// Creates an execution error for the given tool.
    pub fn execution(tool_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            tool_id: tool_id.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while building or executing a workflow.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WorkflowError {
    /// The step graph contains a cycle. Nothing was executed.
    #[error("Cyclic dependency detected at step: {0}")]
    CyclicDependency(StepId),

    /// A step's tool could not be found or failed while running.
    #[error("Step failed: {step_id}, details: {source}")]
    StepExecution {
        /// The step that failed.
        step_id: StepId,
        /// The underlying tool error.
        #[source]
        source: ToolError,
    },

    /// Every retry attempt for a step failed.
    #[error("Step failed after {attempts} attempts: {step_id}, details: {source}")]
    RetryExhausted {
        /// The step that failed.
        step_id: StepId,
        /// How many times the tool was invoked.
        attempts: u32,
        /// The error from the last attempt.
        #[source]
        source: ToolError,
    },

    /// The fallback substituted for a failed step also failed.
    #[error("Fallback '{fallback_id}' for step '{step_id}' failed: {source}")]
    FallbackFailed {
        /// The step whose output slot was being filled.
        step_id: StepId,
        /// The fallback step that ran.
        fallback_id: StepId,
        /// Why the fallback failed.
        #[source]
        source: Box<WorkflowError>,
    },

    /// Two steps in one workflow share an id.
    #[error("Duplicate step id: {0}")]
    DuplicateStep(StepId),

    /// The workflow or engine configuration is invalid.
    #[error("Invalid workflow configuration: {0}")]
    Configuration(String),
}

impl WorkflowError {
    /// Returns `true` for failures a step's error policy may recover from.
    pub fn is_step_failure(&self) -> bool {
        matches!(
            self,
            WorkflowError::StepExecution { .. } | WorkflowError::RetryExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = WorkflowError::StepExecution {
            step_id: StepId::new("test_step"),
            source: ToolError::execution("echo", "boom"),
        };
        assert_eq!(
            error.to_string(),
            "Step failed: test_step, details: Tool 'echo' failed: boom"
        );

        let error = WorkflowError::CyclicDependency(StepId::new("a"));
        assert_eq!(error.to_string(), "Cyclic dependency detected at step: a");
    }

    #[test]
    fn test_tool_not_found_display() {
        let error = ToolError::NotFound("missing".to_string());
        assert_eq!(error.to_string(), "Tool not found: missing");
    }

    #[test]
    fn test_fallback_failure_is_not_recoverable() {
        let inner = WorkflowError::StepExecution {
            step_id: StepId::new("fallback"),
            source: ToolError::NotFound("x".to_string()),
        };
        let error = WorkflowError::FallbackFailed {
            step_id: StepId::new("primary"),
            fallback_id: StepId::new("fallback"),
            source: Box::new(inner),
        };
        assert!(!error.is_step_failure());
        assert!(!WorkflowError::Configuration("x".into()).is_step_failure());
    }

    #[test]
    fn test_retry_exhausted_is_step_failure() {
        let error = WorkflowError::RetryExhausted {
            step_id: StepId::new("flaky"),
            attempts: 3,
            source: ToolError::execution("t", "down"),
        };
        assert!(error.is_step_failure());
        assert_eq!(
            error.to_string(),
            "Step failed after 3 attempts: flaky, details: Tool 't' failed: down"
        );
    }
}
