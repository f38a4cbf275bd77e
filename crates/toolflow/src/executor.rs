//! Single-step execution.

use crate::retry::RetryPolicy;
use serde_json::Value;
use toolflow_core::{
    ExecutionContext, ResultMap, ToolExecutor, ToolParams, WorkflowError, WorkflowStep,
};
use tracing::info;

/// Reserved parameter carrying the caller's [`ExecutionContext`].
pub const CONTEXT_PARAM: &str = "context";

/// Reserved parameter carrying the [`ResultMap`] accumulated so far.
pub const PREVIOUS_RESULTS_PARAM: &str = "previousResults";

/// Runs one step through the tool executor.
///
/// Unknown tools and tool failures surface as the same
/// [`WorkflowError::StepExecution`]; exhausted retries surface as
/// [`WorkflowError::RetryExhausted`].
#[derive(Clone, Copy)]
pub struct StepExecutor<'a> {
    tools: &'a dyn ToolExecutor,
    retry: &'a RetryPolicy,
}

impl<'a> StepExecutor<'a> {
    /// Creates an executor over the given tools and retry policy.
    pub fn new(tools: &'a dyn ToolExecutor, retry: &'a RetryPolicy) -> Self {
        Self { tools, retry }
    }

    /// Builds the tool parameters for `step`.
    ///
    /// The step's own parameters come first; the reserved `context` and
    /// `previousResults` entries overwrite same-named step parameters.
    pub fn build_params(
        step: &WorkflowStep,
        ctx: &ExecutionContext,
        results: &ResultMap,
    ) -> ToolParams {
        let mut params = step.params.clone();
        params.insert(CONTEXT_PARAM.to_string(), ctx.to_value());
        params.insert(PREVIOUS_RESULTS_PARAM.to_string(), results.to_value());
        params
    }

    /// Executes `step`, retrying with backoff if its error policy asks for it.
    pub async fn execute(
        &self,
        step: &WorkflowStep,
        ctx: &ExecutionContext,
        results: &ResultMap,
    ) -> Result<Value, WorkflowError> {
        let params = Self::build_params(step, ctx, results);

        if !step.retries() {
            return self
                .tools
                .execute_tool(&step.tool_id, params)
                .await
                .map_err(|source| WorkflowError::StepExecution {
                    step_id: step.id.clone(),
                    source,
                });
        }

        let outcome = self
            .retry
            .retry(|| self.tools.execute_tool(&step.tool_id, params.clone()))
            .await;

        let attempts = outcome.attempts_used();
        if outcome.is_success() && attempts > 0 {
            info!(step_id = %step.id, attempts_used = attempts, "Step recovered after retry");
        }
        outcome
            .into_result()
            .map_err(|source| WorkflowError::RetryExhausted {
                step_id: step.id.clone(),
                attempts,
                source,
            })
    }
}

impl std::fmt::Debug for StepExecutor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepExecutor")
            .field("retry", self.retry)
            .finish_non_exhaustive()
    }
}
