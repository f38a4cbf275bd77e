//! Workflow engine for executing steps in dependency order.

use crate::executor::StepExecutor;
use crate::retry::RetryPolicy;
use std::fmt;
use std::sync::Arc;
use toolflow_core::{
    resolve_order, ExecutionContext, ResultMap, RetryConfig, StepId, ToolExecutor, Workflow,
    WorkflowError, WorkflowStep,
};
use tracing::{debug, error, info, warn};

/// Runs workflows against a shared tool executor.
///
/// Steps run strictly one at a time in resolved dependency order. Each call
/// to [`execute_workflow`](Self::execute_workflow) owns its own
/// [`ResultMap`]; the engine itself holds no per-run state and can be shared
/// across tasks.
pub struct WorkflowEngine {
    tools: Arc<dyn ToolExecutor>,
    retry: RetryPolicy,
}

impl fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl WorkflowEngine {
    /// Creates an engine over `tools` using `retry` for retry-eligible steps.
    pub fn new(tools: Arc<dyn ToolExecutor>, retry: RetryConfig) -> Self {
        Self {
            tools,
            retry: RetryPolicy::new(retry),
        }
    }

    /// Creates a new engine builder.
    pub fn builder() -> WorkflowEngineBuilder {
        WorkflowEngineBuilder::new()
    }

    /// Returns the retry policy applied to steps with `retry: true`.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Executes every step of `workflow` and returns their outputs.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::CyclicDependency`] before any step runs
    /// - the step's failure when it has no fallback
    /// - [`WorkflowError::FallbackFailed`] when the fallback step fails
    ///
    /// A partial result map is never returned.
    pub async fn execute_workflow(
        &self,
        workflow: &Workflow,
        ctx: &ExecutionContext,
    ) -> Result<ResultMap, WorkflowError> {
        let order = match resolve_order(workflow.steps()) {
            Ok(order) => order,
            Err(e) => {
                error!(workflow = workflow.id(), error = %e, "Workflow rejected");
                return Err(e);
            }
        };

        debug!(
            workflow = workflow.id(),
            order = ?order.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            "Resolved execution order"
        );
        info!(
            workflow = workflow.id(),
            steps = order.len(),
            "Workflow started"
        );

        let executor = StepExecutor::new(self.tools.as_ref(), &self.retry);
        let mut results = ResultMap::new();

        for step in order {
            match executor.execute(step, ctx, &results).await {
                Ok(value) => {
                    info!(step_id = %step.id, "Step completed");
                    record(&mut results, &step.id, value);
                }
                Err(e) => {
                    error!(step_id = %step.id, error = %e, "Step failed");
                    self.recover(workflow, step, e, &executor, ctx, &mut results)
                        .await?;
                }
            }
        }

        info!(
            workflow = workflow.id(),
            recorded = results.len(),
            "Workflow completed"
        );
        Ok(results)
    }

    async fn recover(
        &self,
        workflow: &Workflow,
        step: &WorkflowStep,
        failure: WorkflowError,
        executor: &StepExecutor<'_>,
        ctx: &ExecutionContext,
        results: &mut ResultMap,
    ) -> Result<(), WorkflowError> {
        let Some(fallback_id) = step.fallback_id().filter(|_| failure.is_step_failure()) else {
            return Err(failure);
        };

        // Looked up in the declared step list, not the resolved order.
        let Some(fallback) = workflow.step(fallback_id.as_str()) else {
            warn!(
                step_id = %step.id,
                fallback_id = %fallback_id,
                "Fallback step not found, leaving step without a result"
            );
            return Ok(());
        };

        info!(step_id = %step.id, fallback_id = %fallback_id, "Running fallback step");
        match executor.execute(fallback, ctx, results).await {
            Ok(value) => {
                record(results, &step.id, value);
                Ok(())
            }
            Err(e) => {
                error!(
                    step_id = %step.id,
                    fallback_id = %fallback_id,
                    error = %e,
                    "Fallback step failed"
                );
                Err(WorkflowError::FallbackFailed {
                    step_id: step.id.clone(),
                    fallback_id: fallback_id.clone(),
                    source: Box::new(e),
                })
            }
        }
    }
}

fn record(results: &mut ResultMap, step_id: &StepId, value: serde_json::Value) {
    if !results.record(step_id.clone(), value) {
        warn!(step_id = %step_id, "Step already has a result, keeping the first");
    }
}

/// Builder for constructing [`WorkflowEngine`] instances.
#[derive(Default)]
pub struct WorkflowEngineBuilder {
    tools: Option<Arc<dyn ToolExecutor>>,
    retry: RetryConfig,
}

impl WorkflowEngineBuilder {
    /// Creates a builder with the default retry configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tool executor, taking ownership.
    pub fn tools<T: ToolExecutor + 'static>(mut self, tools: T) -> Self {
        self.tools = Some(Arc::new(tools));
        self
    }

    /// Sets the retry configuration.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Result<WorkflowEngine, WorkflowError> {
        let tools = self.tools.ok_or_else(|| {
            WorkflowError::Configuration("Tool executor must be specified".to_string())
        })?;

        Ok(WorkflowEngine::new(tools, self.retry))
    }
}
