//! A small workflow engine that runs a graph of named steps, each delegating
//! its work to a registered tool.
//!
//! - Steps run one at a time in dependency order; cycles are rejected before
//!   anything runs.
//! - `retry: true` re-invokes a failing tool with exponential backoff.
//! - `fallback` substitutes another step's output for a failed step.
//! - Any other failure aborts the run.
//!
//! # Example
//!
//! ```rust
//! use toolflow::prelude::*;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = ToolRegistry::new();
//! registry.register(FnTool::new("shout", "Shout", |params| async move {
//!     let text = params["context"]["text"].as_str().unwrap_or_default().to_uppercase();
//!     Ok(json!(text))
//! }))?;
//!
//! let engine = WorkflowEngine::builder().tools(registry).build()?;
//! let workflow = Workflow::builder("demo", "Demo")
//!     .step(WorkflowStep::new("shout", "Shout", "shout"))
//!     .build()?;
//!
//! let ctx = ExecutionContext::new().with("text", "hello");
//! let results = engine.execute_workflow(&workflow, &ctx).await?;
//! assert_eq!(results.get("shout"), Some(&json!("HELLO")));
//! # Ok(())
//! # }
//! ```

pub mod config;
mod engine;
mod executor;
pub mod logging;
mod registry;
mod retry;
pub mod templates;

// Re-export core types
pub use toolflow_core::*;

pub use config::{ConfigError, EngineConfig, LoggingConfig, RetrySettings};
pub use engine::{WorkflowEngine, WorkflowEngineBuilder};
pub use executor::{StepExecutor, CONTEXT_PARAM, PREVIOUS_RESULTS_PARAM};
pub use registry::{FnTool, ToolRegistry};
pub use retry::RetryPolicy;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        EngineConfig, ExecutionContext, FnTool, ResultMap, RetryConfig, RetryPolicy, StepId,
        Tool, ToolError, ToolExecutor, ToolParams, ToolRegistry, Workflow, WorkflowEngine,
        WorkflowError, WorkflowStep,
    };
}
