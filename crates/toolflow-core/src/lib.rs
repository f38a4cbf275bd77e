//! Core traits and types for the toolflow workflow engine.
//!
//! This crate provides the workflow vocabulary without runtime dependencies.
//! Tool authors should depend on this crate to implement custom tools.
//!
//! # Core Types
//!
//! - [`Workflow`] / [`WorkflowStep`] - Declarative step graph
//! - [`ErrorPolicy`] - Per-step retry and fallback
//! - [`ExecutionContext`] / [`ResultMap`] - Data in and out of a run
//! - [`RetryConfig`] / [`RetryOutcome`] - Backoff settings and results
//! - [`Tool`] / [`ToolExecutor`] - The seam to externally registered tools
//! - [`WorkflowError`] / [`ToolError`] - Error types
//!
//! # Ordering
//!
//! - [`resolve_order`] - Dependency-first step ordering with cycle detection

mod context;
mod error;
mod resolver;
mod retry;
mod step;
mod traits;
mod workflow;

pub use context::{ExecutionContext, ResultMap};
pub use error::{ToolError, WorkflowError};
pub use resolver::resolve_order;
pub use retry::{RetryConfig, RetryConfigError, RetryOutcome};
pub use step::{ErrorPolicy, StepId, WorkflowStep};
pub use traits::{Tool, ToolExecutor, ToolParams};
pub use workflow::{Workflow, WorkflowBuilder, WorkflowDefinition};
