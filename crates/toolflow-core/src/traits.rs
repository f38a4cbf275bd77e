//! Tool traits.

use crate::error::ToolError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Parameters passed to a tool invocation.
pub type ToolParams = Map<String, Value>;

/// An externally registered capability that a step delegates its work to.
///
/// # Examples
///
/// ```
/// use toolflow_core::{Tool, ToolError, ToolParams};
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
///
/// #[derive(Debug)]
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn id(&self) -> &str {
///         "echo"
///     }
///
///     fn name(&self) -> &str {
///         "Echo"
///     }
///
///     async fn execute(&self, params: ToolParams) -> Result<Value, ToolError> {
///         Ok(Value::Object(params))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync + Debug {
    /// Registry key.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Human readable description.
    fn description(&self) -> &str {
        ""
    }

    /// JSON description of the accepted parameters.
    fn input_schema(&self) -> Value {
        Value::Object(Map::new())
    }

    /// JSON description of the produced value.
    fn output_schema(&self) -> Value {
        Value::Object(Map::new())
    }

    /// Runs the tool.
    async fn execute(&self, params: ToolParams) -> Result<Value, ToolError>;
}

/// Invokes tools by id.
///
/// Returns [`ToolError::NotFound`] for unknown ids and otherwise whatever
/// error the tool raises.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Looks up `tool_id` and runs it with `params`.
    async fn execute_tool(&self, tool_id: &str, params: ToolParams) -> Result<Value, ToolError>;
}
