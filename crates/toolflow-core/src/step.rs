//! Step definitions and related types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Type-safe step identifier wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Creates a new StepId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the step id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StepId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StepId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// What the engine does when a step's tool call fails.
///
/// Retry runs first (bounded by the engine's retry configuration), then the
/// fallback step is substituted. Without either, the failure aborts the
/// workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPolicy {
    /// Re-invoke the tool with backoff before giving up.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retry: bool,
    /// Step whose output replaces this step's output on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<StepId>,
}

/// A single unit of work bound to one tool invocation.
///
/// # Examples
///
/// ```
/// use toolflow_core::WorkflowStep;
/// use serde_json::json;
///
/// let step = WorkflowStep::new("generate-response", "Generate Response", "response-generator")
///     .param("tone", json!("friendly"))
///     .depends_on("categorize-issue")
///     .fallback("human-escalation");
///
/// assert_eq!(step.id.as_str(), "generate-response");
/// assert_eq!(step.depends_on.len(), 1);
/// assert!(step.fallback_id().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    /// Unique key within the workflow.
    pub id: StepId,
    /// Display name.
    pub name: String,
    /// Registered tool that performs the work.
    pub tool_id: String,
    /// Tool parameters declared by the step.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Prerequisite steps. Ids that match no step are ignored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<StepId>,
    /// Failure handling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<ErrorPolicy>,
}

impl WorkflowStep {
    /// Creates a step with no parameters, dependencies or error policy.
    pub fn new(id: impl Into<StepId>, name: impl Into<String>, tool_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tool_id: tool_id.into(),
            params: Map::new(),
            depends_on: Vec::new(),
            on_error: None,
        }
    }

    /// Adds a tool parameter.
    pub fn param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Adds a prerequisite step.
    pub fn depends_on(mut self, id: impl Into<StepId>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    /// Enables retry with backoff for this step.
    pub fn retry(mut self) -> Self {
        self.on_error.get_or_insert_with(ErrorPolicy::default).retry = true;
        self
    }

    /// Sets the fallback step.
    pub fn fallback(mut self, id: impl Into<StepId>) -> Self {
        self.on_error.get_or_insert_with(ErrorPolicy::default).fallback = Some(id.into());
        self
    }

    /// Returns `true` if the step asks to be retried.
    pub fn retries(&self) -> bool {
        self.on_error.as_ref().is_some_and(|p| p.retry)
    }

    /// Returns the declared fallback step, if any.
    pub fn fallback_id(&self) -> Option<&StepId> {
        self.on_error.as_ref().and_then(|p| p.fallback.as_ref())
    }
}
