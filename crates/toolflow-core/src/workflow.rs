//! Workflow definitions.

use crate::error::WorkflowError;
use crate::step::{StepId, WorkflowStep};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An immutable, validated set of steps.
///
/// Step ids are unique. The step list keeps the order it was declared in;
/// execution order is derived from `depends_on` by the resolver.
///
/// # Examples
///
/// ```
/// use toolflow_core::{Workflow, WorkflowStep};
///
/// let workflow = Workflow::builder("greeting", "Greeting")
///     .description("Says hello")
///     .step(WorkflowStep::new("compose", "Compose", "composer"))
///     .step(WorkflowStep::new("send", "Send", "mailer").depends_on("compose"))
///     .build()?;
///
/// assert_eq!(workflow.steps().len(), 2);
/// assert!(workflow.step("send").is_some());
/// # Ok::<(), toolflow_core::WorkflowError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkflowDefinition", into = "WorkflowDefinition")]
pub struct Workflow {
    id: String,
    name: String,
    description: String,
    steps: Vec<WorkflowStep>,
}

/// Unvalidated, serialisable shape of a [`Workflow`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Workflow id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Declared steps.
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl Workflow {
    /// Creates a workflow, rejecting duplicate step ids.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        steps: Vec<WorkflowStep>,
    ) -> Result<Self, WorkflowError> {
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(WorkflowError::DuplicateStep(step.id.clone()));
            }
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            steps,
        })
    }

    /// Creates a new workflow builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> WorkflowBuilder {
        WorkflowBuilder::new(id, name)
    }

    /// Parses and validates a JSON workflow definition.
    pub fn from_json(json: &str) -> Result<Self, WorkflowError> {
        serde_json::from_str(json).map_err(|e| WorkflowError::Configuration(e.to_string()))
    }

    /// Returns the workflow id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the steps in declaration order.
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Looks up a step by id.
    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == id)
    }
}

impl TryFrom<WorkflowDefinition> for Workflow {
    type Error = WorkflowError;

    fn try_from(def: WorkflowDefinition) -> Result<Self, Self::Error> {
        Workflow::new(def.id, def.name, def.description, def.steps)
    }
}

impl From<Workflow> for WorkflowDefinition {
    fn from(workflow: Workflow) -> Self {
        Self {
            id: workflow.id,
            name: workflow.name,
            description: workflow.description,
            steps: workflow.steps,
        }
    }
}

/// Builder for constructing [`Workflow`] instances.
#[derive(Debug)]
pub struct WorkflowBuilder {
    id: String,
    name: String,
    description: String,
    steps: Vec<WorkflowStep>,
}

impl WorkflowBuilder {
    /// Creates a builder with no steps.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a step.
    pub fn step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Builds the workflow.
    pub fn build(self) -> Result<Workflow, WorkflowError> {
        if self.id.is_empty() {
            return Err(WorkflowError::Configuration(
                "Workflow id must not be empty".to_string(),
            ));
        }
        Workflow::new(self.id, self.name, self.description, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let workflow = Workflow::builder("wf", "Workflow")
            .step(WorkflowStep::new("b", "B", "tool").depends_on("a"))
            .step(WorkflowStep::new("a", "A", "tool"))
            .build()
            .unwrap();

        let ids: Vec<_> = workflow.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(workflow.description(), "");
    }

    #[test]
    fn test_duplicate_step_rejected() {
        let result = Workflow::builder("wf", "Workflow")
            .step(WorkflowStep::new("a", "A", "tool"))
            .step(WorkflowStep::new("a", "A again", "tool"))
            .build();

        match result {
            Err(WorkflowError::DuplicateStep(id)) => assert_eq!(id, "a"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = Workflow::builder("", "Nameless").build();
        assert!(matches!(result, Err(WorkflowError::Configuration(_))));
    }

    #[test]
    fn test_from_json() {
        let workflow = Workflow::from_json(
            r#"{
                "id": "customer-service",
                "name": "Customer Service Automation",
                "steps": [
                    { "id": "analyze", "name": "Analyze", "toolId": "sentiment", "params": {},
                      "onError": { "retry": true } },
                    { "id": "reply", "name": "Reply", "toolId": "writer", "params": {},
                      "dependsOn": ["analyze"] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(workflow.id(), "customer-service");
        assert_eq!(workflow.name(), "Customer Service Automation");
        assert!(workflow.step("analyze").unwrap().retries());
        assert!(workflow.step("missing").is_none());
    }

    #[test]
    fn test_from_json_validates_ids() {
        let result = Workflow::from_json(
            r#"{ "id": "wf", "name": "wf", "steps": [
                { "id": "a", "name": "A", "toolId": "t" },
                { "id": "a", "name": "A", "toolId": "t" }
            ] }"#,
        );

        match result {
            Err(WorkflowError::Configuration(msg)) => {
                assert!(msg.contains("Duplicate step id: a"), "{msg}")
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let workflow = Workflow::builder("wf", "Workflow")
            .step(WorkflowStep::new("a", "A", "tool").fallback("b"))
            .step(WorkflowStep::new("b", "B", "tool"))
            .build()
            .unwrap();

        let value = serde_json::to_value(&workflow).unwrap();
        assert_eq!(value["steps"][0]["toolId"], "tool");
        assert_eq!(value["steps"][0]["onError"]["fallback"], "b");
        assert!(value["steps"][1].get("onError").is_none());
    }
}
