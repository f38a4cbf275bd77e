//! Ready-made workflow definitions.

use serde_json::json;
use toolflow_core::{Workflow, WorkflowError, WorkflowStep};

/// Customer inquiry handling.
///
/// `analyze-inquiry` (retried) -> `categorize-issue` -> `generate-response`,
/// which falls back to `human-escalation` when response generation fails.
///
/// Tools expected in the registry: `sentiment-analysis`,
/// `issue-categorizer`, `response-generator`, `escalation-handler`.
pub fn customer_service() -> Result<Workflow, WorkflowError> {
    Workflow::builder("customer-service", "Customer Service Automation")
        .description("Automates customer inquiry handling and resolution")
        .step(
            WorkflowStep::new("analyze-inquiry", "Analyze Customer Inquiry", "sentiment-analysis")
                .param("inquiry", json!("{{context.inquiry}}"))
                .retry(),
        )
        .step(
            WorkflowStep::new("categorize-issue", "Categorize Issue", "issue-categorizer")
                .depends_on("analyze-inquiry"),
        )
        .step(
            WorkflowStep::new("generate-response", "Generate Response", "response-generator")
                .depends_on("categorize-issue")
                .fallback("human-escalation"),
        )
        .step(WorkflowStep::new(
            "human-escalation",
            "Escalate to Human Agent",
            "escalation-handler",
        ))
        .build()
}
