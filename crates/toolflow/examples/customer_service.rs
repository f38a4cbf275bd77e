//! Customer service workflow with a failing response generator.
//!
//! Demonstrates:
//! - Registering closure tools
//! - Reading earlier step outputs through `previousResults`
//! - Retry on a flaky tool and fallback to human escalation
//!
//! Optional first argument: path to a TOML engine config.

use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use toolflow::prelude::*;
use toolflow::{logging, templates};

fn build_registry() -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();

    // Fails on the first call to exercise retry.
    let calls = Arc::new(AtomicU32::new(0));
    registry.register(
        FnTool::new("sentiment-analysis", "Sentiment Analysis", move |params| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    return Err(ToolError::execution(
                        "sentiment-analysis",
                        "model warming up",
                    ));
                }
                let inquiry = params["context"]["inquiry"].as_str().unwrap_or_default();
                let sentiment = if inquiry.contains("never") {
                    "negative"
                } else {
                    "neutral"
                };
                Ok(json!({ "sentiment": sentiment }))
            }
        })
        .with_description("Scores the tone of an inquiry"),
    )?;

    registry.register(FnTool::new(
        "issue-categorizer",
        "Issue Categorizer",
        |params| async move {
            let sentiment = params["previousResults"]["analyze-inquiry"]["sentiment"].clone();
            Ok(json!({ "category": "shipping", "sentiment": sentiment }))
        },
    ))?;

    registry.register(FnTool::new(
        "response-generator",
        "Response Generator",
        |_| async { Err(ToolError::execution("response-generator", "quota exceeded")) },
    ))?;

    registry.register(FnTool::new(
        "escalation-handler",
        "Escalation Handler",
        |params| async move {
            let category = params["previousResults"]["categorize-issue"]["category"].clone();
            Ok(json!({ "escalated": true, "queue": category }))
        },
    ))?;

    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };
    config.apply_env_overrides()?;
    logging::init(&config.logging)?;

    let engine = WorkflowEngine::builder()
        .tools(build_registry()?)
        .retry_config(config.retry_config()?)
        .build()?;
    println!(
        "Retrying flaky steps up to {} times",
        engine.retry_policy().config().max_attempts()
    );

    let workflow = templates::customer_service()?;
    let ctx = ExecutionContext::new().with("inquiry", "My package never arrived");

    match engine.execute_workflow(&workflow, &ctx).await {
        Ok(results) => {
            println!("Workflow '{}' completed", workflow.name());
            for (step_id, value) in results.iter() {
                println!("  {step_id}: {value}");
            }
        }
        Err(error) => {
            eprintln!("Workflow failed: {error}");
        }
    }

    Ok(())
}
