//! In-memory tool registry.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use toolflow_core::{Tool, ToolError, ToolExecutor, ToolParams};

/// Registry of tools keyed by id.
///
/// Built once and shared read-only with every engine that uses it.
///
/// # Examples
///
/// ```
/// use toolflow::{FnTool, ToolRegistry, ToolExecutor};
/// use serde_json::{json, Map};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), toolflow::ToolError> {
/// let mut registry = ToolRegistry::new();
/// registry.register(FnTool::new("echo", "Echo", |params| async move {
///     Ok(json!({ "echo": params }))
/// }))?;
///
/// let result = registry.execute_tool("echo", Map::new()).await?;
/// assert_eq!(result, json!({ "echo": {} }));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.tools.keys().collect();
        ids.sort();
        f.debug_struct("ToolRegistry").field("tools", &ids).finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any tool with the same id.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidDefinition`] if the id or name is empty, or a
    /// schema is not a JSON object.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), ToolError> {
        self.register_shared(Arc::new(tool))
    }

    /// Registers an already shared tool.
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        validate(tool.as_ref())?;
        self.tools.insert(tool.id().to_string(), tool);
        Ok(())
    }

    /// Looks up a tool by id.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .get(id)
            .cloned()
            .ok_or_else(|| ToolError::NotFound(id.to_string()))
    }

    /// Returns `true` if a tool with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    /// Returns all tools ordered by id.
    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<_> = self.tools.values().cloned().collect();
        tools.sort_by(|a, b| a.id().cmp(b.id()));
        tools
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn validate(tool: &dyn Tool) -> Result<(), ToolError> {
    if tool.id().trim().is_empty() {
        return Err(ToolError::InvalidDefinition(
            "tool id must not be empty".to_string(),
        ));
    }
    if tool.name().trim().is_empty() {
        return Err(ToolError::InvalidDefinition(format!(
            "tool '{}' must have a name",
            tool.id()
        )));
    }
    if !tool.input_schema().is_object() || !tool.output_schema().is_object() {
        return Err(ToolError::InvalidDefinition(format!(
            "tool '{}' schemas must be JSON objects",
            tool.id()
        )));
    }
    Ok(())
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute_tool(&self, tool_id: &str, params: ToolParams) -> Result<Value, ToolError> {
        let tool = self.get(tool_id)?;
        tool.execute(params).await
    }
}

type ToolFuture = Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send>>;
type Handler = Box<dyn Fn(ToolParams) -> ToolFuture + Send + Sync>;

/// A [`Tool`] backed by an async closure.
pub struct FnTool {
    id: String,
    name: String,
    description: String,
    handler: Handler,
}

impl FnTool {
    /// Wraps `handler` as a tool.
    pub fn new<F, Fut>(id: impl Into<String>, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ToolParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            handler: Box::new(move |params| Box::pin(handler(params))),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, params: ToolParams) -> Result<Value, ToolError> {
        (self.handler)(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use tokio_test::{assert_err, assert_ok};

    fn echo(id: &str) -> FnTool {
        FnTool::new(id, "Echo", |params| async move { Ok(Value::Object(params)) })
    }

    #[derive(Debug)]
    struct BadSchemaTool;

    #[async_trait]
    impl Tool for BadSchemaTool {
        fn id(&self) -> &str {
            "bad"
        }

        fn name(&self) -> &str {
            "Bad"
        }

        fn input_schema(&self) -> Value {
            json!("not an object")
        }

        async fn execute(&self, _params: ToolParams) -> Result<Value, ToolError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert_ok!(registry.register(echo("test-tool").with_description("A test tool")));

        let tool = registry.get("test-tool").unwrap();
        assert_eq!(tool.id(), "test-tool");
        assert_eq!(tool.description(), "A test tool");
        assert!(registry.contains("test-tool"));
    }

    #[test]
    fn test_get_missing_tool() {
        let registry = ToolRegistry::new();
        match registry.get("non-existent") {
            Err(ToolError::NotFound(id)) => assert_eq!(id, "non-existent"),
            other => panic!("Unexpected result: {:?}", other.map(|t| t.id().to_string())),
        }
    }

    #[test]
    fn test_validation() {
        let mut registry = ToolRegistry::new();
        assert_err!(registry.register(echo("  ")));
        assert_err!(registry.register(FnTool::new("nameless", "", |_| async {
            Ok(Value::Null)
        })));
        assert!(matches!(
            registry.register(BadSchemaTool),
            Err(ToolError::InvalidDefinition(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_sorted_and_replace() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("tool2")).unwrap();
        registry.register(echo("tool1")).unwrap();
        registry.register(echo("tool1")).unwrap();

        let ids: Vec<_> = registry.list().iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["tool1", "tool2"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_execute_tool_with_parameters() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("test-tool")).unwrap();

        let mut params = Map::new();
        params.insert("test".to_string(), json!("value"));
        let result = registry.execute_tool("test-tool", params).await.unwrap();
        assert_eq!(result, json!({ "test": "value" }));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry.execute_tool("ghost", Map::new()).await;
        assert_eq!(result, Err(ToolError::NotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_tool_error_passes_through() {
        let mut registry = ToolRegistry::new();
        registry
            .register(FnTool::new("broken", "Broken", |_| async {
                Err(ToolError::execution("broken", "exploded"))
            }))
            .unwrap();

        let result = registry.execute_tool("broken", Map::new()).await;
        assert_eq!(result, Err(ToolError::execution("broken", "exploded")));
    }
}
