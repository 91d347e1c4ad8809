//! Tool trait and the immutable registry the agent dispatches through.

use crate::error::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

/// A named local function the model may ask to run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used in `Action: <name>: ...` lines.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str {
        ""
    }

    /// Example argument shown to the model, e.g. `Salt Lake City`.
    fn example(&self) -> Option<&str> {
        None
    }

    /// Run the tool. The result is serialized to JSON for the observation.
    async fn call(&self, argument: &str) -> Result<Value>;
}

type Handler = Box<dyn Fn(String) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Tool backed by a closure.
pub struct FnTool {
    name: String,
    description: String,
    example: Option<String>,
    handler: Handler,
}

impl FnTool {
    pub fn new<F, Fut>(name: &str, description: &str, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            example: None,
            handler: Box::new(move |argument| handler(argument).boxed()),
        }
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    async fn call(&self, argument: &str) -> Result<Value> {
        (self.handler)(argument.to_string()).await
    }
}

/// Fixed mapping from tool name to tool.
///
/// Built once through [`ToolRegistryBuilder`]; there is no way to add or
/// remove tools afterwards. Cloning shares the underlying tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Tool names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Render the tool list for the system prompt.
    pub fn catalog(&self) -> String {
        let mut out = String::new();
        for tool in self.tools.values() {
            out.push_str(&format!("- {}:\n", tool.name()));
            if let Some(example) = tool.example() {
                out.push_str(&format!("    E.g. {}: {}\n", tool.name(), example));
            }
            if !tool.description().is_empty() {
                out.push_str(&format!("    {}\n", tool.description()));
            }
        }
        out
    }
}

/// Collects tools before freezing them into a [`ToolRegistry`].
///
/// A later tool with the same name replaces the earlier one.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    pub fn tool(self, tool: impl Tool + 'static) -> Self {
        self.shared(Arc::new(tool))
    }

    pub fn shared(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    /// Register a closure as a tool.
    pub fn function<F, Fut>(self, name: &str, description: &str, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.tool(FnTool::new(name, description, handler))
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}
