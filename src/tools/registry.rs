//! Tool registry
//!
//! Manages the collection of available tools and their metadata.

use crate::error::ToolError;
use crate::tools::executor::ToolInfo;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
// async_trait required for dyn-compatibility with Box<dyn ToolHandler>
use async_trait::async_trait;
use schemars::Schema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// A registered tool with all its metadata
pub struct RegisteredTool {
    /// Tool name
    pub name: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// Tool description
    pub description: &'static str,
    /// JSON Schema for the tool's input
    pub input_schema: Schema,
    /// The tool handler
    handler: Box<dyn ToolHandler>,
}

/// Internal trait for type-erased tool handling
#[async_trait]
trait ToolHandler: Send + Sync {
    /// Execute the tool with raw JSON arguments
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError>;
}

/// Generic tool handler implementation
struct TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T> ToolHandler for TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + Send + Sync + 'static,
{
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError> {
        // Deserialize arguments into the tool struct
        let tool: T = serde_json::from_value(args).map_err(|e| {
            ToolError::InvalidArguments(format!("Failed to parse arguments: {}", e))
        })?;

        tool.execute(ctx).await
    }
}

/// Tool registry
///
/// Listing order is registration order.
pub struct ToolRegistry {
    tools: HashMap<&'static str, RegisteredTool>,
    order: Vec<&'static str>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool
    ///
    /// Registering a name twice replaces the earlier tool in place.
    pub fn register<T>(&mut self)
    where
        T: ToolExecutor
            + DeserializeOwned
            + schemars::JsonSchema
            + ToolInfo
            + Send
            + Sync
            + 'static,
    {
        let name = <T as ToolInfo>::name();

        let tool = RegisteredTool {
            name,
            title: <T as ToolInfo>::title(),
            description: <T as ToolInfo>::description(),
            input_schema: schemars::schema_for!(T),
            handler: Box::new(TypedToolHandler::<T>::new()),
        };

        if self.tools.insert(name, tool).is_some() {
            warn!(name, "Tool registered twice, keeping the latest definition");
        } else {
            self.order.push(name);
        }

        debug!(name, "Registered tool");
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Get all tool names
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().copied()
    }

    /// Get all tools
    pub fn tools(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    #[instrument(skip(self, ctx, args), fields(tool = %name, request_id = %ctx.request_id))]
    pub async fn execute(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: Value,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let result = tool.handler.call(ctx, args).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(output) => debug!(elapsed_ms, is_error = output.is_error, "Tool finished"),
            Err(e) => debug!(elapsed_ms, error = %e, "Tool failed"),
        }

        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
