//! MCP server handler
//!
//! Implements the MCP protocol handler for GitLab tools.

use crate::auth::create_auth_provider;
use crate::config::AppConfig;
use crate::error::Result as AppResult;
use crate::error::mcp_mapper::{is_protocol_error, map_tool_error};
use crate::gitlab::GitLabClient;
use crate::tools::{ContentBlock, ToolContext, ToolOutput, ToolRegistry, definitions};
use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeResult,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, Tool,
    ToolsCapability,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// GitLab MCP server handler
#[derive(Clone)]
pub struct GitLabMcpHandler {
    /// Server name for MCP
    name: String,
    /// Server version
    version: String,
    /// Instructions sent on initialize
    instructions: String,
    /// Tool registry
    registry: Arc<ToolRegistry>,
    /// GitLab client
    gitlab: Arc<GitLabClient>,
}

impl GitLabMcpHandler {
    /// Build the auth provider, client and handler from configuration
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let auth = create_auth_provider(&config.gitlab)?;
        let gitlab = GitLabClient::new(&config.gitlab, auth)?;
        Ok(Self::new(config, gitlab))
    }

    /// Create a new handler from configuration
    pub fn new(config: &AppConfig, gitlab: GitLabClient) -> Self {
        Self::new_with_shared(config, Arc::new(gitlab))
    }

    /// Create a new handler around an already shared client
    pub fn new_with_shared(config: &AppConfig, gitlab: Arc<GitLabClient>) -> Self {
        let mut registry = ToolRegistry::new();
        definitions::register_all_tools(&mut registry);

        info!(tools = registry.len(), "Initialized GitLab MCP handler");

        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            instructions: config.server.instructions.clone(),
            registry: Arc::new(registry),
            gitlab,
        }
    }

    /// Get the number of registered tools
    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    fn create_context(&self, request_id: &str) -> ToolContext {
        ToolContext::new(self.gitlab.clone(), request_id)
    }

    /// Convert internal tool output to MCP result
    fn to_mcp_result(output: ToolOutput) -> CallToolResult {
        let content = output
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Content::text(text),
            })
            .collect();

        CallToolResult {
            content,
            is_error: Some(output.is_error),
            meta: None,
            structured_content: None,
        }
    }

    /// Convert registry tools to MCP tool definitions
    pub fn mcp_tools(&self) -> Vec<Tool> {
        self.registry
            .tools()
            .map(|tool| {
                let schema_value = serde_json::to_value(&tool.input_schema)
                    .unwrap_or_else(|_| serde_json::json!({}));

                let mut input_schema: Map<String, Value> = Map::new();
                input_schema.insert("type".to_string(), Value::String("object".to_string()));

                // `$defs` holds the enums and nested structs that properties `$ref`
                for key in ["properties", "required", "$defs"] {
                    if let Some(value) = schema_value.get(key) {
                        input_schema.insert(key.to_string(), value.clone());
                    }
                }

                Tool {
                    name: Cow::Borrowed(tool.name),
                    description: Some(Cow::Borrowed(tool.description)),
                    input_schema: Arc::new(input_schema),
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: Some(tool.title.to_string()),
                }
            })
            .collect()
    }

    /// Execute a tool call
    ///
    /// Unknown tools and undecodable arguments are protocol errors; anything that
    /// goes wrong while the tool runs comes back as a result with `is_error` set.
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        // Generate a request ID for tracing
        let request_id = format!("{:x}", rand::random::<u64>());
        let ctx = self.create_context(&request_id);

        let args = arguments
            .map(Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));

        match self.registry.execute(name, &ctx, args).await {
            Ok(output) => {
                if output.is_error {
                    warn!(tool = name, request_id = %request_id, "Tool reported an error");
                }
                Ok(Self::to_mcp_result(output))
            }
            Err(e) if is_protocol_error(&e) => {
                warn!(tool = name, error = %e, "Rejected tool call");
                Err(map_tool_error(&e))
            }
            Err(e) => {
                let mapped = map_tool_error(&e);
                error!(
                    tool = name,
                    request_id = %request_id,
                    error = %e,
                    data = ?mapped.data,
                    "Tool execution failed"
                );
                Ok(Self::to_mcp_result(ToolOutput::error(format!("Error: {}", e))))
            }
        }
    }
}

impl ServerHandler for GitLabMcpHandler {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(self.instructions.clone()),
        }
    }

    #[instrument(skip(self, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        async move {
            Ok(ListToolsResult {
                tools: self.mcp_tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        debug!(?request.arguments, "Calling tool");
        async move { self.execute_tool(&request.name, request.arguments).await }
    }
}
