use rmcp::{
    handler::server::ServerHandler,
    model::*,
    ErrorData as McpError,
    service::{RequestContext, RoleServer},
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::provider::{ProviderError, Tool as CatalogTool, ToolType};
use crate::core::registry::ProviderRegistry;

/// Huddle01Engine is the MCP ServerHandler exposed to agents.
///
/// It owns no tool logic itself: listing comes from the registry's static
/// catalog and every call is forwarded to the provider owning the namespace.
/// Provider failures are returned as ordinary tool output (`{"error": ...}`),
/// so only an unknown tool name surfaces as a protocol error.
#[derive(Clone)]
pub struct Huddle01Engine {
    registry: Arc<ProviderRegistry>,
}

impl Huddle01Engine {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// The catalog in MCP form.
    pub fn mcp_tools(&self) -> Vec<Tool> {
        self.registry.list_tools().into_iter().map(to_mcp_tool).collect()
    }

    /// Run one tool and collapse its outcome into the uniform payload.
    pub async fn tool_payload(&self, name: &str, arguments: Value) -> Result<Value, McpError> {
        let call_id = Uuid::new_v4();
        tracing::info!(tool = %name, call_id = %call_id, "Dispatching tool call");

        match self.registry.call_tool(name, arguments).await {
            Ok(payload) => {
                tracing::debug!(tool = %name, call_id = %call_id, "Tool call succeeded");
                Ok(payload)
            }
            Err(ProviderError::Api(e)) => {
                tracing::warn!(tool = %name, call_id = %call_id, error = %e, "Tool call returned an error record");
                Ok(e.to_payload())
            }
            Err(ProviderError::NotFound(_)) => {
                tracing::warn!(tool = %name, call_id = %call_id, "Unknown tool requested");
                Err(McpError {
                    code: ErrorCode::METHOD_NOT_FOUND,
                    message: format!("Unknown tool: {name}").into(),
                    data: None,
                })
            }
        }
    }

    pub async fn dispatch(&self, request: CallToolRequestParams) -> Result<CallToolResult, McpError> {
        let arguments = match request.arguments {
            Some(map) => Value::Object(map),
            None => serde_json::json!({}),
        };
        let payload = self.tool_payload(request.name.as_ref(), arguments).await?;
        // Structured content must be an object; list bodies go out as text only.
        if payload.is_object() {
            Ok(CallToolResult::structured(payload))
        } else {
            Ok(CallToolResult::success(vec![Content::text(payload.to_string())]))
        }
    }
}

fn to_mcp_tool(tool: CatalogTool) -> Tool {
    let input_schema = match tool.input_schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    let read_only = tool.tool_type == ToolType::Observable;
    Tool {
        name: tool.name.into(),
        title: None,
        description: Some(tool.description.into()),
        input_schema: Arc::new(input_schema),
        output_schema: None,
        annotations: Some(ToolAnnotations::new().read_only(read_only).open_world(true)),
        icons: None,
        meta: None,
        execution: None,
    }
}

#[allow(clippy::manual_async_fn)]
impl ServerHandler for Huddle01Engine {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "Huddle01_MCP".to_string(),
                title: Some("Huddle01 MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some("Huddle01 room, meeting, recording and analytics APIs as MCP tools".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage Huddle01 rooms, meetings, participants, access tokens, recordings and analytics. \
                 Failed calls return an object with an `error` key and, for HTTP failures, `status_code`."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async {
            Ok(ListToolsResult {
                tools: self.mcp_tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.dispatch(request).await }
    }
}
