//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::find_login::{FindLoginParams, find_login_impl};
use crate::tools::search_state::search_state_impl;

use findlogin_client::SearchController;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for findlogin.
///
/// One controller backs the whole session, so overlapping `find_login`
/// calls supersede each other the same way fast typing does in a search box.
#[derive(Clone)]
pub struct FindLoginServer {
    controller: SearchController,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FindLoginServer {
    /// Create a new server handler.
    pub fn new(controller: SearchController) -> Self {
        Self { controller, tool_router: Self::tool_router() }
    }

    /// Look up shared logins for a domain.
    #[tool(
        description = "Look up publicly shared logins for a domain. Returns login, password and success rate for each entry, in page order."
    )]
    async fn find_login(&self, params: Parameters<FindLoginParams>) -> Result<CallToolResult, McpError> {
        find_login_impl(&self.controller, params.0).await
    }

    /// Report the current search state.
    #[tool(description = "Return the current search state (loading flag, results and error of the latest query).")]
    async fn search_state(&self) -> Result<CallToolResult, McpError> {
        search_state_impl(&self.controller).await
    }
}

impl ServerHandler for FindLoginServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "findlogin".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
