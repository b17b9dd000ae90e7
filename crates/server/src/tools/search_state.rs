//! search_state tool implementation.

use findlogin_client::SearchController;
use rmcp::{ErrorData as McpError, model::*};

/// Implementation of the search_state tool: report the current snapshot without submitting anything.
pub async fn search_state_impl(controller: &SearchController) -> Result<CallToolResult, McpError> {
    let state = controller.state();
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&state).unwrap_or_default(),
    )]))
}
