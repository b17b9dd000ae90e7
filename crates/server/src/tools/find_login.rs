//! find_login tool implementation.
//!
//! Submits a domain query to the search controller and waits for it to
//! settle or be superseded by a newer query.

use findlogin_client::SearchController;
use findlogin_core::SearchState;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for find_login tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FindLoginParams {
    /// Domain to look up (e.g. "nytimes.com"). Sent as-is.
    pub domain: String,
}

/// Output structure for find_login tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindLoginOutput {
    /// Sequence number assigned to this query.
    pub generation: u64,
    /// True if a newer query replaced this one before it settled.
    pub superseded: bool,
    /// Search state at the time this call returned.
    pub state: SearchState,
}

/// Run a query to completion.
pub async fn find_login(controller: &SearchController, params: FindLoginParams) -> FindLoginOutput {
    let handle = controller.submit_query(params.domain);
    let generation = handle.generation();
    let state = controller.wait_for(generation).await;

    FindLoginOutput { generation, superseded: state.generation != generation, state }
}

/// Implementation of the find_login tool.
pub async fn find_login_impl(
    controller: &SearchController, params: FindLoginParams,
) -> Result<CallToolResult, McpError> {
    let output = find_login(controller, params).await;

    if let Some(failure) = &output.state.error
        && !output.superseded
    {
        tracing::debug!("find_login failed: {}", failure.message);
        return Ok(CallToolResult::error(vec![Content::text(
            serde_json::to_string_pretty(&output).unwrap_or_default(),
        )]));
    }

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
