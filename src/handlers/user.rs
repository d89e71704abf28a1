use crate::client::GitLab;
use crate::error::{ToolError, json_response};
use rmcp::model::CallToolResult;

/// The authenticated user, straight from `/user`. Takes no arguments.
pub async fn get_user(client: &dyn GitLab) -> Result<CallToolResult, ToolError> {
    let data = client.get("/user").await?;
    json_response(&data)
}
