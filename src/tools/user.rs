use super::tool;
use rmcp::model::Tool;
use serde_json::json;

pub fn tools() -> Vec<Tool> {
    vec![tool(
        "get_user",
        "Get current user information",
        json!({
            "type": "object",
            "properties": {}
        }),
    )]
}
