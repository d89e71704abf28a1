use super::tool;
use rmcp::model::Tool;
use serde_json::json;

pub fn tools() -> Vec<Tool> {
    vec![
        tool(
            "list_projects",
            "List GitLab projects with minimal info by default (to reduce token usage). \
             Use simple=false for full project details when needed.",
            json!({
                "type": "object",
                "properties": {
                    "search": {
                        "type": "string",
                        "description": "Search projects by name"
                    },
                    "visibility": {
                        "type": "string",
                        "enum": ["public", "internal", "private"],
                        "description": "Filter by visibility level"
                    },
                    "owned": {
                        "type": "boolean",
                        "description": "Show only owned projects (default: true for privacy)",
                        "default": true
                    },
                    "per_page": {
                        "type": "number",
                        "description": "Number of results per page (max 100)",
                        "maximum": 100,
                        "default": 20
                    },
                    "simple": {
                        "type": "boolean",
                        "description": "Use simplified project info to reduce response size (default: true). Set to false for full project details.",
                        "default": true
                    }
                }
            }),
        ),
        tool(
            "get_project",
            "Get details of a specific project",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path (e.g., \"1\" or \"group/project\")"
                    }
                },
                "required": ["project_id"]
            }),
        ),
    ]
}
