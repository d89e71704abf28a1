use super::tool;
use rmcp::model::Tool;
use serde_json::json;

pub fn tools() -> Vec<Tool> {
    vec![
        tool(
            "list_pipeline_jobs",
            "List jobs in a pipeline",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "pipeline_id": {
                        "type": "number",
                        "description": "Pipeline ID"
                    },
                    "scope": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["created", "pending", "running", "failed", "success", "canceled", "skipped", "waiting_for_resource", "manual"]
                        },
                        "description": "Filter jobs by status"
                    },
                    "include_retried": {
                        "type": "boolean",
                        "description": "Include retried jobs",
                        "default": false
                    }
                },
                "required": ["project_id", "pipeline_id"]
            }),
        ),
        tool(
            "get_job_logs",
            "Get the log (trace) file of a specific job",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "job_id": {
                        "type": "number",
                        "description": "Job ID"
                    }
                },
                "required": ["project_id", "job_id"]
            }),
        ),
        tool(
            "get_job_trace",
            "Get job trace with options for partial logs, tail mode, and line limits",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "job_id": {
                        "type": "number",
                        "description": "Job ID"
                    },
                    "lines_limit": {
                        "type": "number",
                        "description": "Maximum number of lines to return (default: 1000)",
                        "default": 1000
                    },
                    "tail": {
                        "type": "boolean",
                        "description": "Get the last N lines instead of first N lines",
                        "default": false
                    },
                    "raw": {
                        "type": "boolean",
                        "description": "Return raw log without formatting",
                        "default": false
                    }
                },
                "required": ["project_id", "job_id"]
            }),
        ),
    ]
}
