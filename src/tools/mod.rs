//! Static tool registry. Each domain module declares its tools; the service
//! serves the concatenation unchanged on every `tools/list`.

use rmcp::model::Tool;
use serde_json::Value;
use std::sync::Arc;

pub mod issues;
pub mod jobs;
pub mod merge_requests;
pub mod pipelines;
pub mod projects;
pub mod repository;
pub mod user;

/// Build a `Tool` from a name, description, and a `json!` input schema.
pub(crate) fn tool(name: &'static str, description: &'static str, schema: Value) -> Tool {
    let schema = match schema {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    Tool::new(name, description, Arc::new(schema))
}

pub fn all_tools() -> Vec<Tool> {
    let mut tools = Vec::new();
    tools.extend(projects::tools());
    tools.extend(issues::tools());
    tools.extend(merge_requests::tools());
    tools.extend(repository::tools());
    tools.extend(pipelines::tools());
    tools.extend(jobs::tools());
    tools.extend(user::tools());
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_are_unique() {
        let tools = all_tools();
        let names: HashSet<_> = tools.iter().map(|t| t.name.clone()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_every_tool_declares_an_object_schema() {
        for tool in all_tools() {
            assert_eq!(
                tool.input_schema.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "tool {} lacks an object schema",
                tool.name
            );
        }
    }

    #[test]
    fn test_core_tools_present() {
        let tools = all_tools();
        for name in [
            "get_merge_request",
            "update_merge_request",
            "get_merge_request_diffs",
            "list_mr_discussions",
            "mark_mr_as_draft",
            "mark_mr_as_ready",
            "get_job_trace",
            "get_job_logs",
        ] {
            assert!(
                tools.iter().any(|t| t.name == name),
                "missing tool {name}"
            );
        }
    }
}
