use super::Query;
use crate::client::{GitLab, encode_path};
use crate::config::{Config, ProjectScope};
use crate::error::{ToolError, json_response, parse_args};
use rmcp::model::CallToolResult;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    pub search: Option<String>,
    pub visibility: Option<String>,
    pub owned: Option<bool>,
    pub simple: Option<bool>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetProjectParams {
    pub project_id: String,
}

pub async fn list_projects(
    client: &dyn GitLab,
    config: &Config,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ListProjectsParams = parse_args(args)?;
    let mut query = Query::new();

    query.append_opt("search", params.search);
    query.append_opt("visibility", params.visibility);

    // Config default is owned-only for privacy; an explicit owned=false wins.
    let show_owned = params.owned != Some(false) && config.project_scope() == ProjectScope::Owned;
    if show_owned {
        query.append("owned", "true");
    }

    // simple=true by default keeps the payload small; statistics are dropped
    // too unless full details were asked for.
    if params.simple != Some(false) {
        query.append("simple", "true");
        query.append("statistics", "false");
    }

    query.append("per_page", params.per_page.unwrap_or_else(|| config.per_page()));

    let data = client.get(&format!("/projects?{}", query.finish())).await?;
    json_response(&data)
}

pub async fn get_project(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: GetProjectParams = parse_args(args)?;
    let data = client
        .get(&format!("/projects/{}", encode_path(&params.project_id)))
        .await?;
    json_response(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockGitLab;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_projects_defaults_to_owned_and_simple() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([])));

        list_projects(&mock, &Config::default(), json!({}))
            .await
            .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["GET /projects?owned=true&simple=true&statistics=false&per_page=20"]
        );
    }

    #[tokio::test]
    async fn test_list_projects_explicit_flags_override_defaults() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([])));

        list_projects(
            &mock,
            &Config::default(),
            json!({"owned": false, "simple": false, "per_page": 5}),
        )
        .await
        .unwrap();

        assert_eq!(mock.recorded_calls(), vec!["GET /projects?per_page=5"]);
    }

    #[tokio::test]
    async fn test_get_project_encodes_namespaced_path() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"id": 7})));

        get_project(&mock, json!({"project_id": "group/app"}))
            .await
            .unwrap();

        assert_eq!(mock.recorded_calls(), vec!["GET /projects/group%2Fapp"]);
    }
}
