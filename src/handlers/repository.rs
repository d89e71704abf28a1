use super::Query;
use crate::client::{GitLab, encode_path};
use crate::error::{ToolError, json_response, parse_args};
use rmcp::model::CallToolResult;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ListProjectBranchesParams {
    pub project_id: String,
    pub search: Option<String>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetProjectCommitsParams {
    pub project_id: String,
    pub ref_name: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub author: Option<String>,
    pub path: Option<String>,
    pub all: Option<bool>,
    pub with_stats: Option<bool>,
    pub first_parent: Option<bool>,
    pub order: Option<String>,
    pub trailers: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetCommitParams {
    pub project_id: String,
    pub sha: String,
    pub stats: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GetCommitDiffParams {
    pub project_id: String,
    pub sha: String,
}

pub async fn list_project_branches(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ListProjectBranchesParams = parse_args(args)?;
    let mut query = Query::new();

    query.append_opt("search", params.search);
    query.append("per_page", params.per_page.unwrap_or(20));

    let data = client
        .get(&format!(
            "/projects/{}/repository/branches?{}",
            encode_path(&params.project_id),
            query.finish()
        ))
        .await?;
    json_response(&data)
}

pub async fn get_project_commits(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: GetProjectCommitsParams = parse_args(args)?;
    let mut query = Query::new();

    query.append_opt("ref_name", params.ref_name);
    query.append_opt("since", params.since);
    query.append_opt("until", params.until);
    query.append_opt("author", params.author);
    query.append_opt("path", params.path);
    query.append_opt("all", params.all);
    query.append_opt("with_stats", params.with_stats);
    query.append_opt("first_parent", params.first_parent);
    query.append_opt("order", params.order);
    query.append_opt("trailers", params.trailers);
    query.append_opt("page", params.page);
    query.append("per_page", params.per_page.unwrap_or(20));

    let data = client
        .get(&format!(
            "/projects/{}/repository/commits?{}",
            encode_path(&params.project_id),
            query.finish()
        ))
        .await?;
    json_response(&data)
}

pub async fn get_commit(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: GetCommitParams = parse_args(args)?;
    let mut query = Query::new();
    query.append_opt("stats", params.stats);

    let data = client
        .get(&format!(
            "/projects/{}/repository/commits/{}{}",
            encode_path(&params.project_id),
            encode_path(&params.sha),
            query.suffix()
        ))
        .await?;
    json_response(&data)
}

pub async fn get_commit_diff(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: GetCommitDiffParams = parse_args(args)?;
    let data = client
        .get(&format!(
            "/projects/{}/repository/commits/{}/diff",
            encode_path(&params.project_id),
            encode_path(&params.sha)
        ))
        .await?;
    json_response(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockGitLab;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_branches_with_search() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([])));

        list_project_branches(&mock, json!({"project_id": "group/app", "search": "fix"}))
            .await
            .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["GET /projects/group%2Fapp/repository/branches?search=fix&per_page=20"]
        );
    }

    #[tokio::test]
    async fn test_get_commit_without_stats_has_no_query() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"id": "abc123"})));

        get_commit(&mock, json!({"project_id": "1", "sha": "abc123"}))
            .await
            .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["GET /projects/1/repository/commits/abc123"]
        );
    }

    #[tokio::test]
    async fn test_get_commit_with_stats_flag() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"id": "abc123"})));

        get_commit(&mock, json!({"project_id": "1", "sha": "abc123", "stats": true}))
            .await
            .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["GET /projects/1/repository/commits/abc123?stats=true"]
        );
    }

    #[tokio::test]
    async fn test_get_commit_diff_path() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([])));

        get_commit_diff(&mock, json!({"project_id": "1", "sha": "abc123"}))
            .await
            .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["GET /projects/1/repository/commits/abc123/diff"]
        );
    }
}
