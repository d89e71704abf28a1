use super::Query;
use crate::client::{GitLab, encode_path};
use crate::error::{ToolError, json_response, parse_args};
use rmcp::model::CallToolResult;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct ListIssuesParams {
    pub project_id: String,
    pub state: Option<String>,
    pub labels: Option<String>,
    pub assignee_id: Option<u64>,
    pub author_id: Option<u64>,
    pub search: Option<String>,
    pub scope: Option<String>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetIssueParams {
    pub project_id: String,
    pub issue_iid: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateIssueParams {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub labels: Option<String>,
    pub assignee_ids: Option<Vec<u64>>,
    pub milestone_id: Option<u64>,
}

pub async fn list_issues(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: ListIssuesParams = parse_args(args)?;
    let mut query = Query::new();

    query.append_opt("state", params.state);
    query.append_opt("labels", params.labels);
    query.append_opt("assignee_id", params.assignee_id);
    query.append_opt("author_id", params.author_id);
    query.append_opt("search", params.search);
    // scope is only sent when the caller asked for one
    query.append_opt("scope", params.scope);
    query.append("per_page", params.per_page.unwrap_or(20));

    let data = client
        .get(&format!(
            "/projects/{}/issues?{}",
            encode_path(&params.project_id),
            query.finish()
        ))
        .await?;
    json_response(&data)
}

pub async fn get_issue(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: GetIssueParams = parse_args(args)?;
    let data = client
        .get(&format!(
            "/projects/{}/issues/{}",
            encode_path(&params.project_id),
            params.issue_iid
        ))
        .await?;
    json_response(&data)
}

pub async fn create_issue(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: CreateIssueParams = parse_args(args)?;

    let mut body = serde_json::Map::new();
    body.insert("title".into(), json!(params.title));
    if let Some(description) = params.description {
        body.insert("description".into(), json!(description));
    }
    if let Some(labels) = params.labels {
        body.insert("labels".into(), json!(labels));
    }
    if let Some(assignee_ids) = params.assignee_ids {
        body.insert("assignee_ids".into(), json!(assignee_ids));
    }
    if let Some(milestone_id) = params.milestone_id {
        body.insert("milestone_id".into(), json!(milestone_id));
    }

    let data = client
        .post(
            &format!("/projects/{}/issues", encode_path(&params.project_id)),
            Some(Value::Object(body)),
        )
        .await?;
    json_response(&data)
}
