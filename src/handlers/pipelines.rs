use super::Query;
use crate::client::{GitLab, encode_path};
use crate::error::{ToolError, json_response, parse_args, text_response};
use rmcp::model::CallToolResult;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct ListPipelinesParams {
    pub project_id: String,
    pub status: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub sha: Option<String>,
    pub yaml_errors: Option<bool>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PipelineRefParams {
    pub project_id: String,
    pub pipeline_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct PipelineVariable {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePipelineParams {
    pub project_id: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub variables: Option<Vec<PipelineVariable>>,
}

pub async fn list_pipelines(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: ListPipelinesParams = parse_args(args)?;
    let mut query = Query::new();

    query.append_opt("status", params.status);
    query.append_opt("ref", params.git_ref);
    query.append_opt("sha", params.sha);
    query.append_opt("yaml_errors", params.yaml_errors);
    query.append_opt("name", params.name);
    query.append_opt("username", params.username);
    query.append_opt("updated_after", params.updated_after);
    query.append_opt("updated_before", params.updated_before);
    query.append_opt("order_by", params.order_by);
    query.append_opt("sort", params.sort);
    query.append("per_page", params.per_page.unwrap_or(20));

    let data = client
        .get(&format!(
            "/projects/{}/pipelines?{}",
            encode_path(&params.project_id),
            query.finish()
        ))
        .await?;
    json_response(&data)
}

pub async fn get_pipeline(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: PipelineRefParams = parse_args(args)?;
    let data = client
        .get(&format!(
            "/projects/{}/pipelines/{}",
            encode_path(&params.project_id),
            params.pipeline_id
        ))
        .await?;
    json_response(&data)
}

pub async fn create_pipeline(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: CreatePipelineParams = parse_args(args)?;

    let mut body = serde_json::Map::new();
    body.insert("ref".into(), json!(params.git_ref));
    if let Some(variables) = params.variables
        && !variables.is_empty()
    {
        let variables: Vec<Value> = variables
            .iter()
            .map(|v| json!({"key": v.key, "value": v.value}))
            .collect();
        body.insert("variables".into(), Value::Array(variables));
    }

    // Singular /pipeline is the creation endpoint; the plural form is
    // read-only.
    let data = client
        .post(
            &format!("/projects/{}/pipeline", encode_path(&params.project_id)),
            Some(Value::Object(body)),
        )
        .await?;
    json_response(&data)
}

pub async fn retry_pipeline(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: PipelineRefParams = parse_args(args)?;
    let data = client
        .post(
            &format!(
                "/projects/{}/pipelines/{}/retry",
                encode_path(&params.project_id),
                params.pipeline_id
            ),
            None,
        )
        .await?;
    json_response(&data)
}

pub async fn cancel_pipeline(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: PipelineRefParams = parse_args(args)?;
    let data = client
        .post(
            &format!(
                "/projects/{}/pipelines/{}/cancel",
                encode_path(&params.project_id),
                params.pipeline_id
            ),
            None,
        )
        .await?;
    json_response(&data)
}

pub async fn delete_pipeline(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: PipelineRefParams = parse_args(args)?;
    let (status, body) = client
        .delete(&format!(
            "/projects/{}/pipelines/{}",
            encode_path(&params.project_id),
            params.pipeline_id
        ))
        .await?;

    if status == 204 {
        return Ok(text_response("Pipeline deleted successfully"));
    }
    json_response(&body.unwrap_or(Value::Null))
}

pub async fn get_pipeline_variables(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: PipelineRefParams = parse_args(args)?;
    let data = client
        .get(&format!(
            "/projects/{}/pipelines/{}/variables",
            encode_path(&params.project_id),
            params.pipeline_id
        ))
        .await?;
    json_response(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockGitLab;

    #[tokio::test]
    async fn test_list_pipelines_maps_ref_filter() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([])));

        list_pipelines(
            &mock,
            json!({"project_id": "group/app", "ref": "main", "status": "failed"}),
        )
        .await
        .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["GET /projects/group%2Fapp/pipelines?status=failed&ref=main&per_page=20"]
        );
    }

    #[tokio::test]
    async fn test_create_pipeline_posts_to_singular_endpoint() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"id": 1})));

        create_pipeline(
            &mock,
            json!({
                "project_id": "1",
                "ref": "main",
                "variables": [{"key": "DEPLOY", "value": "true"}],
            }),
        )
        .await
        .unwrap();

        assert_eq!(mock.recorded_calls(), vec!["POST /projects/1/pipeline"]);
    }

    #[tokio::test]
    async fn test_delete_pipeline_reports_success_on_204() {
        let mock = MockGitLab::new();

        let result = delete_pipeline(&mock, json!({"project_id": "1", "pipeline_id": 9}))
            .await
            .unwrap();

        assert_eq!(mock.recorded_calls(), vec!["DELETE /projects/1/pipelines/9"]);
        assert_eq!(
            result.content[0].as_text().unwrap().text,
            "Pipeline deleted successfully"
        );
    }

    #[tokio::test]
    async fn test_retry_pipeline_posts_without_body() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"id": 9, "status": "pending"})));

        retry_pipeline(&mock, json!({"project_id": "1", "pipeline_id": 9}))
            .await
            .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["POST /projects/1/pipelines/9/retry"]
        );
    }
}
