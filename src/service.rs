use crate::{
    client::{GitLab, GitLabClient},
    config::Config,
    error::ToolError,
    handlers, tools,
};
use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
};
use serde_json::Value;
use std::{ops::Deref, sync::Arc};

pub struct GitLabServiceInner {
    config: Config,
    client: Arc<dyn GitLab>,
}

pub struct GitLabService(Arc<GitLabServiceInner>);

impl Clone for GitLabService {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl Deref for GitLabService {
    type Target = Arc<GitLabServiceInner>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl GitLabService {
    pub fn new(config: &Config) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            anyhow::bail!("Invalid configuration: {}", errors.join("; "));
        }
        let token = config
            .gitlab
            .token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No GitLab token configured; set GITLAB_TOKEN"))?;

        let client = GitLabClient::new(config.base_url(), token, config.timeout())?;
        tracing::info!("Connected to GitLab at {}", config.base_url());
        Ok(Self::with_client(config.clone(), Arc::new(client)))
    }

    pub fn with_client(config: Config, client: Arc<dyn GitLab>) -> Self {
        Self(Arc::new(GitLabServiceInner { config, client }))
    }

    /// Route one tool invocation to its handler. Handler failures come back
    /// as `ToolError` and are turned into error-flagged responses by the
    /// caller; this function only fails for tools that do not exist.
    async fn dispatch(&self, name: &str, args: Value) -> Result<CallToolResult, ToolError> {
        let client = self.client.as_ref();
        match name {
            "list_projects" => handlers::projects::list_projects(client, &self.config, args).await,
            "get_project" => handlers::projects::get_project(client, args).await,

            "list_issues" => handlers::issues::list_issues(client, args).await,
            "get_issue" => handlers::issues::get_issue(client, args).await,
            "create_issue" => handlers::issues::create_issue(client, args).await,

            "list_merge_requests" => {
                handlers::merge_requests::list_merge_requests(client, args).await
            }
            "get_merge_request" => handlers::merge_requests::get_merge_request(client, args).await,
            "create_merge_request" => {
                handlers::merge_requests::create_merge_request(client, args).await
            }
            "update_merge_request" => {
                handlers::merge_requests::update_merge_request(client, args).await
            }
            "get_merge_request_diffs" => {
                handlers::merge_requests::get_merge_request_diffs(client, args).await
            }
            "list_merge_request_diffs" => {
                handlers::merge_requests::list_merge_request_diffs(client, args).await
            }
            "get_branch_diffs" => handlers::merge_requests::get_branch_diffs(client, args).await,
            "list_mr_notes" => handlers::merge_requests::list_mr_notes(client, args).await,
            "list_mr_discussions" => {
                handlers::merge_requests::list_mr_discussions(client, args).await
            }
            "create_mr_note" => handlers::merge_requests::create_mr_note(client, args).await,
            "create_mr_discussion" => {
                handlers::merge_requests::create_mr_discussion(client, args).await
            }
            "reply_to_mr_discussion" => {
                handlers::merge_requests::reply_to_mr_discussion(client, args).await
            }
            "resolve_mr_discussion" => {
                handlers::merge_requests::resolve_mr_discussion(client, args).await
            }
            "unresolve_mr_discussion" => {
                handlers::merge_requests::unresolve_mr_discussion(client, args).await
            }
            "update_mr_discussion_note" => {
                handlers::merge_requests::update_mr_discussion_note(client, args).await
            }
            "create_mr_discussion_note" => {
                handlers::merge_requests::create_mr_discussion_note(client, args).await
            }
            "delete_mr_discussion_note" => {
                handlers::merge_requests::delete_mr_discussion_note(client, args).await
            }
            "mark_mr_as_draft" => handlers::merge_requests::mark_mr_as_draft(client, args).await,
            "mark_mr_as_ready" => handlers::merge_requests::mark_mr_as_ready(client, args).await,
            "list_mr_templates" => handlers::merge_requests::list_mr_templates(client, args).await,
            "get_mr_template" => handlers::merge_requests::get_mr_template(client, args).await,

            "list_project_branches" => {
                handlers::repository::list_project_branches(client, args).await
            }
            "get_project_commits" => handlers::repository::get_project_commits(client, args).await,
            "get_commit" => handlers::repository::get_commit(client, args).await,
            "get_commit_diff" => handlers::repository::get_commit_diff(client, args).await,

            "list_pipelines" => handlers::pipelines::list_pipelines(client, args).await,
            "get_pipeline" => handlers::pipelines::get_pipeline(client, args).await,
            "create_pipeline" => handlers::pipelines::create_pipeline(client, args).await,
            "retry_pipeline" => handlers::pipelines::retry_pipeline(client, args).await,
            "cancel_pipeline" => handlers::pipelines::cancel_pipeline(client, args).await,
            "delete_pipeline" => handlers::pipelines::delete_pipeline(client, args).await,
            "get_pipeline_variables" => {
                handlers::pipelines::get_pipeline_variables(client, args).await
            }

            "list_pipeline_jobs" => handlers::jobs::list_pipeline_jobs(client, args).await,
            "get_job_logs" => handlers::jobs::get_job_logs(client, args).await,
            "get_job_trace" => handlers::jobs::get_job_trace(client, args).await,

            "get_user" => handlers::user::get_user(client).await,

            unknown => Err(ToolError::InvalidArgument(format!("Unknown tool: {unknown}"))),
        }
    }
}

impl ServerHandler for GitLabService {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("got tools/call request for {}", request.name);
        let args = request
            .arguments
            .map(Value::Object)
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        match self.dispatch(&request.name, args).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("tool {} failed: {e}", request.name);
                Ok(e.into_call_result())
            }
        }
    }

    async fn list_tools(
        &self,
        request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        tracing::info!("got tools/list request {:?}", request);
        Ok(ListToolsResult {
            tools: tools::all_tools(),
            ..Default::default()
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server_name(),
                version: self.config.server_version(),
                ..Default::default()
            },
            instructions: Some(
                "GitLab MCP server. Exposes projects, issues, merge requests, repository, \
                 pipeline, and job tools over the GitLab REST API."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockGitLab;
    use rmcp::{
        model::ClientInfo,
        service::{RoleClient, RunningService, Service, serve_client, serve_server},
    };
    use serde_json::json;
    use tokio::io::duplex;
    use tokio_test::assert_ok;
    use tokio_util::sync::CancellationToken;

    fn create_test_service() -> (GitLabService, Arc<MockGitLab>) {
        let mock = Arc::new(MockGitLab::new());
        let service = GitLabService::with_client(Config::default(), mock.clone());
        (service, mock)
    }

    fn create_test_ctx(
        running: &RunningService<RoleServer, GitLabService>,
    ) -> RequestContext<RoleServer> {
        RequestContext {
            ct: CancellationToken::new(),
            extensions: Extensions::default(),
            id: RequestId::Number(1),
            meta: Meta::default(),
            peer: running.peer().clone(),
        }
    }

    async fn create_test_pair<S, C>(
        service: S,
        client: C,
    ) -> (RunningService<RoleServer, S>, RunningService<RoleClient, C>)
    where
        S: Service<RoleServer>,
        C: Service<RoleClient>,
    {
        let (srv_io, cli_io) = duplex(64 * 1024);
        tokio::try_join!(
            async {
                serve_server(service, srv_io)
                    .await
                    .map_err(anyhow::Error::from)
            },
            async {
                serve_client(client, cli_io)
                    .await
                    .map_err(anyhow::Error::from)
            }
        )
        .expect("Failed to create test pair")
    }

    #[test]
    fn test_get_info_advertises_tools_only() {
        let (service, _mock) = create_test_service();
        let info = rmcp::ServerHandler::get_info(&service);
        assert_eq!(info.server_info.name, "gitlab-mcp-server");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_new_requires_token() {
        let config = Config::default();
        assert!(GitLabService::new(&config).is_err());

        let mut config = Config::default();
        config.gitlab.token = Some("glpat-test".to_string());
        assert!(GitLabService::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_every_registered_tool_has_a_dispatch_arm() {
        let (service, _mock) = create_test_service();

        for tool in tools::all_tools() {
            let outcome = service
                .dispatch(&tool.name, json!({"project_id": "1"}))
                .await;
            // Missing arguments are fine here; an unrouted name is not.
            if let Err(e) = outcome {
                assert!(
                    !e.to_string().starts_with("Unknown tool:"),
                    "tool {} is registered but not dispatched",
                    tool.name
                );
            }
        }
    }

    #[tokio::test]
    async fn test_list_tools_over_the_wire() {
        let (service, _mock) = create_test_service();
        let (server, client) = create_test_pair(service, ClientInfo::default()).await;

        let ctx = create_test_ctx(&server);
        let result = server.service().list_tools(None, ctx).await.unwrap();
        assert!(result.tools.iter().any(|t| t.name == "get_merge_request"));
        assert!(result.tools.iter().any(|t| t.name == "get_job_trace"));

        assert_ok!(server.cancel().await);
        assert_ok!(client.cancel().await);
    }

    #[tokio::test]
    async fn test_call_tool_dispatches_to_handler() {
        let (service, mock) = create_test_service();
        mock.push_response(Ok(json!({"id": 1, "username": "dev"})));
        let (server, client) = create_test_pair(service, ClientInfo::default()).await;

        let request = CallToolRequestParam {
            name: std::borrow::Cow::Borrowed("get_user"),
            arguments: None,
        };
        let ctx = create_test_ctx(&server);
        let result = server.service().call_tool(request, ctx).await.unwrap();
        assert_ne!(result.is_error, Some(true));
        assert_eq!(mock.recorded_calls(), vec!["GET /user"]);

        assert_ok!(server.cancel().await);
        assert_ok!(client.cancel().await);
    }

    #[tokio::test]
    async fn test_call_tool_unknown_name_is_in_band_error() {
        let (service, _mock) = create_test_service();
        let (server, client) = create_test_pair(service, ClientInfo::default()).await;

        let request = CallToolRequestParam {
            name: std::borrow::Cow::Borrowed("does_not_exist"),
            arguments: None,
        };
        let ctx = create_test_ctx(&server);
        let result = server.service().call_tool(request, ctx).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        let text = &result.content[0].as_text().unwrap().text;
        assert_eq!(text, "Error: Unknown tool: does_not_exist");

        assert_ok!(server.cancel().await);
        assert_ok!(client.cancel().await);
    }

    #[tokio::test]
    async fn test_call_tool_handler_failure_is_flagged_not_fatal() {
        let (service, mock) = create_test_service();
        let (server, client) = create_test_pair(service, ClientInfo::default()).await;

        // get_merge_request with neither iid nor branch
        let request = CallToolRequestParam {
            name: std::borrow::Cow::Borrowed("get_merge_request"),
            arguments: json!({"project_id": "1"}).as_object().cloned(),
        };
        let ctx = create_test_ctx(&server);
        let result = server.service().call_tool(request, ctx).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        let text = &result.content[0].as_text().unwrap().text;
        assert_eq!(
            text,
            "Error: Either merge_request_iid or source_branch must be provided"
        );
        assert!(mock.recorded_calls().is_empty());

        assert_ok!(server.cancel().await);
        assert_ok!(client.cancel().await);
    }
}
