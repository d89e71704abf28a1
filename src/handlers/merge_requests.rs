use super::Query;
use crate::client::{GitLab, encode_path};
use crate::error::{ToolError, json_response, parse_args};
use rmcp::model::CallToolResult;
use serde::Deserialize;
use serde_json::{Value, json};

/// Upper bound on discussion pages fetched by the unresolved filter. At the
/// fixed page size of 100 this caps the aggregate at 10,000 discussions.
const MAX_DISCUSSION_PAGES: u32 = 100;

const DRAFT_PREFIXES: [&str; 2] = ["Draft: ", "WIP: "];

/// Resolve a merge request IID from either an explicit IID or a source
/// branch name. Precedence: an explicit IID always wins and costs no
/// network call (presence is what matters, not the value, so 0 is passed
/// through untouched). A branch name is resolved against open merge
/// requests first, then against all states as a fallback, taking the first
/// match in both cases.
pub async fn resolve_merge_request_iid(
    client: &dyn GitLab,
    project_id: &str,
    merge_request_iid: Option<u64>,
    source_branch: Option<&str>,
) -> Result<u64, ToolError> {
    if let Some(iid) = merge_request_iid {
        return Ok(iid);
    }

    let Some(branch) = source_branch else {
        return Err(ToolError::MissingReference);
    };

    let encoded_project = encode_path(project_id);
    let mut query = Query::new();
    query.append("source_branch", branch);
    query.append("state", "opened");
    query.append("per_page", 1);

    let open_matches = client
        .get(&format!(
            "/projects/{encoded_project}/merge_requests?{}",
            query.finish()
        ))
        .await?;

    if let Some(iid) = first_iid(&open_matches) {
        return Ok(iid);
    }

    // No open MR for this branch; retry across all states.
    let mut query = Query::new();
    query.append("source_branch", branch);
    query.append("per_page", 1);

    let all_matches = client
        .get(&format!(
            "/projects/{encoded_project}/merge_requests?{}",
            query.finish()
        ))
        .await?;

    first_iid(&all_matches).ok_or_else(|| {
        ToolError::NotFound(format!(
            "No merge request found for source branch: {branch}"
        ))
    })
}

fn first_iid(matches: &Value) -> Option<u64> {
    matches.as_array()?.first()?.get("iid")?.as_u64()
}

/// A discussion is unresolved iff any of its notes is resolvable and not
/// yet resolved. Non-resolvable notes never count.
fn is_unresolved(discussion: &Value) -> bool {
    discussion
        .get("notes")
        .and_then(Value::as_array)
        .is_some_and(|notes| {
            notes.iter().any(|note| {
                note.get("resolvable").and_then(Value::as_bool) == Some(true)
                    && note.get("resolved").and_then(Value::as_bool) == Some(false)
            })
        })
}

fn is_draft_title(title: &str) -> bool {
    DRAFT_PREFIXES.iter().any(|prefix| title.starts_with(prefix))
}

#[derive(Debug, Deserialize)]
pub struct ListMergeRequestsParams {
    pub project_id: String,
    pub state: Option<String>,
    pub target_branch: Option<String>,
    pub source_branch: Option<String>,
    pub assignee_id: Option<u64>,
    pub author_id: Option<u64>,
    pub reviewer_id: Option<u64>,
    pub reviewer_username: Option<String>,
    pub search: Option<String>,
    pub scope: Option<String>,
    pub per_page: Option<u32>,
}

/// Shared by every operation addressing one MR by IID or source branch.
#[derive(Debug, Deserialize)]
pub struct MergeRequestRefParams {
    pub project_id: String,
    pub merge_request_iid: Option<u64>,
    pub source_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMergeRequestParams {
    pub project_id: String,
    pub title: String,
    pub source_branch: String,
    pub target_branch: String,
    pub description: Option<String>,
    pub assignee_ids: Option<Vec<u64>>,
    pub reviewer_ids: Option<Vec<u64>>,
    pub labels: Option<String>,
    pub milestone_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMergeRequestParams {
    pub project_id: String,
    pub merge_request_iid: Option<u64>,
    pub source_branch: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub state_event: Option<String>,
    pub target_branch: Option<String>,
    pub assignee_id: Option<u64>,
    pub assignee_ids: Option<Vec<u64>>,
    pub reviewer_ids: Option<Vec<u64>>,
    pub milestone_id: Option<u64>,
    pub labels: Option<String>,
    pub remove_source_branch: Option<bool>,
    pub squash: Option<bool>,
    pub allow_collaboration: Option<bool>,
    pub merge_when_pipeline_succeeds: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GetMergeRequestDiffsParams {
    pub project_id: String,
    pub merge_request_iid: Option<u64>,
    pub source_branch: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListMergeRequestDiffsParams {
    pub project_id: String,
    pub merge_request_iid: Option<u64>,
    pub source_branch: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub unidiff: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GetBranchDiffsParams {
    pub project_id: String,
    pub from: String,
    pub to: String,
    pub straight: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListMrNotesParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    pub sort: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ListMrDiscussionsParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    #[serde(default)]
    pub unresolved_only: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMrNoteParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscussionPosition {
    pub base_sha: String,
    pub start_sha: String,
    pub head_sha: String,
    pub old_path: String,
    pub new_path: String,
    pub position_type: Option<String>,
    pub old_line: Option<u64>,
    pub new_line: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMrDiscussionParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    pub body: String,
    pub position: Option<DiscussionPosition>,
}

#[derive(Debug, Deserialize)]
pub struct DiscussionRefParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    pub discussion_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplyToMrDiscussionParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    pub discussion_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscussionNoteRefParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    pub discussion_id: String,
    pub note_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMrDiscussionNoteParams {
    pub project_id: String,
    pub merge_request_iid: u64,
    pub discussion_id: String,
    pub note_id: u64,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkMrParams {
    pub project_id: String,
    pub merge_request_iid: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListMrTemplatesParams {
    pub project_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GetMrTemplateParams {
    pub project_id: String,
    pub name: String,
}

pub async fn list_merge_requests(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ListMergeRequestsParams = parse_args(args)?;
    let mut query = Query::new();

    query.append_opt("state", params.state);
    query.append_opt("target_branch", params.target_branch);
    query.append_opt("source_branch", params.source_branch);
    query.append_opt("assignee_id", params.assignee_id);
    query.append_opt("author_id", params.author_id);
    query.append_opt("reviewer_id", params.reviewer_id);
    query.append_opt("reviewer_username", params.reviewer_username);
    query.append_opt("search", params.search);
    query.append_opt("scope", params.scope);
    query.append("per_page", params.per_page.unwrap_or(20));

    let data = client
        .get(&format!(
            "/projects/{}/merge_requests?{}",
            encode_path(&params.project_id),
            query.finish()
        ))
        .await?;
    json_response(&data)
}

pub async fn get_merge_request(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: MergeRequestRefParams = parse_args(args)?;
    let iid = resolve_merge_request_iid(
        client,
        &params.project_id,
        params.merge_request_iid,
        params.source_branch.as_deref(),
    )
    .await?;

    let data = client
        .get(&format!(
            "/projects/{}/merge_requests/{iid}",
            encode_path(&params.project_id)
        ))
        .await?;
    json_response(&data)
}

pub async fn get_merge_request_diffs(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: GetMergeRequestDiffsParams = parse_args(args)?;
    let iid = resolve_merge_request_iid(
        client,
        &params.project_id,
        params.merge_request_iid,
        params.source_branch.as_deref(),
    )
    .await?;

    let mut query = Query::new();
    query.append_opt("view", params.view);

    let data = client
        .get(&format!(
            "/projects/{}/merge_requests/{iid}/changes{}",
            encode_path(&params.project_id),
            query.suffix()
        ))
        .await?;
    json_response(&data)
}

pub async fn list_merge_request_diffs(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ListMergeRequestDiffsParams = parse_args(args)?;
    let iid = resolve_merge_request_iid(
        client,
        &params.project_id,
        params.merge_request_iid,
        params.source_branch.as_deref(),
    )
    .await?;

    let mut query = Query::new();
    query.append_opt("page", params.page);
    query.append_opt("per_page", params.per_page);
    query.append_opt("unidiff", params.unidiff);

    let data = client
        .get(&format!(
            "/projects/{}/merge_requests/{iid}/diffs{}",
            encode_path(&params.project_id),
            query.suffix()
        ))
        .await?;
    json_response(&data)
}

pub async fn get_branch_diffs(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: GetBranchDiffsParams = parse_args(args)?;

    let mut query = Query::new();
    query.append("from", params.from);
    query.append("to", params.to);
    query.append_opt("straight", params.straight);

    let data = client
        .get(&format!(
            "/projects/{}/repository/compare?{}",
            encode_path(&params.project_id),
            query.finish()
        ))
        .await?;
    json_response(&data)
}

pub async fn create_merge_request(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: CreateMergeRequestParams = parse_args(args)?;

    let mut body = serde_json::Map::new();
    body.insert("title".into(), json!(params.title));
    body.insert("source_branch".into(), json!(params.source_branch));
    body.insert("target_branch".into(), json!(params.target_branch));
    if let Some(description) = params.description {
        body.insert("description".into(), json!(description));
    }
    if let Some(assignee_ids) = params.assignee_ids {
        body.insert("assignee_ids".into(), json!(assignee_ids));
    }
    if let Some(reviewer_ids) = params.reviewer_ids {
        body.insert("reviewer_ids".into(), json!(reviewer_ids));
    }
    if let Some(labels) = params.labels {
        body.insert("labels".into(), json!(labels));
    }
    if let Some(milestone_id) = params.milestone_id {
        body.insert("milestone_id".into(), json!(milestone_id));
    }

    let data = client
        .post(
            &format!(
                "/projects/{}/merge_requests",
                encode_path(&params.project_id)
            ),
            Some(Value::Object(body)),
        )
        .await?;
    json_response(&data)
}

pub async fn update_merge_request(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: UpdateMergeRequestParams = parse_args(args)?;
    let iid = resolve_merge_request_iid(
        client,
        &params.project_id,
        params.merge_request_iid,
        params.source_branch.as_deref(),
    )
    .await?;

    let mut body = serde_json::Map::new();
    if let Some(title) = params.title {
        body.insert("title".into(), json!(title));
    }
    if let Some(description) = params.description {
        body.insert("description".into(), json!(description));
    }
    if let Some(state_event) = params.state_event {
        body.insert("state_event".into(), json!(state_event));
    }
    if let Some(target_branch) = params.target_branch {
        body.insert("target_branch".into(), json!(target_branch));
    }
    if let Some(assignee_id) = params.assignee_id {
        body.insert("assignee_id".into(), json!(assignee_id));
    }
    if let Some(assignee_ids) = params.assignee_ids {
        body.insert("assignee_ids".into(), json!(assignee_ids));
    }
    if let Some(reviewer_ids) = params.reviewer_ids {
        body.insert("reviewer_ids".into(), json!(reviewer_ids));
    }
    if let Some(milestone_id) = params.milestone_id {
        body.insert("milestone_id".into(), json!(milestone_id));
    }
    if let Some(labels) = params.labels {
        body.insert("labels".into(), json!(labels));
    }
    if let Some(remove_source_branch) = params.remove_source_branch {
        body.insert("remove_source_branch".into(), json!(remove_source_branch));
    }
    if let Some(squash) = params.squash {
        body.insert("squash".into(), json!(squash));
    }
    if let Some(allow_collaboration) = params.allow_collaboration {
        body.insert("allow_collaboration".into(), json!(allow_collaboration));
    }
    if let Some(merge_when_pipeline_succeeds) = params.merge_when_pipeline_succeeds {
        body.insert(
            "merge_when_pipeline_succeeds".into(),
            json!(merge_when_pipeline_succeeds),
        );
    }

    let data = client
        .put(
            &format!(
                "/projects/{}/merge_requests/{iid}",
                encode_path(&params.project_id)
            ),
            Some(Value::Object(body)),
        )
        .await?;
    json_response(&data)
}

pub async fn list_mr_notes(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: ListMrNotesParams = parse_args(args)?;

    let mut query = Query::new();
    query.append_opt("sort", params.sort);
    query.append_opt("order_by", params.order_by);
    query.append_opt("page", params.page);
    query.append("per_page", params.per_page.unwrap_or(20));

    let data = client
        .get(&format!(
            "/projects/{}/merge_requests/{}/notes?{}",
            encode_path(&params.project_id),
            params.merge_request_iid,
            query.finish()
        ))
        .await?;
    json_response(&data)
}

pub async fn list_mr_discussions(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ListMrDiscussionsParams = parse_args(args)?;
    let encoded_project = encode_path(&params.project_id);

    if params.unresolved_only {
        let (discussions, total_fetched) =
            fetch_all_discussions(client, &encoded_project, params.merge_request_iid).await?;

        let unresolved: Vec<Value> = discussions
            .into_iter()
            .filter(|discussion| is_unresolved(discussion))
            .collect();

        let unresolved_count = unresolved.len();
        return json_response(&json!({
            "discussions": unresolved,
            "metadata": {
                "total_fetched": total_fetched,
                "unresolved_count": unresolved_count,
                "filtered": true,
            },
        }));
    }

    let mut query = Query::new();
    query.append_opt("page", params.page);
    query.append("per_page", params.per_page.unwrap_or(20));

    let data = client
        .get(&format!(
            "/projects/{encoded_project}/merge_requests/{}/discussions?{}",
            params.merge_request_iid,
            query.finish()
        ))
        .await?;
    json_response(&data)
}

/// Page through every discussion on the MR. Two independent exit checks per
/// iteration: the `x-next-page` continuation header, and the hard
/// MAX_DISCUSSION_PAGES cap guarding against a misbehaving server.
async fn fetch_all_discussions(
    client: &dyn GitLab,
    encoded_project: &str,
    merge_request_iid: u64,
) -> Result<(Vec<Value>, usize), ToolError> {
    let mut all = Vec::new();
    let mut page: u32 = 1;

    loop {
        if page > MAX_DISCUSSION_PAGES {
            tracing::warn!(
                "Discussion pagination hit the {MAX_DISCUSSION_PAGES}-page cap; returning partial aggregate"
            );
            break;
        }

        let (data, headers) = client
            .get_with_headers(&format!(
                "/projects/{encoded_project}/merge_requests/{merge_request_iid}/discussions?per_page=100&page={page}"
            ))
            .await?;

        if let Value::Array(items) = data {
            all.extend(items);
        }

        let has_more = headers
            .get("x-next-page")
            .is_some_and(|next| !next.is_empty());
        if !has_more {
            break;
        }
        page += 1;
    }

    let total = all.len();
    Ok((all, total))
}

pub async fn create_mr_note(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: CreateMrNoteParams = parse_args(args)?;

    let data = client
        .post(
            &format!(
                "/projects/{}/merge_requests/{}/notes",
                encode_path(&params.project_id),
                params.merge_request_iid
            ),
            Some(json!({ "body": params.body })),
        )
        .await?;
    json_response(&data)
}

pub async fn create_mr_discussion(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: CreateMrDiscussionParams = parse_args(args)?;

    let mut body = serde_json::Map::new();
    body.insert("body".into(), json!(params.body));
    if let Some(position) = params.position {
        let mut pos = serde_json::Map::new();
        pos.insert("base_sha".into(), json!(position.base_sha));
        pos.insert("start_sha".into(), json!(position.start_sha));
        pos.insert("head_sha".into(), json!(position.head_sha));
        pos.insert("old_path".into(), json!(position.old_path));
        pos.insert("new_path".into(), json!(position.new_path));
        pos.insert(
            "position_type".into(),
            json!(position.position_type.unwrap_or_else(|| "text".to_string())),
        );
        if let Some(old_line) = position.old_line {
            pos.insert("old_line".into(), json!(old_line));
        }
        if let Some(new_line) = position.new_line {
            pos.insert("new_line".into(), json!(new_line));
        }
        body.insert("position".into(), Value::Object(pos));
    }

    let data = client
        .post(
            &format!(
                "/projects/{}/merge_requests/{}/discussions",
                encode_path(&params.project_id),
                params.merge_request_iid
            ),
            Some(Value::Object(body)),
        )
        .await?;
    json_response(&data)
}

pub async fn reply_to_mr_discussion(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ReplyToMrDiscussionParams = parse_args(args)?;

    let data = client
        .post(
            &format!(
                "/projects/{}/merge_requests/{}/discussions/{}/notes",
                encode_path(&params.project_id),
                params.merge_request_iid,
                params.discussion_id
            ),
            Some(json!({ "body": params.body })),
        )
        .await?;
    json_response(&data)
}

async fn set_discussion_resolved(
    client: &dyn GitLab,
    args: Value,
    resolved: bool,
) -> Result<CallToolResult, ToolError> {
    let params: DiscussionRefParams = parse_args(args)?;

    let data = client
        .put(
            &format!(
                "/projects/{}/merge_requests/{}/discussions/{}",
                encode_path(&params.project_id),
                params.merge_request_iid,
                params.discussion_id
            ),
            Some(json!({ "resolved": resolved })),
        )
        .await?;
    json_response(&data)
}

pub async fn resolve_mr_discussion(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    set_discussion_resolved(client, args, true).await
}

pub async fn unresolve_mr_discussion(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    set_discussion_resolved(client, args, false).await
}

pub async fn update_mr_discussion_note(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: UpdateMrDiscussionNoteParams = parse_args(args)?;

    let data = client
        .put(
            &format!(
                "/projects/{}/merge_requests/{}/discussions/{}/notes/{}",
                encode_path(&params.project_id),
                params.merge_request_iid,
                params.discussion_id,
                params.note_id
            ),
            Some(json!({ "body": params.body })),
        )
        .await?;
    json_response(&data)
}

pub async fn create_mr_discussion_note(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ReplyToMrDiscussionParams = parse_args(args)?;

    let data = client
        .post(
            &format!(
                "/projects/{}/merge_requests/{}/discussions/{}/notes",
                encode_path(&params.project_id),
                params.merge_request_iid,
                params.discussion_id
            ),
            Some(json!({ "body": params.body })),
        )
        .await?;
    json_response(&data)
}

pub async fn delete_mr_discussion_note(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: DiscussionNoteRefParams = parse_args(args)?;

    client
        .delete(&format!(
            "/projects/{}/merge_requests/{}/discussions/{}/notes/{}",
            encode_path(&params.project_id),
            params.merge_request_iid,
            params.discussion_id,
            params.note_id
        ))
        .await?;

    json_response(&json!({ "message": "Note deleted successfully" }))
}

/// Read-then-conditionally-write; two concurrent toggles on the same MR can
/// race and the later PUT wins. Accepted limitation, no locking here.
pub async fn mark_mr_as_draft(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: MarkMrParams = parse_args(args)?;
    let path = format!(
        "/projects/{}/merge_requests/{}",
        encode_path(&params.project_id),
        params.merge_request_iid
    );

    let mr = client.get(&path).await?;
    let title = mr.get("title").and_then(Value::as_str).unwrap_or_default();

    if is_draft_title(title) {
        let mut response = json!({ "message": "Merge request is already marked as draft" });
        merge_fields(&mut response, &mr);
        return json_response(&response);
    }

    let data = client
        .put(&path, Some(json!({ "title": format!("Draft: {title}") })))
        .await?;
    json_response(&data)
}

pub async fn mark_mr_as_ready(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: MarkMrParams = parse_args(args)?;
    let path = format!(
        "/projects/{}/merge_requests/{}",
        encode_path(&params.project_id),
        params.merge_request_iid
    );

    let mr = client.get(&path).await?;
    let title = mr.get("title").and_then(Value::as_str).unwrap_or_default();

    // Strip exactly one matching prefix; anything else is already ready.
    let stripped = DRAFT_PREFIXES
        .iter()
        .find_map(|prefix| title.strip_prefix(prefix));
    let Some(new_title) = stripped else {
        let mut response = json!({ "message": "Merge request is already marked as ready" });
        merge_fields(&mut response, &mr);
        return json_response(&response);
    };

    let data = client
        .put(&path, Some(json!({ "title": new_title })))
        .await?;
    json_response(&data)
}

/// Copy the MR's fields into the informational response. Spread semantics:
/// an MR field named `message` would replace the informational one.
fn merge_fields(target: &mut Value, source: &Value) {
    if let (Some(target_map), Some(source_map)) = (target.as_object_mut(), source.as_object()) {
        for (key, value) in source_map {
            target_map.insert(key.clone(), value.clone());
        }
    }
}

pub async fn list_mr_templates(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ListMrTemplatesParams = parse_args(args)?;

    let data = client
        .get(&format!(
            "/projects/{}/templates/merge_requests",
            encode_path(&params.project_id)
        ))
        .await?;
    json_response(&data)
}

pub async fn get_mr_template(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: GetMrTemplateParams = parse_args(args)?;

    let data = client
        .get(&format!(
            "/projects/{}/templates/merge_requests/{}",
            encode_path(&params.project_id),
            encode_path(&params.name)
        ))
        .await?;
    json_response(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockGitLab;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_resolver_explicit_iid_skips_network() {
        let mock = MockGitLab::new();
        let iid = resolve_merge_request_iid(&mock, "group/app", Some(42), Some("feature-x"))
            .await
            .unwrap();
        assert_eq!(iid, 42);
        assert!(mock.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolver_zero_iid_is_still_explicit() {
        let mock = MockGitLab::new();
        let iid = resolve_merge_request_iid(&mock, "group/app", Some(0), None)
            .await
            .unwrap();
        assert_eq!(iid, 0);
        assert!(mock.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolver_requires_some_reference() {
        let mock = MockGitLab::new();
        let err = resolve_merge_request_iid(&mock, "group/app", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingReference));
    }

    #[tokio::test]
    async fn test_resolver_finds_open_merge_request() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([{"iid": 7}])));

        let iid = resolve_merge_request_iid(&mock, "group/app", None, Some("feature-x"))
            .await
            .unwrap();
        assert_eq!(iid, 7);
        assert_eq!(
            mock.recorded_calls(),
            vec![
                "GET /projects/group%2Fapp/merge_requests?source_branch=feature-x&state=opened&per_page=1"
            ]
        );
    }

    #[tokio::test]
    async fn test_resolver_falls_back_to_all_states() {
        let mock = MockGitLab::new();
        // responses are consumed in push order
        mock.push_response(Ok(json!([])));
        mock.push_response(Ok(json!([{"iid": 11, "state": "merged"}])));

        let iid = resolve_merge_request_iid(&mock, "group/app", None, Some("feature-x"))
            .await
            .unwrap();
        assert_eq!(iid, 11);

        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("state=opened"));
        assert!(!calls[1].contains("state=opened"));
    }

    #[tokio::test]
    async fn test_resolver_not_found_names_the_branch() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([])));
        mock.push_response(Ok(json!([])));

        let err = resolve_merge_request_iid(&mock, "group/app", None, Some("feature-x"))
            .await
            .unwrap_err();
        match err {
            ToolError::NotFound(message) => {
                assert_eq!(
                    message,
                    "No merge request found for source branch: feature-x"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(mock.recorded_calls().len(), 2);
    }

    #[test]
    fn test_unresolved_predicate() {
        let unresolved = json!({"notes": [{"resolvable": true, "resolved": false}]});
        let resolved = json!({"notes": [{"resolvable": true, "resolved": true}]});
        let not_resolvable = json!({"notes": [{"resolvable": false, "resolved": false}]});
        let no_notes = json!({"notes": []});
        let mixed = json!({"notes": [
            {"resolvable": true, "resolved": true},
            {"resolvable": true, "resolved": false},
        ]});

        assert!(is_unresolved(&unresolved));
        assert!(!is_unresolved(&resolved));
        assert!(!is_unresolved(&not_resolvable));
        assert!(!is_unresolved(&no_notes));
        assert!(is_unresolved(&mixed));
    }

    #[tokio::test]
    async fn test_aggregator_stops_at_page_cap() {
        let mock = MockGitLab::new();
        let mut headers = HashMap::new();
        headers.insert("x-next-page".to_string(), "2".to_string());
        // every page claims another one follows
        *mock.repeat_header_response.lock().unwrap() =
            Some((json!([{"id": "d", "notes": []}]), headers));

        let (discussions, total) = fetch_all_discussions(&mock, "1", 5).await.unwrap();
        assert_eq!(mock.recorded_calls().len(), 100);
        assert_eq!(total, 100);
        assert_eq!(discussions.len(), 100);
    }

    #[tokio::test]
    async fn test_aggregator_stops_when_continuation_absent() {
        let mock = MockGitLab::new();
        let mut more = HashMap::new();
        more.insert("x-next-page".to_string(), "2".to_string());
        mock.push_header_response(json!([{"id": "a", "notes": []}]), more);
        mock.push_header_response(
            json!([{"id": "b", "notes": []}]),
            HashMap::from([("x-next-page".to_string(), String::new())]),
        );

        let (discussions, total) = fetch_all_discussions(&mock, "1", 5).await.unwrap();
        assert_eq!(mock.recorded_calls().len(), 2);
        assert_eq!(total, 2);
        assert_eq!(discussions.len(), 2);
    }

    #[tokio::test]
    async fn test_list_discussions_unresolved_only_filters_and_reports() {
        let mock = MockGitLab::new();
        mock.push_header_response(
            json!([
                {"id": "a", "notes": [{"resolvable": true, "resolved": false}]},
                {"id": "b", "notes": [{"resolvable": true, "resolved": true}]},
            ]),
            HashMap::new(),
        );

        let result = list_mr_discussions(
            &mock,
            json!({"project_id": "1", "merge_request_iid": 5, "unresolved_only": true}),
        )
        .await
        .unwrap();

        let text = &result.content[0].as_text().unwrap().text;
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed["metadata"]["total_fetched"], 2);
        assert_eq!(parsed["metadata"]["unresolved_count"], 1);
        assert_eq!(parsed["metadata"]["filtered"], true);
        assert_eq!(parsed["discussions"][0]["id"], "a");
    }

    #[tokio::test]
    async fn test_mark_as_draft_prefixes_title() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"iid": 5, "title": "Add feature"})));
        mock.push_response(Ok(json!({"iid": 5, "title": "Draft: Add feature"})));

        mark_mr_as_draft(&mock, json!({"project_id": "1", "merge_request_iid": 5}))
            .await
            .unwrap();

        let calls = mock.recorded_calls();
        assert_eq!(
            calls,
            vec![
                "GET /projects/1/merge_requests/5",
                "PUT /projects/1/merge_requests/5",
            ]
        );
    }

    #[tokio::test]
    async fn test_mark_as_draft_is_noop_when_already_draft() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"iid": 5, "title": "Draft: Add feature"})));

        let result = mark_mr_as_draft(&mock, json!({"project_id": "1", "merge_request_iid": 5}))
            .await
            .unwrap();

        // read happened, write did not
        assert_eq!(mock.recorded_calls(), vec!["GET /projects/1/merge_requests/5"]);
        let text = &result.content[0].as_text().unwrap().text;
        assert!(text.contains("already marked as draft"));
        assert!(text.contains("Add feature"));
    }

    #[tokio::test]
    async fn test_noop_response_carries_mr_fields_with_mr_precedence() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({
            "iid": 5,
            "title": "Draft: Add feature",
            "message": "server-side note",
        })));

        let result = mark_mr_as_draft(&mock, json!({"project_id": "1", "merge_request_iid": 5}))
            .await
            .unwrap();

        let text = &result.content[0].as_text().unwrap().text;
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed["iid"], 5);
        assert_eq!(parsed["title"], "Draft: Add feature");
        // an MR field of the same name wins over the informational message
        assert_eq!(parsed["message"], "server-side note");
    }

    #[tokio::test]
    async fn test_mark_as_ready_strips_wip_prefix() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"iid": 5, "title": "WIP: Add feature"})));
        mock.push_response(Ok(json!({"iid": 5, "title": "Add feature"})));

        mark_mr_as_ready(&mock, json!({"project_id": "1", "merge_request_iid": 5}))
            .await
            .unwrap();

        assert_eq!(mock.recorded_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mark_as_ready_is_noop_when_already_ready() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!({"iid": 5, "title": "Add feature"})));

        let result = mark_mr_as_ready(&mock, json!({"project_id": "1", "merge_request_iid": 5}))
            .await
            .unwrap();

        assert_eq!(mock.recorded_calls().len(), 1);
        let text = &result.content[0].as_text().unwrap().text;
        assert!(text.contains("already marked as ready"));
    }

    #[tokio::test]
    async fn test_get_merge_request_resolves_branch_first() {
        let mock = MockGitLab::new();
        mock.push_response(Ok(json!([{"iid": 9}])));
        mock.push_response(Ok(json!({"iid": 9, "title": "T"})));

        get_merge_request(
            &mock,
            json!({"project_id": "group/app", "source_branch": "feature-x"}),
        )
        .await
        .unwrap();

        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], "GET /projects/group%2Fapp/merge_requests/9");
    }

    #[tokio::test]
    async fn test_delete_discussion_note_reports_success() {
        let mock = MockGitLab::new();

        let result = delete_mr_discussion_note(
            &mock,
            json!({
                "project_id": "1",
                "merge_request_iid": 5,
                "discussion_id": "abc",
                "note_id": 3
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            mock.recorded_calls(),
            vec!["DELETE /projects/1/merge_requests/5/discussions/abc/notes/3"]
        );
        let text = &result.content[0].as_text().unwrap().text;
        assert!(text.contains("Note deleted successfully"));
    }
}
