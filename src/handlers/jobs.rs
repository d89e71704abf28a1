use super::Query;
use crate::client::{GitLab, encode_path};
use crate::error::{ToolError, json_response, parse_args, text_response};
use rmcp::model::{CallToolResult, Content};
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_LINES_LIMIT: usize = 1000;

const SEPARATOR: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Deserialize)]
pub struct ListPipelineJobsParams {
    pub project_id: String,
    pub pipeline_id: u64,
    pub scope: Option<Vec<String>>,
    pub include_retried: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GetJobParams {
    pub project_id: String,
    pub job_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct GetJobTraceParams {
    pub project_id: String,
    pub job_id: u64,
    pub lines_limit: Option<i64>,
    #[serde(default)]
    pub tail: bool,
    #[serde(default)]
    pub raw: bool,
}

/// The selected window of a job log, head or tail.
struct TraceWindow {
    lines: Vec<String>,
    total_lines: usize,
    truncated: bool,
}

/// Split the log on `\n` and keep the first or last `limit` lines. A
/// trailing newline therefore contributes a final empty line, same as the
/// split the API consumers are used to.
fn window_lines(content: &str, limit: usize, tail: bool) -> TraceWindow {
    let all: Vec<&str> = content.split('\n').collect();
    let total_lines = all.len();
    let keep = limit.min(total_lines);

    let window = if tail {
        &all[total_lines - keep..]
    } else {
        &all[..keep]
    };

    TraceWindow {
        lines: window.iter().map(|line| line.to_string()).collect(),
        total_lines,
        truncated: total_lines > limit,
    }
}

fn annotate(window: &TraceWindow, params: &GetJobTraceParams) -> String {
    let direction = if params.tail { "(last)" } else { "(first)" };
    let mut sections = vec![
        "📋 Job Trace Summary".to_string(),
        SEPARATOR.to_string(),
        format!("📊 Total lines: {}", window.total_lines),
        format!("📄 Showing: {} lines {direction}", window.lines.len()),
        format!("🔗 Project: {}", params.project_id),
        format!("🚀 Job ID: {}", params.job_id),
        String::new(),
        "📝 Log Content:".to_string(),
        SEPARATOR.to_string(),
        window.lines.join("\n"),
    ];

    if window.truncated {
        sections.push(String::new());
        sections.push(format!(
            "⚠️  Log truncated. Total lines: {}, Showing: {}",
            window.total_lines,
            window.lines.len()
        ));
        if params.tail {
            sections.push("💡 Use tail:false to see the beginning of the log".to_string());
        } else {
            sections.push("💡 Use tail:true to see the end of the log".to_string());
        }
    }

    sections.join("\n")
}

pub async fn list_pipeline_jobs(
    client: &dyn GitLab,
    args: Value,
) -> Result<CallToolResult, ToolError> {
    let params: ListPipelineJobsParams = parse_args(args)?;
    let mut query = Query::new();

    if let Some(scope) = params.scope {
        for status in scope {
            query.append("scope[]", status);
        }
    }
    query.append_opt("include_retried", params.include_retried);

    let data = client
        .get(&format!(
            "/projects/{}/pipelines/{}/jobs?{}",
            encode_path(&params.project_id),
            params.pipeline_id,
            query.finish()
        ))
        .await?;
    json_response(&data)
}

/// Raw passthrough of the full job log, no windowing.
pub async fn get_job_logs(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: GetJobParams = parse_args(args)?;
    let trace = client
        .get_text(&format!(
            "/projects/{}/jobs/{}/trace",
            encode_path(&params.project_id),
            params.job_id
        ))
        .await?;
    Ok(text_response(trace))
}

/// Windowed job log with optional annotation. Unlike the other handlers a
/// fetch failure here is reported in-band as an error-flagged text response
/// rather than propagated, so clients polling a job that has produced no
/// trace yet get a readable message.
pub async fn get_job_trace(client: &dyn GitLab, args: Value) -> Result<CallToolResult, ToolError> {
    let params: GetJobTraceParams = parse_args(args)?;

    let limit = match params.lines_limit {
        None => DEFAULT_LINES_LIMIT,
        Some(n) if n > 0 => n as usize,
        Some(n) => {
            return Err(ToolError::InvalidArgument(format!(
                "lines_limit must be a positive integer, got {n}"
            )));
        }
    };

    let content = match client
        .get_text(&format!(
            "/projects/{}/jobs/{}/trace",
            encode_path(&params.project_id),
            params.job_id
        ))
        .await
    {
        Ok(content) => content,
        Err(e) => {
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "Failed to retrieve job trace: {e}"
            ))]));
        }
    };

    if content.is_empty() {
        return Ok(text_response(format!(
            "No log content available for job {} in project {}",
            params.job_id, params.project_id
        )));
    }

    let window = window_lines(&content, limit, params.tail);
    let text = if params.raw {
        window.lines.join("\n")
    } else {
        annotate(&window, &params)
    };
    Ok(text_response(text))
}
