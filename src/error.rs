use crate::client::ClientError;
use rmcp::model::{CallToolResult, Content};

/// Failures a tool handler can surface. Every variant is rendered as an
/// error-flagged text response at the service boundary; handlers never leak
/// a raw protocol error to the peer.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Either merge_request_iid or source_branch must be provided")]
    MissingReference,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Upstream(#[from] ClientError),
}

impl ToolError {
    /// Convert into the uniform MCP response envelope. No retry, no partial
    /// results: the message is all the caller gets.
    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult::error(vec![Content::text(format!("Error: {self}"))])
    }
}

/// Deserialize tool arguments into a typed parameter struct.
pub fn parse_args<T: serde::de::DeserializeOwned>(
    args: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArgument(format!("{e}")))
}

/// Wrap pretty-printed JSON in the standard success envelope.
pub fn json_response(data: &serde_json::Value) -> Result<CallToolResult, ToolError> {
    let text = serde_json::to_string_pretty(data)
        .map_err(|e| ToolError::InvalidArgument(format!("{e}")))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Wrap plain text in the standard success envelope.
pub fn text_response(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Params {
        project_id: String,
        per_page: Option<u32>,
    }

    #[test]
    fn test_parse_args_accepts_optional_fields() {
        let params: Params = parse_args(json!({"project_id": "group/app"})).unwrap();
        assert_eq!(params.project_id, "group/app");
        assert_eq!(params.per_page, None);
    }

    #[test]
    fn test_parse_args_rejects_wrong_types() {
        let err = parse_args::<Params>(json!({"project_id": 42})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[test]
    fn test_error_envelope_is_flagged_and_prefixed() {
        let result = ToolError::MissingReference.into_call_result();
        assert_eq!(result.is_error, Some(true));
        let text = result.content[0].as_text().unwrap();
        assert_eq!(
            text.text,
            "Error: Either merge_request_iid or source_branch must be provided"
        );
    }
}
