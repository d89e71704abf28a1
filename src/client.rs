use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Characters escaped when a value is embedded as a single path segment.
/// Covers `/` so "group/project" style ids stay one segment, plus the usual
/// suspects that are unsafe in URLs.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'&')
    .add(b'+')
    .add(b'=');

/// Percent-encode a project id or other value used as a URL path segment.
pub fn encode_path(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("GitLab API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; message is taken from the GitLab error body when
    /// one is present.
    #[error("GitLab API error ({status}): {message}")]
    Status { status: u16, message: String },
}

/// The data access port every handler talks through. Paths are pre-encoded
/// resource paths relative to the `/api/v4` root; the implementation owns
/// base URL and authentication concerns.
#[async_trait]
pub trait GitLab: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ClientError>;

    /// Fetch an endpoint that returns plain text rather than JSON (job
    /// traces).
    async fn get_text(&self, path: &str) -> Result<String, ClientError>;

    /// GET returning both body and response headers, for callers that need
    /// pagination headers such as `x-next-page`.
    async fn get_with_headers(
        &self,
        path: &str,
    ) -> Result<(Value, HashMap<String, String>), ClientError>;

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ClientError>;

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ClientError>;

    /// DELETE returns the status code so callers can distinguish 204 from a
    /// body-carrying response.
    async fn delete(&self, path: &str) -> Result<(u16, Option<Value>), ClientError>;
}

/// GitLab REST API client over reqwest.
pub struct GitLabClient {
    http: reqwest::Client,
    api_root: String,
    token: String,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_root: format!("{}/api/v4", base_url.trim_end_matches('/')),
            token: token.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_root, path))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    /// Map a non-2xx response into `ClientError::Status`, pulling the
    /// `message` or `error` field out of the GitLab error body if possible.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .map(|m| match m {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl GitLab for GitLabClient {
    async fn get(&self, path: &str) -> Result<Value, ClientError> {
        tracing::debug!("GET {path}");
        let response = Self::check(self.request(reqwest::Method::GET, path).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_text(&self, path: &str) -> Result<String, ClientError> {
        tracing::debug!("GET {path} (text)");
        let response = Self::check(self.request(reqwest::Method::GET, path).send().await?).await?;
        Ok(response.text().await?)
    }

    async fn get_with_headers(
        &self,
        path: &str,
    ) -> Result<(Value, HashMap<String, String>), ClientError> {
        tracing::debug!("GET {path} (with headers)");
        let response = Self::check(self.request(reqwest::Method::GET, path).send().await?).await?;
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();
        Ok((response.json().await?, headers))
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ClientError> {
        tracing::debug!("POST {path}");
        let mut request = self.request(reqwest::Method::POST, path);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ClientError> {
        tracing::debug!("PUT {path}");
        let mut request = self.request(reqwest::Method::PUT, path);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(u16, Option<Value>), ClientError> {
        tracing::debug!("DELETE {path}");
        let response =
            Self::check(self.request(reqwest::Method::DELETE, path).send().await?).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let data = if body.is_empty() {
            None
        } else {
            serde_json::from_str(&body).ok()
        };
        Ok((status, data))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_encode_path_escapes_namespaced_projects() {
        assert_eq!(encode_path("group/project"), "group%2Fproject");
        assert_eq!(encode_path("plain"), "plain");
        assert_eq!(encode_path("with space"), "with%20space");
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_token_under_api_root() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/user"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;

        let client =
            GitLabClient::new(&server.uri(), "secret-token", Duration::from_secs(5)).unwrap();
        let data = client.get("/user").await.unwrap();
        assert_eq!(data, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_non_2xx_surfaces_gitlab_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/1"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "404 Project Not Found"})),
            )
            .mount(&server)
            .await;

        let client = GitLabClient::new(&server.uri(), "t", Duration::from_secs(5)).unwrap();
        let err = client.get("/projects/1").await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "404 Project Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_with_headers_exposes_pagination_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/1/merge_requests/2/discussions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .insert_header("x-next-page", "2"),
            )
            .mount(&server)
            .await;

        let client = GitLabClient::new(&server.uri(), "t", Duration::from_secs(5)).unwrap();
        let (data, headers) = client
            .get_with_headers("/projects/1/merge_requests/2/discussions")
            .await
            .unwrap();
        assert_eq!(data, json!([]));
        assert_eq!(headers.get("x-next-page").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_delete_reports_status_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v4/projects/1/pipelines/9"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = GitLabClient::new(&server.uri(), "t", Duration::from_secs(5)).unwrap();
        let (status, data) = client.delete("/projects/1/pipelines/9").await.unwrap();
        assert_eq!(status, 204);
        assert!(data.is_none());
    }
}
