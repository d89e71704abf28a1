//! Tool handlers, one module per GitLab domain. Each handler deserializes
//! its arguments, performs the API call(s) through the data access port, and
//! wraps the result in the uniform response envelope.

pub mod issues;
pub mod jobs;
pub mod merge_requests;
pub mod pipelines;
pub mod projects;
pub mod repository;
pub mod user;

use url::form_urlencoded;

/// Ordered query-string builder.
#[derive(Default)]
pub(crate) struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: &str, value: impl ToString) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    pub fn append_opt(&mut self, key: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.append(key, value);
        }
    }

    pub fn finish(self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// `?{query}` when any pair was appended, empty string otherwise.
    pub fn suffix(self) -> String {
        if self.pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", self.finish())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_preserves_order_and_encodes() {
        let mut query = Query::new();
        query.append("source_branch", "feature/x y");
        query.append("state", "opened");
        query.append_opt("search", None::<&str>);
        query.append_opt("per_page", Some(1));
        assert_eq!(
            query.finish(),
            "source_branch=feature%2Fx+y&state=opened&per_page=1"
        );
    }

    #[test]
    fn test_query_suffix_empty_when_no_pairs() {
        assert_eq!(Query::new().suffix(), "");

        let mut query = Query::new();
        query.append("view", "inline");
        assert_eq!(query.suffix(), "?view=inline");
    }
}
