use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

pub mod client;

pub use client::{HttpConfig, HttpPageFetcher};

/// Everything needed to issue one page GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// URL safe to write to logs (credentials stripped).
    pub log_url: String,
}

impl PageRequest {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        PageRequest {
            log_url: url.clone(),
            url,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }

    pub fn with_log_url(mut self, log_url: impl Into<String>) -> Self {
        self.log_url = log_url.into();
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Fetches one page of raw records. Implementations perform exactly one
/// outbound request per call.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>, FetchError>;
}

/// Unwraps a top-level JSON array; anything else is a shape failure.
pub fn into_records(body: Value, url: &str) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(items) => Ok(items),
        other => Err(FetchError::UnexpectedShape {
            url: url.to_string(),
            found: json_type_name(&other),
        }),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_only_top_level_arrays() {
        let items = into_records(json!([{"a": 1}, {"a": 2}]), "u").unwrap();
        assert_eq!(items.len(), 2);

        let err = into_records(json!({"error": "bad key"}), "u").unwrap_err();
        assert!(matches!(
            err,
            FetchError::UnexpectedShape {
                found: "object",
                ..
            }
        ));
    }

    #[test]
    fn builds_query_and_headers() {
        let req = PageRequest::new("https://x.test/history")
            .with_query("limit", 100)
            .with_query("offset", 200u64)
            .with_header("Authorization", "k");

        assert_eq!(req.query_value("limit"), Some("100"));
        assert_eq!(req.query_value("offset"), Some("200"));
        assert_eq!(req.headers, vec![("Authorization".into(), "k".into())]);
        assert_eq!(req.log_url, "https://x.test/history");
    }
}
