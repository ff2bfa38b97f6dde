use crate::error::{ApiError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;

/// One outbound call as seen by the interceptors.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub url: String,
    /// Path as the caller wrote it, before the base URL was prepended.
    pub path: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestContext {
    /// Context for a fully resolved URL; the URL doubles as the caller's path.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            method,
            path: url.clone(),
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Insert a header by name. Names are matched case-insensitively.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn insert_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Other(format!("Invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Other(format!("Invalid value for header '{}': {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn has_authorization_header(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Only the caller's path is checked, so a base URL that happens to
    /// contain "logout" does not silence every 401.
    pub fn is_logout_request(&self) -> bool {
        self.path.contains("logout")
    }
}
