use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status} from {method} {url}")]
    Status {
        status: StatusCode,
        method: Method,
        url: String,
        headers: HeaderMap,
        body: bytes::Bytes,
    },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Best-effort human readable message from a JSON error body.
    ///
    /// Looks at `message`, `error`, `detail` and the first entry of `errors`,
    /// falling back to the raw body text.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        if body.is_empty() {
            return None;
        }

        if let Ok(json) = serde_json::from_slice::<Value>(body) {
            for key in ["message", "error", "detail"] {
                match json.get(key) {
                    Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                    Some(Value::Object(obj)) => {
                        if let Some(Value::String(s)) = obj.get("message") {
                            return Some(s.clone());
                        }
                    }
                    _ => {}
                }
            }

            if let Some(first) = json
                .get("errors")
                .and_then(|e| e.as_array())
                .and_then(|a| a.first())
            {
                return match first {
                    Value::String(s) => Some(s.clone()),
                    other => other
                        .get("message")
                        .and_then(|m| m.as_str())
                        .map(|s| s.to_string()),
                };
            }
        }

        Some(String::from_utf8_lossy(body).trim().to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
