use reqwest::{Response, StatusCode};
use serde::Deserialize;

#[derive(Debug)]
pub enum MemoApiError {
    Api(StatusCode, String),
    Http(reqwest::Error),
}

impl From<reqwest::Error> for MemoApiError {
    fn from(value: reqwest::Error) -> Self {
        MemoApiError::Http(value)
    }
}

impl std::fmt::Display for MemoApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoApiError::Api(status, detail) => write!(f, "({}) {}", status, detail),
            MemoApiError::Http(e) => write!(f, "HTTP error: {}", e),
        }
    }
}

impl std::error::Error for MemoApiError {}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Fold a non-success response into `MemoApiError::Api`, preferring the
/// server's `detail` field over the raw body.
pub(crate) async fn api_error(response: Response) -> MemoApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let detail = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => match parsed.detail {
            serde_json::Value::String(detail) => detail,
            other => other.to_string(),
        },
        Err(_) if body.is_empty() => format!("Request failed with status {}", status),
        Err(_) => body,
    };

    MemoApiError::Api(status, detail)
}
