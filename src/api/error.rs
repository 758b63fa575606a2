use serde_json::Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("{}", status_text(*status, message.as_deref()))]
    Status { status: u16, message: Option<String> },
    #[error("invalid response: {0}")]
    Decode(String),
}

fn status_text(status: u16, message: Option<&str>) -> String {
    match message {
        Some(m) => m.to_string(),
        None => format!("HTTP {}", status),
    }
}

impl ApiError {
    /// Builds a status error, pulling `message` (or `error`) out of a JSON body.
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let message = body.and_then(|b| {
            ["message", "error"]
                .iter()
                .filter_map(|k| b.get(*k).and_then(|v| v.as_str()))
                .map(str::trim)
                .find(|s| !s.is_empty())
                .map(str::to_string)
        });
        ApiError::Status { status, message }
    }

    /// Text shown in place of a list that failed to load.
    pub fn user_message(&self, base_url: &str) -> String {
        match self {
            ApiError::Timeout => "The request took too long. Check your connection or whether the server is responding.".to_string(),
            ApiError::Transport(_) => format!(
                "Could not reach the server. Check that the base URL ({}) is correct and reachable.",
                base_url
            ),
            ApiError::Status { status: 404, .. } => {
                "Resource not found (404). The URL may be wrong or no longer exist.".to_string()
            }
            ApiError::Status {
                status: 500,
                message: None,
            } => "Internal server error (500).".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_wins_over_status() {
        let err = ApiError::from_status(409, Some(&json!({"message": "Liga duplicada"})));
        assert_eq!(err.to_string(), "Liga duplicada");
    }

    #[test]
    fn generic_status_text_without_body() {
        assert_eq!(ApiError::from_status(502, None).to_string(), "HTTP 502");
        let blank = ApiError::from_status(400, Some(&json!({"message": "  "})));
        assert_eq!(blank.to_string(), "HTTP 400");
    }

    #[test]
    fn error_field_is_a_fallback() {
        let err = ApiError::from_status(400, Some(&json!({"error": "bad input"})));
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn user_message_for_timeouts_and_not_found() {
        assert!(ApiError::Timeout.user_message("http://x").contains("took too long"));
        let nf = ApiError::from_status(404, None).user_message("http://x");
        assert!(nf.contains("404"));
        let conn = ApiError::Transport("refused".into()).user_message("http://x");
        assert!(conn.contains("http://x"));
    }
}
