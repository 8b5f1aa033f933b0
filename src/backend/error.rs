use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status} ({error_type}): {message}")]
    Status {
        status: u16,
        error_type: String,
        message: String,
    },
    #[error("access token rejected by the server")]
    Unauthorized,
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("credential store: {0}")]
    Credentials(String),
}

impl From<ureq::Error> for BackendError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(401, _) => Self::Unauthorized,
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                let (error_type, message) = parse_error_body(&body);
                Self::Status {
                    status,
                    error_type,
                    message,
                }
            }
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Split the server's `{error_type, message}` error body. Bodies of any
/// other shape are passed through as the message.
pub(super) fn parse_error_body(body: &str) -> (String, String) {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let error_type = field("error_type").unwrap_or_else(|| "unknown".to_string());
    let message = field("message").unwrap_or_else(|| body.trim().to_string());
    (error_type, message)
}
