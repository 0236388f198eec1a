use serde_json::{json, Value};

/// Outcome of a single Huddle01 call.
pub type ApiResult = std::result::Result<Value, ApiError>;

/// Every way a call can fail, as seen by the tool caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The request never completed: refused, timed out, DNS, broken stream.
    Transport(String),
    /// Anything else, including an undecodable 2xx body.
    Unexpected(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Transport(msg) => write!(f, "HTTP error: {}", msg),
            ApiError::Unexpected(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `{error, status_code?}` record handed back to tool callers.
    pub fn to_payload(&self) -> Value {
        match self.status_code() {
            Some(status) => json!({ "error": self.to_string(), "status_code": status }),
            None => json!({ "error": self.to_string() }),
        }
    }

    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        ApiError::Unexpected(err.to_string())
    }
}

/// Classify a reqwest failure.
///
/// Body decoding and request construction fall into the unexpected bucket;
/// everything that happens on the wire is a transport error.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_builder() {
            ApiError::Unexpected(err.to_string())
        } else if err.is_timeout()
            || err.is_connect()
            || err.is_request()
            || err.is_body()
            || err.is_redirect()
        {
            ApiError::Transport(err.to_string())
        } else {
            ApiError::Unexpected(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Unexpected(err.to_string())
    }
}
