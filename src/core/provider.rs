use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::huddle01::ApiError;

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, PartialEq, Eq)]
pub enum ProviderError {
    /// The call reached a tool and produced an error record.
    Api(ApiError),
    NotFound(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Api(err) => write!(f, "{}", err),
            ProviderError::NotFound(msg) => write!(f, "Tool not found: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<ApiError> for ProviderError {
    fn from(err: ApiError) -> Self {
        ProviderError::Api(err)
    }
}

/// Defines whether a tool is observable (read-only) or actionable (mutates state)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolType {
    Observable,
    Actionable,
}

/// The definition of an exposed tool.
#[derive(Debug, Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub tool_type: ToolType,
}

/// The trait that must be implemented by all providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Unique namespace prefix: "room", "meeting", "recording"
    fn namespace(&self) -> &str;

    /// All tools this provider offers
    fn tools(&self) -> Vec<Tool>;

    /// Execute a tool call, return the decoded Huddle01 payload
    async fn call(&self, tool: &str, params: Value) -> Result<Value>;
}

/// Decode tool arguments into their typed form.
///
/// A missing `arguments` object is treated as `{}` so that tools whose fields
/// all have defaults can be called bare.
pub fn parse_args<T: DeserializeOwned>(params: Value) -> Result<T> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| ProviderError::Api(ApiError::unexpected(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Args {
        room_id: String,
        #[serde(default)]
        limit: Option<u32>,
    }

    #[test]
    fn test_parse_args() {
        let args: Args = parse_args(serde_json::json!({"room_id": "r1", "limit": 5})).unwrap();
        assert_eq!(args.room_id, "r1");
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn test_parse_args_missing_field_is_unexpected_error() {
        let err = parse_args::<Args>(Value::Null).unwrap_err();
        match err {
            ProviderError::Api(ApiError::Unexpected(msg)) => assert!(msg.contains("room_id")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProviderError::NotFound("room.nope".into()).to_string(),
            "Tool not found: room.nope"
        );
        assert_eq!(
            ProviderError::from(ApiError::Transport("timed out".into())).to_string(),
            "HTTP error: timed out"
        );
    }
}
