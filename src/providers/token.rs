use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::provider::{parse_args, Provider, ProviderError, Result, Tool, ToolType};
use crate::huddle01::{ApiRequest, Huddle01Client};

#[derive(Debug, Deserialize)]
struct TokenArgs {
    token_data: Map<String, Value>,
}

/// Issues room access tokens for peers.
pub struct TokenProvider {
    client: Arc<Huddle01Client>,
}

impl TokenProvider {
    pub fn new(client: Arc<Huddle01Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for TokenProvider {
    fn namespace(&self) -> &str {
        "token"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![Tool {
            name: "token.generate".into(),
            description: "Generate an access token for joining a room".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "token_data": {
                        "type": "object",
                        "description": "Token request, e.g. roomId, role and permissions",
                        "additionalProperties": true
                    }
                },
                "required": ["token_data"]
            }),
            tool_type: ToolType::Actionable,
        }]
    }

    async fn call(&self, tool: &str, params: Value) -> Result<Value> {
        match tool {
            "token.generate" => {
                let args: TokenArgs = parse_args(params)?;
                let request =
                    ApiRequest::post("/access-token").with_body(Value::Object(args.token_data));
                Ok(self.client.perform(request).await?)
            }
            _ => Err(ProviderError::NotFound(tool.into())),
        }
    }
}
