use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::provider::{parse_args, Provider, ProviderError, Result, Tool, ToolType};
use crate::huddle01::{ApiRequest, Huddle01Client};
use crate::providers::{id_property, params_property, QueryArgs};

#[derive(Debug, Deserialize)]
struct RoomAnalyticsArgs {
    room_id: String,
    #[serde(default)]
    params: Option<Map<String, Value>>,
}

pub struct AnalyticsProvider {
    client: Arc<Huddle01Client>,
}

impl AnalyticsProvider {
    pub fn new(client: Arc<Huddle01Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for AnalyticsProvider {
    fn namespace(&self) -> &str {
        "analytics"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "analytics.room".into(),
                description: "Usage analytics for one room".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "room_id": id_property("The room id"),
                        "params": params_property("Query parameters, e.g. date range")
                    },
                    "required": ["room_id"]
                }),
                tool_type: ToolType::Observable,
            },
            Tool {
                name: "analytics.project".into(),
                description: "Usage analytics for the whole project".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "params": params_property("Query parameters, e.g. date range")
                    }
                }),
                tool_type: ToolType::Observable,
            },
        ]
    }

    async fn call(&self, tool: &str, params: Value) -> Result<Value> {
        let request = match tool {
            "analytics.room" => {
                let args: RoomAnalyticsArgs = parse_args(params)?;
                ApiRequest::get(format!("/analytics/rooms/{}", args.room_id)).with_query(args.params)
            }
            "analytics.project" => {
                let args: QueryArgs = parse_args(params)?;
                ApiRequest::get("/analytics/project").with_query(args.params)
            }
            _ => return Err(ProviderError::NotFound(tool.into())),
        };
        Ok(self.client.perform(request).await?)
    }
}
