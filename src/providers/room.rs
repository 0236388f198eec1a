use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::provider::{parse_args, Provider, ProviderError, Result, Tool, ToolType};
use crate::huddle01::{ApiError, ApiRequest, Huddle01Client};
use crate::providers::{id_property, params_property, QueryArgs, RoomArgs};

/// Body of `POST /create-room`, forwarded as given.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomArgs {
    #[serde(default)]
    pub room_locked: bool,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct UpdateRoomArgs {
    room_id: String,
    update_data: Map<String, Value>,
}

pub struct RoomProvider {
    client: Arc<Huddle01Client>,
}

impl RoomProvider {
    pub fn new(client: Arc<Huddle01Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for RoomProvider {
    fn namespace(&self) -> &str {
        "room"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "room.create".into(),
                description: "Create a new Huddle01 room".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "roomLocked": {
                            "type": "boolean",
                            "description": "Whether peers must be admitted before joining (default false)"
                        },
                        "metadata": {
                            "type": "object",
                            "description": "Free-form room metadata, e.g. title or host wallets",
                            "additionalProperties": true
                        }
                    }
                }),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "room.get".into(),
                description: "Room details by id".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "room_id": id_property("The room id")
                    },
                    "required": ["room_id"]
                }),
                tool_type: ToolType::Observable,
            },
            Tool {
                name: "room.list".into(),
                description: "All rooms of the project".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "params": params_property("Query parameters, e.g. pagination")
                    }
                }),
                tool_type: ToolType::Observable,
            },
            Tool {
                name: "room.update".into(),
                description: "Update room settings".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "room_id": id_property("The room id"),
                        "update_data": {
                            "type": "object",
                            "description": "Fields to change",
                            "additionalProperties": true
                        }
                    },
                    "required": ["room_id", "update_data"]
                }),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "room.delete".into(),
                description: "Delete a room".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "room_id": id_property("The room id")
                    },
                    "required": ["room_id"]
                }),
                tool_type: ToolType::Actionable,
            },
        ]
    }

    async fn call(&self, tool: &str, params: Value) -> Result<Value> {
        let request = match tool {
            "room.create" => {
                let args: CreateRoomArgs = parse_args(params)?;
                let body = serde_json::to_value(&args).map_err(ApiError::from)?;
                ApiRequest::post("/create-room").with_body(body)
            }
            "room.get" => {
                let args: RoomArgs = parse_args(params)?;
                ApiRequest::get(format!("/rooms/{}", args.room_id))
            }
            "room.list" => {
                let args: QueryArgs = parse_args(params)?;
                ApiRequest::get("/rooms").with_query(args.params)
            }
            "room.update" => {
                let args: UpdateRoomArgs = parse_args(params)?;
                ApiRequest::patch(format!("/rooms/{}", args.room_id))
                    .with_body(Value::Object(args.update_data))
            }
            "room.delete" => {
                let args: RoomArgs = parse_args(params)?;
                ApiRequest::delete(format!("/rooms/{}", args.room_id))
            }
            _ => return Err(ProviderError::NotFound(tool.into())),
        };
        Ok(self.client.perform(request).await?)
    }
}

// ========================================================================= //
// TDD Tests                                                                 //
// ========================================================================= //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huddle01::client::tests::{test_client, UNREACHABLE};
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_room_provider_tools() {
        let provider = RoomProvider::new(Arc::new(test_client(UNREACHABLE)));
        assert_eq!(provider.namespace(), "room");
        let tools = provider.tools();
        assert_eq!(tools.len(), 5);
        let observable: Vec<_> = tools
            .iter()
            .filter(|t| t.tool_type == ToolType::Observable)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(observable, vec!["room.get", "room.list"]);
    }

    #[tokio::test]
    async fn test_create_room_forwards_body_and_returns_payload_unchanged() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/create-room")
                    .header("x-api-key", "test-key")
                    .header("x-project-id", "test-project")
                    .json_body(json!({"roomLocked": true, "metadata": {"topic": "standup"}}));
                then.status(200).json_body(json!({
                    "message": "Room created successfully",
                    "roomId": "abc123"
                }));
            })
            .await;

        let provider = RoomProvider::new(Arc::new(test_client(&server.base_url())));
        let result = provider
            .call(
                "room.create",
                json!({"roomLocked": true, "metadata": {"topic": "standup"}}),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({"message": "Room created successfully", "roomId": "abc123"})
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_room_defaults() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/create-room")
                    .json_body(json!({"roomLocked": false, "metadata": {}}));
                then.status(200).json_body(json!({"roomId": "r"}));
            })
            .await;

        let provider = RoomProvider::new(Arc::new(test_client(&server.base_url())));
        provider.call("room.create", Value::Null).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_room_is_repeatable() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/rooms/abc123");
                then.status(200)
                    .json_body(json!({"roomId": "abc123", "roomLocked": false}));
            })
            .await;

        let provider = RoomProvider::new(Arc::new(test_client(&server.base_url())));
        let first = provider.call("room.get", json!({"room_id": "abc123"})).await;
        let second = provider.call("room.get", json!({"room_id": "abc123"})).await;

        assert_eq!(first, second);
        assert!(first.is_ok());
        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test]
    async fn test_room_provider_call_not_found() {
        let provider = RoomProvider::new(Arc::new(test_client(UNREACHABLE)));
        let res = provider.call("room.doesnotexist", json!({})).await;
        assert!(matches!(res, Err(ProviderError::NotFound(_))));
    }
}
