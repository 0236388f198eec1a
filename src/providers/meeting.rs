use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::core::provider::{parse_args, Provider, ProviderError, Result, Tool, ToolType};
use crate::huddle01::{ApiRequest, Huddle01Client};
use crate::providers::{id_property, RoomArgs};

/// Meeting sessions live under a room: `/rooms/{id}/start|end|meeting`.
pub struct MeetingProvider {
    client: Arc<Huddle01Client>,
}

impl MeetingProvider {
    pub fn new(client: Arc<Huddle01Client>) -> Self {
        Self { client }
    }
}

fn room_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "room_id": id_property("The room hosting the meeting")
        },
        "required": ["room_id"]
    })
}

#[async_trait]
impl Provider for MeetingProvider {
    fn namespace(&self) -> &str {
        "meeting"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "meeting.start".into(),
                description: "Start a meeting session in a room".into(),
                input_schema: room_schema(),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "meeting.end".into(),
                description: "End the running meeting session of a room".into(),
                input_schema: room_schema(),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "meeting.get".into(),
                description: "Current meeting session details of a room".into(),
                input_schema: room_schema(),
                tool_type: ToolType::Observable,
            },
        ]
    }

    async fn call(&self, tool: &str, params: Value) -> Result<Value> {
        let action = match tool {
            "meeting.start" => "start",
            "meeting.end" => "end",
            "meeting.get" => "meeting",
            _ => return Err(ProviderError::NotFound(tool.into())),
        };
        let args: RoomArgs = parse_args(params)?;
        let endpoint = format!("/rooms/{}/{}", args.room_id, action);
        let request = if tool == "meeting.get" {
            ApiRequest::get(endpoint)
        } else {
            ApiRequest::post(endpoint)
        };
        Ok(self.client.perform(request).await?)
    }
}
