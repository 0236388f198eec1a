use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::core::provider::{parse_args, Provider, ProviderError, Result, Tool, ToolType};
use crate::huddle01::{ApiRequest, Huddle01Client};
use crate::providers::{id_property, ParticipantArgs, RoomArgs};

pub struct ParticipantProvider {
    client: Arc<Huddle01Client>,
}

impl ParticipantProvider {
    pub fn new(client: Arc<Huddle01Client>) -> Self {
        Self { client }
    }
}

fn participant_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "room_id": id_property("The room id"),
            "participant_id": id_property("The participant (peer) id")
        },
        "required": ["room_id", "participant_id"]
    })
}

#[async_trait]
impl Provider for ParticipantProvider {
    fn namespace(&self) -> &str {
        "participant"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "participant.list".into(),
                description: "Participants currently in a room".into(),
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
                name: "participant.remove".into(),
                description: "Remove a participant from a room".into(),
                input_schema: participant_schema(),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "participant.mute".into(),
                description: "Mute a participant".into(),
                input_schema: participant_schema(),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "participant.unmute".into(),
                description: "Unmute a participant".into(),
                input_schema: participant_schema(),
                tool_type: ToolType::Actionable,
            },
        ]
    }

    async fn call(&self, tool: &str, params: Value) -> Result<Value> {
        let request = match tool {
            "participant.list" => {
                let args: RoomArgs = parse_args(params)?;
                ApiRequest::get(format!("/rooms/{}/participants", args.room_id))
            }
            "participant.remove" => {
                let args: ParticipantArgs = parse_args(params)?;
                ApiRequest::delete(format!(
                    "/rooms/{}/participants/{}",
                    args.room_id, args.participant_id
                ))
            }
            "participant.mute" | "participant.unmute" => {
                let args: ParticipantArgs = parse_args(params)?;
                let action = if tool == "participant.mute" { "mute" } else { "unmute" };
                ApiRequest::post(format!(
                    "/rooms/{}/participants/{}/{}",
                    args.room_id, args.participant_id, action
                ))
            }
            _ => return Err(ProviderError::NotFound(tool.into())),
        };
        Ok(self.client.perform(request).await?)
    }
}

// ========================================================================= //
// TDD Tests                                                                 //
// ========================================================================= //
