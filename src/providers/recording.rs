use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::provider::{parse_args, Provider, ProviderError, Result, Tool, ToolType};
use crate::huddle01::{ApiRequest, Huddle01Client};
use crate::providers::{id_property, params_property, QueryArgs, RecordingArgs};

#[derive(Debug, Deserialize)]
struct StartRecordingArgs {
    recording_data: Map<String, Value>,
}

pub struct RecordingProvider {
    client: Arc<Huddle01Client>,
}

impl RecordingProvider {
    pub fn new(client: Arc<Huddle01Client>) -> Self {
        Self { client }
    }
}

fn recording_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "recording_id": id_property("The recording id")
        },
        "required": ["recording_id"]
    })
}

#[async_trait]
impl Provider for RecordingProvider {
    fn namespace(&self) -> &str {
        "recording"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "recording.start".into(),
                description: "Start recording a room".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "recording_data": {
                            "type": "object",
                            "description": "Recording request, e.g. roomId and layout",
                            "additionalProperties": true
                        }
                    },
                    "required": ["recording_data"]
                }),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "recording.stop".into(),
                description: "Stop a running recording".into(),
                input_schema: recording_schema(),
                tool_type: ToolType::Actionable,
            },
            Tool {
                name: "recording.list".into(),
                description: "Recordings of the project".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "params": params_property("Query parameters, e.g. pagination or room filter")
                    }
                }),
                tool_type: ToolType::Observable,
            },
            Tool {
                name: "recording.get".into(),
                description: "Recording details by id".into(),
                input_schema: recording_schema(),
                tool_type: ToolType::Observable,
            },
        ]
    }

    async fn call(&self, tool: &str, params: Value) -> Result<Value> {
        let request = match tool {
            "recording.start" => {
                let args: StartRecordingArgs = parse_args(params)?;
                ApiRequest::post("/recordings/start").with_body(Value::Object(args.recording_data))
            }
            "recording.stop" => {
                let args: RecordingArgs = parse_args(params)?;
                ApiRequest::post(format!("/recordings/{}/stop", args.recording_id))
            }
            "recording.list" => {
                let args: QueryArgs = parse_args(params)?;
                ApiRequest::get("/recordings").with_query(args.params)
            }
            "recording.get" => {
                let args: RecordingArgs = parse_args(params)?;
                ApiRequest::get(format!("/recordings/{}", args.recording_id))
            }
            _ => return Err(ProviderError::NotFound(tool.into())),
        };
        Ok(self.client.perform(request).await?)
    }
}
