pub mod analytics;
pub mod meeting;
pub mod participant;
pub mod recording;
pub mod room;
pub mod token;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::registry::ProviderRegistry;
use crate::huddle01::Huddle01Client;

/// Build the full tool catalog on top of one shared client.
pub fn build_registry(client: Arc<Huddle01Client>) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(room::RoomProvider::new(client.clone())));
    registry.register(Box::new(meeting::MeetingProvider::new(client.clone())));
    registry.register(Box::new(participant::ParticipantProvider::new(client.clone())));
    registry.register(Box::new(token::TokenProvider::new(client.clone())));
    registry.register(Box::new(recording::RecordingProvider::new(client.clone())));
    registry.register(Box::new(analytics::AnalyticsProvider::new(client)));
    registry
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoomArgs {
    pub room_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParticipantArgs {
    pub room_id: String,
    pub participant_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordingArgs {
    pub recording_id: String,
}

/// Optional query-string parameters for list and analytics calls.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryArgs {
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

fn id_property(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

fn params_property(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "description": description,
        "additionalProperties": true
    })
}

// ========================================================================= //
// Catalog Tests                                                             //
// ========================================================================= //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::ProviderError;
    use crate::huddle01::client::tests::{test_client, UNREACHABLE};
    use crate::huddle01::{ApiError, HttpMethod};
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;

    struct Case {
        tool: &'static str,
        args: Value,
        method: HttpMethod,
        path: &'static str,
        body: Option<Value>,
        query: Option<(&'static str, &'static str)>,
    }

    fn case(tool: &'static str, args: Value, method: HttpMethod, path: &'static str) -> Case {
        Case {
            tool,
            args,
            method,
            path,
            body: None,
            query: None,
        }
    }

    fn catalog() -> Vec<Case> {
        use HttpMethod::*;
        let room = || json!({"room_id": "R1"});
        let participant = || json!({"room_id": "R1", "participant_id": "P1"});
        let recording = || json!({"recording_id": "REC1"});
        let query = || json!({"params": {"limit": 5}});

        vec![
            Case {
                body: Some(json!({"roomLocked": true, "metadata": {"title": "sync"}})),
                ..case(
                    "room.create",
                    json!({"roomLocked": true, "metadata": {"title": "sync"}}),
                    Post,
                    "/create-room",
                )
            },
            case("room.get", room(), Get, "/rooms/R1"),
            Case {
                query: Some(("limit", "5")),
                ..case("room.list", query(), Get, "/rooms")
            },
            Case {
                body: Some(json!({"roomLocked": false})),
                ..case(
                    "room.update",
                    json!({"room_id": "R1", "update_data": {"roomLocked": false}}),
                    Patch,
                    "/rooms/R1",
                )
            },
            case("room.delete", room(), Delete, "/rooms/R1"),
            case("meeting.start", room(), Post, "/rooms/R1/start"),
            case("meeting.end", room(), Post, "/rooms/R1/end"),
            case("meeting.get", room(), Get, "/rooms/R1/meeting"),
            case("participant.list", room(), Get, "/rooms/R1/participants"),
            case("participant.remove", participant(), Delete, "/rooms/R1/participants/P1"),
            case("participant.mute", participant(), Post, "/rooms/R1/participants/P1/mute"),
            case("participant.unmute", participant(), Post, "/rooms/R1/participants/P1/unmute"),
            Case {
                body: Some(json!({"roomId": "R1", "role": "host"})),
                ..case(
                    "token.generate",
                    json!({"token_data": {"roomId": "R1", "role": "host"}}),
                    Post,
                    "/access-token",
                )
            },
            Case {
                body: Some(json!({"roomId": "R1"})),
                ..case(
                    "recording.start",
                    json!({"recording_data": {"roomId": "R1"}}),
                    Post,
                    "/recordings/start",
                )
            },
            case("recording.stop", recording(), Post, "/recordings/REC1/stop"),
            Case {
                query: Some(("limit", "5")),
                ..case("recording.list", query(), Get, "/recordings")
            },
            case("recording.get", recording(), Get, "/recordings/REC1"),
            Case {
                query: Some(("limit", "5")),
                ..case(
                    "analytics.room",
                    json!({"room_id": "R1", "params": {"limit": 5}}),
                    Get,
                    "/analytics/rooms/R1",
                )
            },
            Case {
                query: Some(("limit", "5")),
                ..case("analytics.project", query(), Get, "/analytics/project")
            },
        ]
    }

    async fn mock_case<'a>(server: &'a MockServer, case: &Case, status: u16) -> httpmock::Mock<'a> {
        let method = case.method;
        let path = case.path;
        let body = case.body.clone();
        let query = case.query;
        let tool = case.tool;
        server
            .mock_async(move |when, then| {
                let when = match method {
                    HttpMethod::Get => when.method(GET),
                    HttpMethod::Post => when.method(POST),
                    HttpMethod::Patch => when.method(PATCH),
                    HttpMethod::Delete => when.method(DELETE),
                };
                let when = when
                    .path(path)
                    .header("x-api-key", "test-key")
                    .header("x-project-id", "test-project");
                let when = match body {
                    Some(body) => when.json_body(body),
                    None => when,
                };
                if let Some((key, value)) = query {
                    when.query_param(key, value);
                }
                if status < 300 {
                    then.status(status).json_body(json!({"tool": tool}));
                } else {
                    then.status(status).body(format!("{} failed", tool));
                }
            })
            .await
    }

    #[test]
    fn test_catalog_is_complete() {
        let registry = build_registry(Arc::new(test_client(UNREACHABLE)));
        let names: Vec<String> = registry.list_tools().into_iter().map(|t| t.name).collect();
        let expected: Vec<&str> = catalog().iter().map(|c| c.tool).collect();
        assert_eq!(names.len(), expected.len());
        for name in expected {
            assert!(names.iter().any(|n| n == name), "missing {name}");
        }
    }

    #[tokio::test]
    async fn test_every_tool_returns_provider_payload_on_success() {
        for case in catalog() {
            let server = MockServer::start_async().await;
            let mock = mock_case(&server, &case, 200).await;
            let registry = build_registry(Arc::new(test_client(&server.base_url())));

            let result = registry.call_tool(case.tool, case.args.clone()).await;

            assert_eq!(result.unwrap(), json!({"tool": case.tool}), "{}", case.tool);
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_every_tool_reports_http_status_errors() {
        for case in catalog() {
            let server = MockServer::start_async().await;
            let mock = mock_case(&server, &case, 404).await;
            let registry = build_registry(Arc::new(test_client(&server.base_url())));

            let err = match registry.call_tool(case.tool, case.args.clone()).await {
                Err(ProviderError::Api(err)) => err,
                other => panic!("{}: expected api error, got {:?}", case.tool, other),
            };

            let payload = err.to_payload();
            assert_eq!(payload["status_code"], 404, "{}", case.tool);
            let message = payload["error"].as_str().unwrap();
            assert!(message.contains("404"), "{}", case.tool);
            assert!(message.contains(&format!("{} failed", case.tool)));
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_every_tool_reports_transport_errors_without_status() {
        let registry = build_registry(Arc::new(test_client(UNREACHABLE)));
        for case in catalog() {
            let err = match registry.call_tool(case.tool, case.args.clone()).await {
                Err(ProviderError::Api(err)) => err,
                other => panic!("{}: expected api error, got {:?}", case.tool, other),
            };
            assert!(matches!(err, ApiError::Transport(_)), "{}: {:?}", case.tool, err);
            assert!(err.to_payload().get("status_code").is_none());
        }
    }

    #[tokio::test]
    async fn test_bad_arguments_never_reach_the_api() {
        let server = MockServer::start_async().await;
        let catch_all = server
            .mock_async(|_when, then| {
                then.status(200).json_body(json!({}));
            })
            .await;
        let registry = build_registry(Arc::new(test_client(&server.base_url())));

        for tool in ["room.get", "participant.mute", "recording.stop", "room.update"] {
            let result = registry.call_tool(tool, json!({"room_id": 42})).await;
            match result {
                Err(ProviderError::Api(ApiError::Unexpected(_))) => {}
                other => panic!("{tool}: expected unexpected error, got {other:?}"),
            }
        }
        assert_eq!(catch_all.hits_async().await, 0);
    }
}
