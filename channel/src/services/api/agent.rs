//! # AI Agent Endpoints
//!
//! Out-of-band agent operations. Live chat goes through
//! [`crate::services::agent_socket`] instead.

use serde_json::Value;
use shared::{AgentActivationResponse, AgentMessageRequest, AgentMessageResponse};

use super::client::ApiClient;
use super::path_segment;
use crate::core::error::ApiError;

pub async fn send_message(
    client: &ApiClient,
    message: &str,
    room_id: &str,
) -> Result<AgentMessageResponse, ApiError> {
    let request = AgentMessageRequest {
        message: message.to_string(),
        room_id: room_id.to_string(),
    };
    client.post("/ai-agent/message", Some(&request)).await
}

pub async fn conversation_history(client: &ApiClient, room_id: &str) -> Result<Vec<Value>, ApiError> {
    client
        .get(&format!("/ai-agent/conversations/{}", path_segment(room_id)))
        .await
}

#[tracing::instrument(skip(client))]
pub async fn activate_agent(
    client: &ApiClient,
    room_id: &str,
) -> Result<AgentActivationResponse, ApiError> {
    client
        .post::<_, ()>(&format!("/ai-agent/activate/{}", path_segment(room_id)), None)
        .await
}

#[tracing::instrument(skip(client))]
pub async fn deactivate_agent(
    client: &ApiClient,
    room_id: &str,
) -> Result<AgentActivationResponse, ApiError> {
    client
        .post::<_, ()>(&format!("/ai-agent/deactivate/{}", path_segment(room_id)), None)
        .await
}
