//! # Media Room Endpoints
//!
//! Access tokens for the media server and room management.

use serde_json::{Map, Value};
use shared::{AccessTokenRequest, AccessTokenResponse, CreateRoomRequest};

use super::client::ApiClient;
use super::path_segment;
use crate::core::error::ApiError;

/// Request a media access token for `participant_name` in `room_name`.
#[tracing::instrument(skip(client))]
pub async fn get_access_token(
    client: &ApiClient,
    room_name: &str,
    participant_name: &str,
) -> Result<String, ApiError> {
    let request = AccessTokenRequest {
        room_name: room_name.to_string(),
        participant_name: participant_name.to_string(),
    };

    client
        .post::<AccessTokenResponse, _>("/livekit/token", Some(&request))
        .await
        .map(|r| r.token)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to get access token"))
}

pub async fn get_room_info(client: &ApiClient, room_name: &str) -> Result<Value, ApiError> {
    client
        .get(&format!("/livekit/rooms/{}", path_segment(room_name)))
        .await
}

pub async fn create_room(
    client: &ApiClient,
    room_name: &str,
    options: Map<String, Value>,
) -> Result<Value, ApiError> {
    let request = CreateRoomRequest {
        room_name: room_name.to_string(),
        options,
    };
    client.post("/livekit/rooms", Some(&request)).await
}

pub async fn delete_room(client: &ApiClient, room_name: &str) -> Result<(), ApiError> {
    client
        .delete(&format!("/livekit/rooms/{}", path_segment(room_name)))
        .await
}
