//! # Media Room Data Transfer Objects
//!
//! State published by the room bridge, plus the REST payloads used to obtain
//! media access tokens and manage rooms.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordinal connection quality label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionQuality {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl ConnectionQuality {
    /// Map the media SDK's numeric quality code to a label.
    ///
    /// `1` is the best; anything outside `1..=3` is treated as poor.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ConnectionQuality::Excellent,
            2 => ConnectionQuality::Good,
            3 => ConnectionQuality::Fair,
            _ => ConnectionQuality::Poor,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub connection_quality: ConnectionQuality,
    /// Round-trip latency in milliseconds
    pub latency: f64,
    /// Not measured; stays 0
    pub bandwidth: f64,
}

/// Simplified participant record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub is_local: bool,
    pub has_audio: bool,
    pub has_video: bool,
    pub is_agent: bool,
}

/// Room state store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    pub is_connected: bool,
    pub room_name: Option<String>,
    pub participants: Vec<Participant>,
    pub quality: QualityMetrics,
    pub error: Option<String>,
}

impl RoomState {
    pub fn connect_start(&mut self, room_name: impl Into<String>) {
        self.room_name = Some(room_name.into());
        self.error = None;
    }

    pub fn connect_success(&mut self) {
        self.is_connected = true;
        self.error = None;
    }

    pub fn connect_failure(&mut self, error: impl Into<String>) {
        self.is_connected = false;
        self.error = Some(error.into());
    }

    /// Wholesale reset; quality metrics keep their last value
    pub fn disconnect(&mut self) {
        self.is_connected = false;
        self.room_name = None;
        self.participants.clear();
        self.error = None;
    }

    pub fn update_participants(&mut self, participants: Vec<Participant>) {
        self.participants = participants;
    }

    pub fn update_quality(&mut self, quality: QualityMetrics) {
        self.quality = quality;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Local media preferences edited on the settings page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaSettings {
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub screen_share_enabled: bool,
    #[serde(default)]
    pub audio_device_id: String,
    #[serde(default)]
    pub video_device_id: String,
    #[serde(default)]
    pub audio_output_device_id: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            video_enabled: true,
            screen_share_enabled: false,
            audio_device_id: String::new(),
            video_device_id: String::new(),
            audio_output_device_id: String::new(),
        }
    }
}

/// `POST /livekit/token` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest {
    pub room_name: String,
    pub participant_name: String,
}

/// `POST /livekit/token` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenResponse {
    pub token: String,
}

/// `POST /livekit/rooms` request. Extra room options are flattened in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: String,
    #[serde(flatten)]
    pub options: serde_json::Map<String, Value>,
}

/// `POST /ai-agent/message` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessageRequest {
    pub message: String,
    pub room_id: String,
}

/// `POST /ai-agent/message` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentMessageResponse {
    pub response: String,
}

/// `POST /ai-agent/{activate,deactivate}/{room}` response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentActivationResponse {
    pub success: bool,
}
