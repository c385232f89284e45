//! # Media SDK Seam
//!
//! The real-time media transport and signaling belong to a third-party SDK.
//! This module defines the slice of that SDK the room bridge relies on:
//!
//! - [`MediaSdk`] creates rooms with fixed capability options
//! - [`MediaRoom`] is one live room handle (connect, tracks, participants)
//! - [`RoomEvent`] is what the SDK reports asynchronously
//!
//! An SDK adapter is handed to [`crate::bridge::room::RoomBridge`] as an
//! owned `Arc<dyn MediaSdk>`; nothing here is process-global.

use std::sync::Arc;

use async_trait::async_trait;
use shared::Participant;
use thiserror::Error;

/// Metadata marker identifying the AI agent among remote participants
pub const AGENT_METADATA_MARKER: &str = "ai_agent";

/// Video encoding preset (resolution, bitrate cap, framerate cap)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoPreset {
    pub width: u32,
    pub height: u32,
    pub max_bitrate: u32,
    pub max_framerate: f32,
}

impl VideoPreset {
    pub const H180: VideoPreset = VideoPreset::new(320, 180, 160_000, 15.0);
    pub const H360: VideoPreset = VideoPreset::new(640, 360, 450_000, 20.0);
    pub const H720: VideoPreset = VideoPreset::new(1280, 720, 1_700_000, 30.0);

    pub const fn new(width: u32, height: u32, max_bitrate: u32, max_framerate: f32) -> Self {
        Self {
            width,
            height,
            max_bitrate,
            max_framerate,
        }
    }
}

/// Options a room is created with
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOptions {
    /// Let the SDK pick subscribed video quality from the rendered size
    pub adaptive_stream: bool,
    /// Pause publishing layers nobody subscribes to
    pub dynacast: bool,
    /// Camera capture resolution
    pub capture_resolution: VideoPreset,
    /// Lower simulcast layers published alongside the capture resolution
    pub simulcast_layers: Vec<VideoPreset>,
    pub auto_subscribe: bool,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            adaptive_stream: true,
            dynacast: true,
            capture_resolution: VideoPreset::H720,
            simulcast_layers: vec![VideoPreset::H180, VideoPreset::H360],
            auto_subscribe: true,
        }
    }
}

/// SDK-side view of a participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantInfo {
    pub sid: String,
    pub identity: String,
    pub metadata: Option<String>,
    pub is_local: bool,
    pub microphone_enabled: bool,
    pub camera_enabled: bool,
    pub screen_share_enabled: bool,
}

impl ParticipantInfo {
    /// Simplified record for the room state. The local participant is never
    /// flagged as the agent.
    pub fn to_participant(&self) -> Participant {
        let is_agent = !self.is_local
            && self
                .metadata
                .as_deref()
                .is_some_and(|m| m.contains(AGENT_METADATA_MARKER));

        Participant {
            id: self.sid.clone(),
            name: self.identity.clone(),
            is_local: self.is_local,
            has_audio: self.microphone_enabled,
            has_video: self.camera_enabled,
            is_agent,
        }
    }
}

/// Asynchronous notifications raised by a room
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Connected,
    /// Raised on explicit leave, server kick, or transport loss alike
    Disconnected { reason: Option<String> },
    ParticipantConnected(ParticipantInfo),
    ParticipantDisconnected(ParticipantInfo),
    /// `quality` is the SDK's numeric code (1 = excellent .. 4 = poor)
    ConnectionQualityChanged {
        quality: u8,
        participant: ParticipantInfo,
    },
    RoomMetadataChanged(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Track operation failed: {0}")]
    Track(String),
}

/// One room handle
#[async_trait]
pub trait MediaRoom: Send + Sync {
    async fn connect(&self, server_url: &str, token: &str) -> Result<(), MediaError>;

    /// Leave the room. The SDK raises `Disconnected` afterwards.
    fn disconnect(&self);

    fn local_participant(&self) -> Option<ParticipantInfo>;

    fn remote_participants(&self) -> Vec<ParticipantInfo>;

    /// Signaling round-trip latency in milliseconds
    fn latency_ms(&self) -> f64;

    async fn set_microphone_enabled(&self, enabled: bool) -> Result<(), MediaError>;

    async fn set_camera_enabled(&self, enabled: bool) -> Result<(), MediaError>;

    async fn set_screen_share_enabled(&self, enabled: bool) -> Result<(), MediaError>;
}

/// A freshly created room and the stream of its events
pub struct RoomHandle {
    pub room: Arc<dyn MediaRoom>,
    pub events: async_channel::Receiver<RoomEvent>,
}

/// Factory for rooms
pub trait MediaSdk: Send + Sync {
    fn create_room(&self, options: RoomOptions) -> RoomHandle;
}
