//! # AI Channel Page
//!
//! One media room plus the agent chat, for the room named in the route.
//!
//! `initialize` fetches a media token and opens the agent socket;
//! `connect_room` then joins the room with that token. Failures land in
//! `ChannelState::connection_error` as one human-readable line.

use std::sync::Arc;

use shared::{ChatMessage, Participant, QualityMetrics, User};

use crate::app::router::Route;
use crate::app::state::ChannelState;
use crate::bridge::agent::{AgentBridge, AgentOptions};
use crate::bridge::room::{RoomBridge, RoomParams};
use crate::core::service::{MediaApi, Navigator};
use crate::services::media::MediaSdk;

pub const ROOM_INIT_FAILED: &str = "Failed to connect to the room. Please try again.";
pub const ROOM_CONNECT_FAILED: &str = "Failed to connect to LiveKit room.";

pub struct ChannelPage {
    pub state: ChannelState,
    user: Option<User>,
    media_server_url: String,
    media_api: Arc<dyn MediaApi>,
    sdk: Option<Arc<dyn MediaSdk>>,
    navigator: Arc<dyn Navigator>,
    agent: AgentBridge,
    room: Option<RoomBridge>,
}

impl ChannelPage {
    pub fn new(
        room_name: impl Into<String>,
        user: Option<User>,
        media_server_url: impl Into<String>,
        agent_options: AgentOptions,
        media_api: Arc<dyn MediaApi>,
        sdk: Option<Arc<dyn MediaSdk>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state: ChannelState::new(room_name),
            agent: AgentBridge::new(agent_options, user.clone()),
            user,
            media_server_url: media_server_url.into(),
            media_api,
            sdk,
            navigator,
            room: None,
        }
    }

    /// Fetch the media token and open the agent chat. Without a user this
    /// does nothing.
    pub async fn initialize(&mut self) -> bool {
        let Some(user) = self.user.clone() else {
            return false;
        };

        self.state.is_connecting = true;
        self.state.connection_error = None;

        let token = self
            .media_api
            .get_access_token(&self.state.room_name, &user.id)
            .await;
        let ok = match token {
            Ok(token) => {
                self.state.token = Some(token);
                if let Err(e) = self.agent.connect_to_agent().await {
                    tracing::warn!(error = %e, "Agent chat unavailable");
                }
                true
            }
            Err(e) => {
                tracing::error!(room = %self.state.room_name, error = %e, "Failed to initialize connection");
                self.state.connection_error = Some(ROOM_INIT_FAILED.to_string());
                false
            }
        };

        self.state.is_connecting = false;
        ok
    }

    /// Join the media room with the fetched token
    pub async fn connect_room(&mut self) -> bool {
        let Some(token) = self.state.token.clone() else {
            return false;
        };
        let Some(sdk) = self.sdk.clone() else {
            tracing::warn!("No media SDK adapter configured");
            self.state.connection_error = Some(ROOM_CONNECT_FAILED.to_string());
            return false;
        };

        let params = RoomParams {
            token,
            server_url: self.media_server_url.clone(),
            room_name: self.state.room_name.clone(),
        };
        if self.room.as_ref().is_some_and(|room| room.token() != params.token) {
            tracing::debug!(room = %params.room_name, "Media token changed, rebuilding room bridge");
            self.room = None;
        }
        let room = self
            .room
            .get_or_insert_with(|| RoomBridge::new(sdk, params));

        match room.connect().await {
            Ok(connected) => connected,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to room");
                self.state.connection_error = Some(ROOM_CONNECT_FAILED.to_string());
                false
            }
        }
    }

    /// Send the typed message as a command. Blank input and a closed agent
    /// connection leave the input untouched.
    pub fn send_chat(&mut self) -> bool {
        let content = self.state.message_input.trim().to_string();
        if content.is_empty() || !self.agent.is_connected() {
            return false;
        }
        let sent = self.agent.send_command(&content);
        if sent {
            self.state.message_input.clear();
        }
        sent
    }

    pub async fn toggle_audio(&mut self) {
        if let Some(room) = &self.room {
            if let Err(e) = room.toggle_microphone().await {
                tracing::warn!(error = %e, "Microphone toggle failed");
            }
        }
        self.state.audio_enabled = !self.state.audio_enabled;
    }

    pub async fn toggle_video(&mut self) {
        if let Some(room) = &self.room {
            if let Err(e) = room.toggle_camera().await {
                tracing::warn!(error = %e, "Camera toggle failed");
            }
        }
        self.state.video_enabled = !self.state.video_enabled;
    }

    pub async fn toggle_screen_share(&mut self) {
        if let Some(room) = &self.room {
            if let Err(e) = room.toggle_screen_share().await {
                tracing::warn!(error = %e, "Screen share toggle failed");
            }
        }
        self.state.screen_sharing = !self.state.screen_sharing;
    }

    /// Leave both the room and the chat, then go back to the dashboard
    pub fn leave(&mut self) {
        self.leave_quietly();
        self.navigator.navigate(Route::Dashboard);
    }

    /// Tear down room and chat without navigating
    pub fn leave_quietly(&mut self) {
        if let Some(room) = self.room.take() {
            room.disconnect();
        }
        self.agent.disconnect();
    }

    pub fn dismiss_error(&mut self) {
        self.state.connection_error = None;
        if let Some(room) = &self.room {
            room.clear_error();
        }
    }

    pub fn is_room_connected(&self) -> bool {
        self.room.as_ref().is_some_and(|r| r.is_connected())
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.room.as_ref().map(|r| r.participants()).unwrap_or_default()
    }

    pub fn quality(&self) -> Option<QualityMetrics> {
        self.room.as_ref().map(|r| r.quality())
    }

    pub fn agent(&self) -> &AgentBridge {
        &self.agent
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.agent.messages()
    }
}
