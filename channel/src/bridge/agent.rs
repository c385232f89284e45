//! # Agent Bridge
//!
//! Chat with the AI agent over one WebSocket.
//!
//! Commands are appended to the log optimistically and remembered as pending
//! echoes; when the service echoes a frame with the same id it is not appended
//! twice. A `response` frame ends the "thinking" state.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use shared::{now_iso, now_millis, AIAgentMessage, AgentMessageType, ChatMessage, ChatSender, User};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::config::ChannelConfig;
use crate::core::error::{AppError, Result};
use crate::services::agent_socket::{agent_url, AgentSocket, SocketEvent};

pub const CONNECT_FAILED: &str = "Failed to connect to AI Agent";
pub const NO_RESPONSE: &str = "AI agent did not respond";

#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    pub websocket_url: String,
    pub api_key: String,
    /// How long a command may wait for a response before the thinking state
    /// is dropped. `None` waits forever.
    pub processing_timeout: Option<Duration>,
}

impl AgentOptions {
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self {
            websocket_url: config.websocket_url.clone(),
            api_key: config.agent_api_key.clone(),
            processing_timeout: config.processing_timeout,
        }
    }
}

/// Snapshot published to the page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentState {
    pub is_connected: bool,
    pub messages: Vec<ChatMessage>,
    pub is_processing: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct AgentInner {
    state: AgentState,
    socket: Option<AgentSocket>,
    opening: bool,
    generation: u64,
    pending_echoes: HashSet<String>,
    outstanding_command: Option<String>,
}

struct AgentShared {
    inner: RwLock<AgentInner>,
    user_name: Option<String>,
}

impl AgentShared {
    fn apply_frame(&self, text: &str) {
        let message: AIAgentMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Failed to parse AI agent message");
                return;
            }
        };

        let mut inner = self.inner.write();
        if message.message_type == AgentMessageType::Response {
            inner.state.is_processing = false;
            inner.outstanding_command = None;
        }
        if inner.pending_echoes.remove(&message.id) {
            trace!(id = %message.id, "Echo of local command confirmed");
            return;
        }
        debug!(id = %message.id, kind = ?message.message_type, "Agent message received");
        inner
            .state
            .messages
            .push(ChatMessage::from_agent(&message, self.user_name.as_deref()));
    }

    fn apply_event(&self, generation: u64, event: SocketEvent) -> bool {
        if self.inner.read().generation != generation {
            return false;
        }
        match event {
            SocketEvent::Frame(text) => {
                self.apply_frame(&text);
                true
            }
            SocketEvent::Error(e) => {
                error!(error = %e, "AI Agent WebSocket error");
                let mut inner = self.inner.write();
                inner.state.error = Some(CONNECT_FAILED.to_string());
                inner.state.is_connected = false;
                true
            }
            SocketEvent::Closed { code, reason } => {
                info!(code = ?code, reason = ?reason, "Disconnected from AI Agent");
                let mut inner = self.inner.write();
                inner.state.is_connected = false;
                inner.socket = None;
                inner.pending_echoes.clear();
                false
            }
        }
    }

    fn expire_command(&self, id: &str) {
        let mut inner = self.inner.write();
        if inner.outstanding_command.as_deref() != Some(id) {
            return;
        }
        warn!(id, "No response from AI agent before timeout");
        inner.outstanding_command = None;
        inner.state.is_processing = false;
        inner.state.error = Some(NO_RESPONSE.to_string());
    }
}

async fn pump_events(
    shared: Arc<AgentShared>,
    generation: u64,
    mut events: mpsc::UnboundedReceiver<SocketEvent>,
) {
    while let Some(event) = events.recv().await {
        if !shared.apply_event(generation, event) {
            break;
        }
    }
    trace!(generation, "Agent event pump ended");
}

pub struct AgentBridge {
    options: AgentOptions,
    user: Option<User>,
    shared: Arc<AgentShared>,
}

impl AgentBridge {
    pub fn new(options: AgentOptions, user: Option<User>) -> Self {
        let user_name = user.as_ref().map(|u| u.name.clone());
        Self {
            options,
            user,
            shared: Arc::new(AgentShared {
                inner: RwLock::new(AgentInner::default()),
                user_name,
            }),
        }
    }

    /// Open the socket. `Ok(false)` when there is no user or URL, or a socket
    /// is already open or opening.
    pub async fn connect_to_agent(&self) -> Result<bool> {
        let Some(user) = &self.user else {
            return Ok(false);
        };
        if self.options.websocket_url.is_empty() {
            return Ok(false);
        }

        let generation = {
            let mut inner = self.shared.inner.write();
            if inner.socket.is_some() || inner.opening {
                return Ok(false);
            }
            inner.opening = true;
            inner.generation += 1;
            inner.generation
        };

        let result = match agent_url(&self.options.websocket_url, &self.options.api_key, &user.id) {
            Ok(url) => AgentSocket::connect(&url).await,
            Err(e) => Err(e),
        };

        let mut inner = self.shared.inner.write();
        match result {
            Ok((socket, events)) => {
                if inner.generation != generation {
                    debug!("Agent connection superseded while opening");
                    socket.close();
                    return Ok(false);
                }
                info!(user_id = %user.id, "Connected to AI Agent");
                inner.opening = false;
                inner.socket = Some(socket);
                inner.state.is_connected = true;
                inner.state.error = None;
                tokio::spawn(pump_events(self.shared.clone(), generation, events));
                Ok(true)
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to AI Agent");
                if inner.generation == generation {
                    inner.opening = false;
                    inner.state.is_connected = false;
                    inner.state.error = Some(CONNECT_FAILED.to_string());
                }
                Err(AppError::Agent(CONNECT_FAILED.to_string()))
            }
        }
    }

    /// Apply one inbound text frame as if it came off the socket.
    pub fn handle_frame(&self, text: &str) {
        self.shared.apply_frame(text);
    }

    /// Send a frame. Returns false when there is no open socket or no user.
    pub fn send_message(&self, content: &str, message_type: AgentMessageType) -> bool {
        let Some(user) = &self.user else {
            return false;
        };

        let message = AIAgentMessage {
            id: format!("{}-{}", now_millis(), rand::random::<u32>()),
            message_type,
            content: content.to_string(),
            timestamp: now_millis(),
            user_id: user.id.clone(),
            metadata: None,
        };
        let payload = match serde_json::to_string(&message) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to encode agent message");
                return false;
            }
        };

        {
            let mut inner = self.shared.inner.write();
            let Some(socket) = &inner.socket else {
                return false;
            };
            if !socket.send_text(payload) {
                warn!("Agent socket writer has gone away");
                return false;
            }

            if message_type != AgentMessageType::Command {
                return true;
            }
            inner.state.is_processing = true;
            inner.outstanding_command = Some(message.id.clone());
            inner.pending_echoes.insert(message.id.clone());
            inner.state.messages.push(ChatMessage {
                id: message.id.clone(),
                content: message.content.clone(),
                sender: ChatSender::user(user.id.clone(), user.name.clone()),
                timestamp: now_iso(),
                metadata: None,
            });
        }

        if let Some(timeout) = self.options.processing_timeout {
            self.spawn_timeout(message.id, timeout);
        }
        true
    }

    fn spawn_timeout(&self, id: String, timeout: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No runtime available, processing timeout disabled");
            return;
        };
        let shared = Arc::downgrade(&self.shared);
        runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(shared) = shared.upgrade() {
                shared.expire_command(&id);
            }
        });
    }

    pub fn send_transcription(&self, transcription: &str) -> bool {
        self.send_message(transcription, AgentMessageType::Transcription)
    }

    pub fn send_command(&self, command: &str) -> bool {
        self.send_message(command, AgentMessageType::Command)
    }

    pub fn disconnect(&self) {
        let mut inner = self.shared.inner.write();
        inner.generation += 1;
        inner.opening = false;
        if let Some(socket) = inner.socket.take() {
            info!("Closing AI Agent connection");
            socket.close();
        }
        inner.state.is_connected = false;
        // No echo can arrive on a closed socket
        inner.pending_echoes.clear();
    }

    pub fn clear_messages(&self) {
        let mut inner = self.shared.inner.write();
        inner.state.messages.clear();
        inner.pending_echoes.clear();
    }

    pub fn state(&self) -> AgentState {
        self.shared.inner.read().state.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.inner.read().state.is_connected
    }

    pub fn is_processing(&self) -> bool {
        self.shared.inner.read().state.is_processing
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.shared.inner.read().state.messages.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.shared.inner.read().state.error.clone()
    }
}

impl Drop for AgentBridge {
    fn drop(&mut self) {
        if let Some(socket) = self.shared.inner.write().socket.take() {
            socket.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::session::tests::sample_user;
    use shared::SenderType;

    fn bridge(url: &str) -> AgentBridge {
        AgentBridge::new(
            AgentOptions {
                websocket_url: url.to_string(),
                api_key: "demo-key".to_string(),
                processing_timeout: None,
            },
            Some(sample_user("u1", "Alice")),
        )
    }

    #[test]
    fn test_response_frame_is_appended_as_agent() {
        let agent = bridge("ws://localhost:3001");
        agent.handle_frame(
            r#"{"id":"r1","type":"response","content":"Hello","timestamp":1700000000000,"userId":"u1"}"#,
        );

        let messages = agent.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "r1");
        assert_eq!(messages[0].sender.id, "ai_agent");
        assert_eq!(messages[0].sender.name, "AI Assistant");
        assert_eq!(messages[0].timestamp, "2023-11-14T22:13:20.000Z");
        assert!(!agent.is_processing());
    }

    #[test]
    fn test_non_response_frames_keep_processing() {
        let agent = bridge("ws://localhost:3001");
        agent.shared.inner.write().state.is_processing = true;

        agent.handle_frame(
            r#"{"id":"t1","type":"transcription","content":"hi","timestamp":1700000000000,"userId":"u1"}"#,
        );
        agent.handle_frame(
            r#"{"id":"s1","type":"system","content":"agent joined","timestamp":1700000000000,"userId":"u1"}"#,
        );

        assert_eq!(agent.messages().len(), 2);
        assert!(agent.is_processing());

        agent.handle_frame(r#"{"id":"r1","type":"response","content":"Hi","timestamp":1,"userId":"u1"}"#);
        assert!(!agent.is_processing());
    }

    #[test]
    fn test_pending_echoes_dropped_when_socket_goes_away() {
        let agent = bridge("ws://localhost:3001");
        agent.shared.inner.write().pending_echoes.insert("c1".to_string());

        agent.disconnect();
        assert!(agent.shared.inner.read().pending_echoes.is_empty());

        let generation = {
            let mut inner = agent.shared.inner.write();
            inner.pending_echoes.insert("c2".to_string());
            inner.generation
        };
        let keep_pumping = agent.shared.apply_event(
            generation,
            SocketEvent::Closed {
                code: Some(1000),
                reason: None,
            },
        );

        assert!(!keep_pumping);
        assert!(agent.shared.inner.read().pending_echoes.is_empty());
        assert!(!agent.is_connected());
    }

    #[test]
    fn test_transcription_frame_uses_local_user_name() {
        let agent = bridge("ws://localhost:3001");
        agent.handle_frame(
            r#"{"id":"t1","type":"transcription","content":"hi there","timestamp":1700000000000,"userId":"u1","metadata":{"confidence":0.93}}"#,
        );

        let message = &agent.messages()[0];
        assert_eq!(message.sender.sender_type, SenderType::User);
        assert_eq!(message.sender.name, "Alice");
        assert_eq!(message.metadata.as_ref().unwrap().confidence, Some(0.93));
    }

    #[test]
    fn test_malformed_frame_is_dropped() {
        let agent = bridge("ws://localhost:3001");
        agent.handle_frame("not json");
        agent.handle_frame(r#"{"id":"x","type":"unknown","content":"","timestamp":0,"userId":"u1"}"#);

        assert!(agent.messages().is_empty());
        assert_eq!(agent.error(), None);
    }

    #[test]
    fn test_send_without_socket_is_noop() {
        let agent = bridge("ws://localhost:3001");

        assert!(!agent.send_command("what is on my calendar"));
        assert!(!agent.send_transcription("hello"));

        let state = agent.state();
        assert!(state.messages.is_empty());
        assert!(!state.is_processing);
    }

    #[tokio::test]
    async fn test_connect_without_user_or_url_is_noop() {
        let no_user = AgentBridge::new(
            AgentOptions {
                websocket_url: "ws://localhost:3001".to_string(),
                ..Default::default()
            },
            None,
        );
        assert!(!no_user.connect_to_agent().await.unwrap());

        let no_url = bridge("");
        assert!(!no_url.connect_to_agent().await.unwrap());
        assert!(!no_url.is_connected());
    }

    #[tokio::test]
    async fn test_connect_failure_sets_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let agent = bridge(&format!("ws://127.0.0.1:{}", port));
        let err = agent.connect_to_agent().await.unwrap_err();

        assert_eq!(err.to_string(), "Agent error: Failed to connect to AI Agent");
        assert_eq!(agent.error().as_deref(), Some(CONNECT_FAILED));
        assert!(!agent.is_connected());
    }

    #[test]
    fn test_clear_messages_empties_log() {
        let agent = bridge("ws://localhost:3001");
        agent.handle_frame(r#"{"id":"r1","type":"response","content":"Hi","timestamp":1,"userId":"u1"}"#);

        agent.clear_messages();

        assert!(agent.messages().is_empty());
    }
}
