//! # Agent Chat Data Transfer Objects
//!
//! Two shapes describe the same conversation:
//!
//! - [`AIAgentMessage`] travels over the agent WebSocket (epoch-ms timestamp,
//!   flat `userId`).
//! - [`ChatMessage`] is what the chat log holds (ISO-8601 timestamp, a
//!   `sender` record).
//!
//! [`ChatMessage::from_agent`] is the one place the translation happens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::epoch_millis_to_iso;

/// Sender id used for every agent response
pub const AGENT_SENDER_ID: &str = "ai_agent";
/// Display name used for every agent response
pub const AGENT_SENDER_NAME: &str = "AI Assistant";
/// Display name for user messages when no local user name is known
pub const DEFAULT_USER_NAME: &str = "User";

/// Kind of frame exchanged with the agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentMessageType {
    Transcription,
    Response,
    Command,
    System,
}

/// Wire message exchanged with the agent service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AIAgentMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: AgentMessageType,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Who authored a chat log entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    User,
    AiAgent,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSender {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub sender_type: SenderType,
}

impl ChatSender {
    pub fn agent() -> Self {
        Self {
            id: AGENT_SENDER_ID.to_string(),
            name: AGENT_SENDER_NAME.to_string(),
            sender_type: SenderType::AiAgent,
        }
    }

    pub fn user(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sender_type: SenderType::User,
        }
    }
}

/// Optional annotations on a chat entry. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcribed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the chat log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: ChatSender,
    /// ISO-8601 with millisecond precision
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChatMetadata>,
}

impl ChatMessage {
    /// Translate an inbound wire message into a chat log entry.
    ///
    /// Only `response` frames are attributed to the agent; everything else is
    /// attributed to the user named in `userId`, displayed as `local_user_name`.
    pub fn from_agent(message: &AIAgentMessage, local_user_name: Option<&str>) -> Self {
        let sender = if message.message_type == AgentMessageType::Response {
            ChatSender::agent()
        } else {
            ChatSender::user(
                message.user_id.clone(),
                local_user_name.unwrap_or(DEFAULT_USER_NAME),
            )
        };

        Self {
            id: message.id.clone(),
            content: message.content.clone(),
            sender,
            timestamp: epoch_millis_to_iso(message.timestamp),
            metadata: message
                .metadata
                .as_ref()
                .map(|m| metadata_from_map(m.clone())),
        }
    }

    pub fn is_from_agent(&self) -> bool {
        self.sender.sender_type == SenderType::AiAgent
    }
}

fn metadata_from_map(map: Map<String, Value>) -> ChatMetadata {
    // Typed fields with the wrong JSON type fall back to living in `extra`
    serde_json::from_value(Value::Object(map.clone())).unwrap_or(ChatMetadata {
        transcribed: None,
        confidence: None,
        extra: map,
    })
}
