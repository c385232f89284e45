//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the AI Channel client and the
//! backend services (REST API, agent WebSocket) plus the state shapes the
//! client publishes to its pages.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::auth`]**: Users, credentials and auth responses
//!   - **[`dto::agent`]**: Agent wire messages and chat log entries
//!   - **[`dto::room`]**: Media room state, participants, media settings
//!   - **[`dto::session`]**: Past room sessions shown on the dashboard
//! - **[`utils`]**: Timestamp conversion and duration formatting
//!
//! ## Wire Format
//!
//! The backend speaks camelCase JSON, so every DTO carries
//! `#[serde(rename_all = "camelCase")]`. Optional fields are omitted when
//! `None`.
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::agent::{AIAgentMessage, AgentMessageType, ChatMessage, SenderType};
//!
//! let wire: AIAgentMessage = serde_json::from_str(
//!     r#"{"type":"response","id":"r1","content":"Hello","timestamp":1700000000000,"userId":"u1"}"#,
//! ).unwrap();
//! assert_eq!(wire.message_type, AgentMessageType::Response);
//!
//! let chat = ChatMessage::from_agent(&wire, Some("Alice"));
//! assert_eq!(chat.sender.sender_type, SenderType::AiAgent);
//! assert_eq!(chat.timestamp, "2023-11-14T22:13:20.000Z");
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
