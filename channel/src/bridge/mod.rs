//! # Bridges
//!
//! Stateful adapters between the pages and the outside world. Each bridge
//! owns a state store behind a `parking_lot` lock and hands out snapshots.
//!
//! - [`session::SessionBridge`]: login, register, logout, session restore
//! - [`room::RoomBridge`]: one media room through the SDK seam
//! - [`agent::AgentBridge`]: chat with the AI agent over a WebSocket

pub mod agent;
pub mod room;
pub mod session;

pub use agent::{AgentBridge, AgentOptions, AgentState};
pub use room::{RoomBridge, RoomParams, RoomPhase};
pub use session::SessionBridge;
