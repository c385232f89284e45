//! # AI Channel Client - Library Root
//!
//! Client side of a video-conferencing application with an AI chat agent.
//! This library crate holds everything the console binary (`main.rs`) drives.
//!
//! ## Features
//!
//! - **Accounts**: sign in, sign up, sign out, session restore from a
//!   persisted token
//! - **Dashboard**: join a named room, quick-start a room, recent sessions
//! - **Settings**: profile edit, media preferences saved as JSON
//! - **AI Channel**: a media room driven through a media SDK seam, next to a
//!   WebSocket chat with the AI agent
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              channel (this crate)                      │
//! ├────────────────────────────────────────────────────────┤
//! │  app       - Router, page state, page handlers         │
//! │  bridge    - Session / Room / Agent state bridges      │
//! │  services  - REST client, agent socket, media seam     │
//! │  core      - Errors and service traits                 │
//! └────────────────────────────────────────────────────────┘
//!      │ HTTP/JSON         │ WebSocket/JSON      │ SDK
//!      ▼                   ▼                     ▼
//! ┌──────────────┐  ┌────────────────┐  ┌─────────────────┐
//! │ Backend API  │  │ Agent service  │  │ Media server    │
//! └──────────────┘  └────────────────┘  └─────────────────┘
//! ```
//!
//! ### State Management
//!
//! Each bridge keeps its store behind a `parking_lot` lock and hands out
//! clones. Locks are never held across `.await`. Background tasks (agent
//! socket reader/writer, room event pump) carry the generation they were
//! started for and are ignored once it is superseded.
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p channel
//! ```
//!
//! Unit tests drive the bridges with in-memory fakes; `tests/` exercises the
//! REST client against `wiremock` and the agent bridge against a local
//! WebSocket server.

pub mod app;
pub mod bridge;
pub mod config;
pub mod core;
pub mod logging;
pub mod services;
pub mod utils;

pub use crate::app::App;
pub use crate::config::ChannelConfig;
pub use crate::core::{AppError, Result};
