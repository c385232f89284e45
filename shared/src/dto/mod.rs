//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged with the backend REST API and the agent
//! WebSocket, plus the state snapshots published by the client bridges.
//!
//! ## Module Organization
//!
//! - [`auth`] - Users, login/register payloads, auth responses
//! - [`agent`] - Agent wire messages and the chat log shape
//! - [`room`] - Media room state, participants and media settings
//! - [`session`] - Dashboard session history
//!
//! ## Serialization Format
//!
//! - **Field naming**: camelCase (`#[serde(rename_all = "camelCase")]`)
//! - **Optional fields**: Omitted when `None`
//! - **Enums**: lowercase / snake_case strings
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! { "email": "alice@example.com", "password": "secret" }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "user": {
//!     "id": "u1",
//!     "email": "alice@example.com",
//!     "name": "Alice",
//!     "role": "user",
//!     "createdAt": "2025-01-01T00:00:00Z"
//!   },
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! }
//! ```

pub mod agent;
pub mod auth;
pub mod room;
pub mod session;

pub use agent::*;
pub use auth::*;
pub use room::*;
pub use session::*;
