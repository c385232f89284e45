//! # Services Module
//!
//! External integrations of the AI Channel client.
//!
//! ```text
//! services/
//! ├── api/             - Backend REST client (auth, media tokens, agent REST)
//! ├── agent_socket.rs  - WebSocket transport to the AI agent
//! ├── credentials.rs   - Persisted bearer token (memory / JSON file)
//! └── media.rs         - Media SDK seam (rooms, participants, events)
//! ```
//!
//! ## Service Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      channel client                      │
//! │                                                          │
//! │  ┌────────────┐   ┌──────────────┐   ┌───────────────┐   │
//! │  │ ApiClient  │   │ AgentSocket  │   │ dyn MediaSdk  │   │
//! │  └─────┬──────┘   └──────┬───────┘   └───────┬───────┘   │
//! └────────┼─────────────────┼───────────────────┼───────────┘
//!          │ HTTP/JSON       │ WebSocket/JSON    │ SDK-owned
//!          ▼                 ▼                   ▼
//!   Backend REST API    Agent service      Media server
//! ```
//!
//! ## Error Handling
//!
//! - `ApiClient` returns `Result<T, ApiError>`; 401 additionally clears the
//!   credential store and redirects to the login route.
//! - `AgentSocket` reports transport failures as `SocketEvent::Error` and
//!   never reconnects.
//! - Media SDK adapters return `MediaError`.

pub mod agent_socket;
pub mod api;
pub mod credentials;
pub mod media;
