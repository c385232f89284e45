//! # Service Traits
//!
//! Seams between the bridges and the outside world. `ApiClient` implements the
//! three API traits; tests implement them with in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    AgentActivationResponse, AgentMessageResponse, AuthResponse, LoginCredentials, ProfileUpdate,
    RegisterData, User,
};

use crate::app::router::Route;
use crate::core::error::ApiError;

/// Authentication endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError>;

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /auth/me`
    async fn current_user(&self) -> Result<User, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;

    async fn refresh_token(&self) -> Result<String, ApiError>;
}

/// Media token and room management endpoints
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn get_access_token(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<String, ApiError>;

    async fn get_room_info(&self, room_name: &str) -> Result<Value, ApiError>;

    async fn create_room(
        &self,
        room_name: &str,
        options: serde_json::Map<String, Value>,
    ) -> Result<Value, ApiError>;

    async fn delete_room(&self, room_name: &str) -> Result<(), ApiError>;
}

/// AI agent REST endpoints (the chat itself goes over the WebSocket)
#[async_trait]
pub trait AgentApi: Send + Sync {
    async fn send_message(
        &self,
        message: &str,
        room_id: &str,
    ) -> Result<AgentMessageResponse, ApiError>;

    async fn conversation_history(&self, room_id: &str) -> Result<Vec<Value>, ApiError>;

    async fn activate_agent(&self, room_id: &str) -> Result<AgentActivationResponse, ApiError>;

    async fn deactivate_agent(&self, room_id: &str) -> Result<AgentActivationResponse, ApiError>;
}

/// Persisted bearer token.
///
/// Outlives a single page session, so a restarted client can restore its
/// login through `/auth/me`.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str);

    /// Remove the token, returning what was stored
    fn clear(&self) -> Option<String>;
}

/// Page navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
