//! # API Client
//!
//! Main HTTP client for backend API communication.
//!
//! Every request carries `Authorization: Bearer <token>` when the credential
//! store holds one. Any 401 clears the store and sends the user to the login
//! route; the error is still returned to the caller.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{
    AgentActivationResponse, AgentMessageResponse, AuthResponse, LoginCredentials, ProfileUpdate,
    RegisterData, User,
};

use crate::app::router::Route;
use crate::config::ChannelConfig;
use crate::core::error::ApiError;
use crate::core::service::{AgentApi, AuthApi, MediaApi, Navigator, TokenStore};

/// HTTP client for communicating with the backend API server.
///
/// Holds its credential store and navigator explicitly; several clients with
/// different credentials can coexist in one process.
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    credentials: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// The request timeout comes from the config (10 seconds by default).
    pub fn new(
        config: &ChannelConfig,
        credentials: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
            navigator,
        })
    }

    /// Base URL for API requests (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn TokenStore> {
        &self.credentials
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    #[tracing::instrument(skip(self, method, body), fields(method = %method))]
    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let start = Instant::now();

        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = self.credentials.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Request network error");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(error = %e, status = status.as_u16(), "Failed to read response body");
            ApiError::Network(e.to_string())
        })?;
        let duration = start.elapsed();

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }

        if !status.is_success() {
            let error = http_error(status, &text);
            tracing::warn!(
                status = status.as_u16(),
                error = %error,
                duration_ms = duration.as_millis(),
                "Request failed"
            );
            return Err(error);
        }

        tracing::debug!(
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "Request succeeded"
        );
        decode_body(&text)
    }

    fn handle_unauthorized(&self) {
        let cleared = self.credentials.clear();
        tracing::warn!(had_token = cleared.is_some(), "Unauthorized response, redirecting to login");
        self.navigator.navigate(Route::Login);
    }
}

/// Decode a success body; an empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(error = %e, "Response parse error");
        ApiError::Parse(e.to_string())
    })
}

fn http_error(status: StatusCode, text: &str) -> ApiError {
    let payload = serde_json::from_str::<Value>(text).ok();

    let backend_message = payload.as_ref().and_then(|p| {
        p.get("error")
            .or_else(|| p.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    let message = backend_message.unwrap_or_else(|| {
        let trimmed = text.trim();
        if trimmed.is_empty() || payload.is_some() {
            format!("Request failed with status code {}", status.as_u16())
        } else {
            trimmed.to_string()
        }
    });

    ApiError::Http {
        status: status.as_u16(),
        message,
        payload,
    }
}

// Implement the service seams for ApiClient
#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        crate::services::api::auth::login(self, credentials).await
    }

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        crate::services::api::auth::register(self, data).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        crate::services::api::auth::logout(self).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        crate::services::api::auth::current_user(self).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        crate::services::api::auth::update_profile(self, update).await
    }

    async fn refresh_token(&self) -> Result<String, ApiError> {
        crate::services::api::auth::refresh_token(self).await
    }
}

#[async_trait]
impl MediaApi for ApiClient {
    async fn get_access_token(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<String, ApiError> {
        crate::services::api::livekit::get_access_token(self, room_name, participant_name).await
    }

    async fn get_room_info(&self, room_name: &str) -> Result<Value, ApiError> {
        crate::services::api::livekit::get_room_info(self, room_name).await
    }

    async fn create_room(
        &self,
        room_name: &str,
        options: serde_json::Map<String, Value>,
    ) -> Result<Value, ApiError> {
        crate::services::api::livekit::create_room(self, room_name, options).await
    }

    async fn delete_room(&self, room_name: &str) -> Result<(), ApiError> {
        crate::services::api::livekit::delete_room(self, room_name).await
    }
}

#[async_trait]
impl AgentApi for ApiClient {
    async fn send_message(
        &self,
        message: &str,
        room_id: &str,
    ) -> Result<AgentMessageResponse, ApiError> {
        crate::services::api::agent::send_message(self, message, room_id).await
    }

    async fn conversation_history(&self, room_id: &str) -> Result<Vec<Value>, ApiError> {
        crate::services::api::agent::conversation_history(self, room_id).await
    }

    async fn activate_agent(&self, room_id: &str) -> Result<AgentActivationResponse, ApiError> {
        crate::services::api::agent::activate_agent(self, room_id).await
    }

    async fn deactivate_agent(&self, room_id: &str) -> Result<AgentActivationResponse, ApiError> {
        crate::services::api::agent::deactivate_agent(self, room_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_prefers_backend_error_field() {
        let err = http_error(StatusCode::BAD_REQUEST, r#"{"error":"Email already registered"}"#);
        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                message: "Email already registered".to_string(),
                payload: Some(serde_json::json!({"error": "Email already registered"})),
            }
        );
    }

    #[test]
    fn test_http_error_falls_back_to_text_then_status() {
        let err = http_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "upstream down");

        let err = http_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "Request failed with status code 500");

        let err = http_error(StatusCode::NOT_FOUND, r#"{"detail":"nope"}"#);
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }

    #[test]
    fn test_empty_body_decodes_as_unit() {
        let decoded: Result<(), ApiError> = decode_body("");
        assert!(decoded.is_ok());
        let decoded: Result<Option<User>, ApiError> = decode_body("  ");
        assert_eq!(decoded.unwrap(), None);
    }

    #[test]
    fn test_undecodable_body_is_parse_error() {
        let decoded: Result<User, ApiError> = decode_body("{\"id\":1}");
        assert!(matches!(decoded, Err(ApiError::Parse(_))));
    }
}
