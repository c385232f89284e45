//! # Authentication Endpoints
//!
//! Login, registration, logout, profile and token refresh.

use shared::{AuthResponse, LoginCredentials, ProfileUpdate, RegisterData, TokenResponse, User};

use super::client::ApiClient;
use crate::core::error::ApiError;

/// Login with email and password.
#[tracing::instrument(skip(client, credentials), fields(email = %credentials.email))]
pub async fn login(
    client: &ApiClient,
    credentials: &LoginCredentials,
) -> Result<AuthResponse, ApiError> {
    tracing::info!("Attempting login");
    let start = std::time::Instant::now();

    let result = client
        .post::<AuthResponse, _>("/auth/login", Some(credentials))
        .await;

    match &result {
        Ok(response) => tracing::info!(
            user_id = %response.user.id,
            duration_ms = start.elapsed().as_millis(),
            "Login successful"
        ),
        Err(e) => tracing::warn!(error = %e, "Login failed"),
    }
    result
}

/// Register a new account.
#[tracing::instrument(skip(client, data), fields(email = %data.email))]
pub async fn register(client: &ApiClient, data: &RegisterData) -> Result<AuthResponse, ApiError> {
    client.post("/auth/register", Some(data)).await
}

/// End the server-side session.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client.post::<(), ()>("/auth/logout", None).await
}

/// Fetch the profile belonging to the current token.
pub async fn current_user(client: &ApiClient) -> Result<User, ApiError> {
    client.get("/auth/me").await
}

/// Apply a partial profile update.
pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> Result<User, ApiError> {
    client.put("/auth/profile", update).await
}

/// Exchange the current token for a fresh one.
pub async fn refresh_token(client: &ApiClient) -> Result<String, ApiError> {
    client
        .post::<TokenResponse, ()>("/auth/refresh", None)
        .await
        .map(|r| r.token)
}
