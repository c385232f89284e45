use serde::{Deserialize, Serialize};

/// Role attached to a user account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    Moderator,
}

/// User profile as returned by `/auth/me` and the login/register endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Authentication response (login/register success)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Response of `POST /auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

/// Partial user update sent to `PUT /auth/profile`.
///
/// Only the fields that are `Some` are serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Seed an update from the current profile, as the settings page does.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            avatar: user.avatar.clone(),
        }
    }
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    #[serde(alias = "message")]
    pub error: String,
}

/// Client-side authentication state (the auth store)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// Begin a login/register attempt
    pub fn login_start(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Replace user and token after a successful login/register/restore
    pub fn login_success(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.is_authenticated = true;
        self.is_loading = false;
        self.error = None;
    }

    /// Record a failed attempt. User and token are left as they were.
    pub fn login_failure(&mut self, error: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(error.into());
    }

    /// Drop the session
    pub fn logout(&mut self) {
        *self = AuthState::default();
    }

    /// Replace the profile of the logged-in user
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            avatar: None,
            role: UserRole::User,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            last_login: None,
        }
    }

    #[test]
    fn test_user_wire_names_are_camel_case() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["createdAt"], "2025-01-01T00:00:00Z");
        assert_eq!(json["role"], "user");
        assert!(json.get("avatar").is_none());
        assert!(json.get("lastLogin").is_none());
    }

    #[test]
    fn test_user_role_defaults_when_missing() {
        let user: User = serde_json::from_str(
            r#"{"id":"u2","email":"b@example.com","name":"Bob","createdAt":"2025-01-02T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            name: Some("Alice B".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"name":"Alice B"}"#);
    }

    #[test]
    fn test_error_response_accepts_message_key() {
        let err: ErrorResponse = serde_json::from_str(r#"{"message":"Invalid credentials"}"#).unwrap();
        assert_eq!(err.error, "Invalid credentials");
    }

    #[test]
    fn test_login_failure_keeps_previous_session() {
        let mut state = AuthState::default();
        state.login_success(user(), "t1".to_string());

        state.login_start();
        assert!(state.is_loading);
        state.login_failure("Invalid credentials");

        assert_eq!(state.token.as_deref(), Some("t1"));
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_logout_resets_everything() {
        let mut state = AuthState::default();
        state.login_success(user(), "t1".to_string());
        state.logout();
        assert_eq!(state, AuthState::default());
    }
}
