//! # Session Bridge
//!
//! Keeps the auth store in step with the REST API and the persisted token.
//!
//! - `login` / `register` replace user and token on success and leave them
//!   untouched on failure.
//! - `logout` always clears local state, even when the server call fails.
//! - `check_auth_status` restores a session from the persisted token once at
//!   startup; a failed restore forces a local logout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use shared::{AuthResponse, AuthState, LoginCredentials, ProfileUpdate, RegisterData, User};

use crate::core::error::ApiError;
use crate::core::service::{AuthApi, TokenStore};

pub struct SessionBridge {
    api: Arc<dyn AuthApi>,
    credentials: Arc<dyn TokenStore>,
    store: Arc<RwLock<AuthState>>,
    initialized: AtomicBool,
}

impl SessionBridge {
    pub fn new(api: Arc<dyn AuthApi>, credentials: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            credentials,
            store: Arc::new(RwLock::new(AuthState::default())),
            initialized: AtomicBool::new(false),
        }
    }

    /// Snapshot of the auth store
    pub fn state(&self) -> AuthState {
        self.store.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.store.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read().is_authenticated
    }

    /// True once `check_auth_status` has finished
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, ApiError> {
        self.store.write().login_start();
        let result = self.api.login(credentials).await;
        self.finish_authentication(result, "Login failed")
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        self.store.write().login_start();
        let result = self.api.register(data).await;
        self.finish_authentication(result, "Registration failed")
    }

    fn finish_authentication(
        &self,
        result: Result<AuthResponse, ApiError>,
        fallback: &str,
    ) -> Result<User, ApiError> {
        match result {
            Ok(AuthResponse { user, token }) => {
                self.credentials.set_token(&token);
                self.store.write().login_success(user.clone(), token);
                tracing::info!(user_id = %user.id, "Session established");
                Ok(user)
            }
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    fallback.to_string()
                } else {
                    message
                };
                self.store.write().login_failure(message);
                Err(e)
            }
        }
    }

    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::error!(error = %e, "Logout API call failed");
        }
        self.clear_local_session();
    }

    fn clear_local_session(&self) {
        self.credentials.clear();
        self.store.write().logout();
        tracing::info!("Session cleared");
    }

    pub async fn check_auth_status(&self) {
        let Some(token) = self.credentials.token() else {
            tracing::debug!("No persisted token, starting unauthenticated");
            self.initialized.store(true, Ordering::Release);
            return;
        };

        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Restored session from persisted token");
                self.store.write().login_success(user, token);
            }
            Err(e) => {
                tracing::error!(error = %e, "Auth check failed");
                self.clear_local_session();
            }
        }
        self.initialized.store(true, Ordering::Release);
    }

    /// Drop a session whose token was cleared elsewhere (the REST client
    /// clears it on 401). Returns true when the session was dropped.
    pub fn sync_with_credentials(&self) -> bool {
        let mut store = self.store.write();
        if !store.is_authenticated || self.credentials.token().is_some() {
            return false;
        }
        tracing::info!("Persisted token was cleared, ending session");
        store.logout();
        true
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        match self.api.update_profile(update).await {
            Ok(user) => {
                self.store.write().set_user(user.clone());
                Ok(user)
            }
            Err(e) => {
                tracing::error!(error = %e, "Profile update failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::credentials::MemoryTokenStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared::UserRole;

    pub(crate) fn sample_user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            avatar: None,
            role: UserRole::User,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            last_login: None,
        }
    }

    /// Scriptable in-memory auth backend
    #[derive(Default)]
    pub(crate) struct FakeAuthApi {
        pub login_result: Mutex<Option<Result<AuthResponse, ApiError>>>,
        pub me_result: Mutex<Option<Result<User, ApiError>>>,
        pub logout_fails: bool,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl FakeAuthApi {
        pub(crate) fn accepting(user: User, token: &str) -> Self {
            let fake = Self::default();
            *fake.login_result.lock() = Some(Ok(AuthResponse {
                user: user.clone(),
                token: token.to_string(),
            }));
            *fake.me_result.lock() = Some(Ok(user));
            fake
        }

        pub(crate) fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }

        fn unauthorized() -> ApiError {
            ApiError::Http {
                status: 401,
                message: "Invalid credentials".to_string(),
                payload: None,
            }
        }
    }

    #[async_trait]
    impl AuthApi for FakeAuthApi {
        async fn login(&self, _credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
            self.calls.lock().push("login");
            self.login_result
                .lock()
                .clone()
                .unwrap_or_else(|| Err(Self::unauthorized()))
        }

        async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
            self.calls.lock().push("register");
            Ok(AuthResponse {
                user: sample_user("new", &data.name),
                token: "registered-token".to_string(),
            })
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.calls.lock().push("logout");
            if self.logout_fails {
                Err(ApiError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn current_user(&self) -> Result<User, ApiError> {
            self.calls.lock().push("me");
            self.me_result
                .lock()
                .clone()
                .unwrap_or_else(|| Err(Self::unauthorized()))
        }

        async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
            self.calls.lock().push("profile");
            let mut user = sample_user("u1", "Alice");
            if let Some(name) = &update.name {
                user.name = name.clone();
            }
            Ok(user)
        }

        async fn refresh_token(&self) -> Result<String, ApiError> {
            self.calls.lock().push("refresh");
            Ok("refreshed".to_string())
        }
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials {
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_stores_user_and_token() {
        let store = Arc::new(MemoryTokenStore::default());
        let api = Arc::new(FakeAuthApi::accepting(sample_user("u1", "Alice"), "t1"));
        let session = SessionBridge::new(api, store.clone());

        let user = session.login(&credentials()).await.unwrap();

        assert_eq!(user.id, "u1");
        let state = session.state();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.token.as_deref(), Some("t1"));
        assert_eq!(store.token().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_message_and_keeps_state() {
        let store = Arc::new(MemoryTokenStore::default());
        let session = SessionBridge::new(Arc::new(FakeAuthApi::default()), store.clone());

        let err = session.login(&credentials()).await.unwrap_err();

        assert!(err.is_unauthorized());
        let state = session.state();
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn test_register_logs_in_new_user() {
        let store = Arc::new(MemoryTokenStore::default());
        let session = SessionBridge::new(Arc::new(FakeAuthApi::default()), store.clone());

        let data = RegisterData {
            email: "bob@example.com".to_string(),
            password: "secret1".to_string(),
            name: "Bob".to_string(),
        };
        session.register(&data).await.unwrap();

        assert_eq!(session.user().unwrap().name, "Bob");
        assert_eq!(store.token().as_deref(), Some("registered-token"));
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let store = Arc::new(MemoryTokenStore::default());
        let api = Arc::new(FakeAuthApi {
            logout_fails: true,
            ..FakeAuthApi::accepting(sample_user("u1", "Alice"), "t1")
        });
        let session = SessionBridge::new(api.clone(), store.clone());
        session.login(&credentials()).await.unwrap();

        session.logout().await;

        assert_eq!(session.state(), AuthState::default());
        assert_eq!(store.token(), None);
        assert_eq!(api.calls(), vec!["login", "logout"]);
    }

    #[tokio::test]
    async fn test_check_auth_without_token_skips_network() {
        let api = Arc::new(FakeAuthApi::default());
        let session = SessionBridge::new(api.clone(), Arc::new(MemoryTokenStore::default()));

        assert!(!session.is_initialized());
        session.check_auth_status().await;

        assert!(session.is_initialized());
        assert!(!session.is_authenticated());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check_auth_restores_session() {
        let api = Arc::new(FakeAuthApi::accepting(sample_user("u1", "Alice"), "ignored"));
        let store = Arc::new(MemoryTokenStore::with_token("persisted"));
        let session = SessionBridge::new(api, store);

        session.check_auth_status().await;

        let state = session.state();
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("persisted"));
        assert!(session.is_initialized());
    }

    #[tokio::test]
    async fn test_check_auth_with_rejected_token_forces_logout() {
        let store = Arc::new(MemoryTokenStore::with_token("stale"));
        let session = SessionBridge::new(Arc::new(FakeAuthApi::default()), store.clone());

        session.check_auth_status().await;

        assert!(!session.is_authenticated());
        assert_eq!(store.token(), None);
        assert!(session.is_initialized());
    }

    #[tokio::test]
    async fn test_session_ends_when_token_cleared_elsewhere() {
        let store = Arc::new(MemoryTokenStore::default());
        let api = Arc::new(FakeAuthApi::accepting(sample_user("u1", "Alice"), "t1"));
        let session = SessionBridge::new(api, store.clone());
        session.login(&credentials()).await.unwrap();

        assert!(!session.sync_with_credentials());
        store.clear();
        assert!(session.sync_with_credentials());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_update_profile_replaces_stored_user() {
        let api = Arc::new(FakeAuthApi::accepting(sample_user("u1", "Alice"), "t1"));
        let session = SessionBridge::new(api, Arc::new(MemoryTokenStore::default()));
        session.login(&credentials()).await.unwrap();

        let update = ProfileUpdate {
            name: Some("Alice Cooper".to_string()),
            ..Default::default()
        };
        let user = session.update_profile(&update).await.unwrap();

        assert_eq!(user.name, "Alice Cooper");
        assert_eq!(session.user().unwrap().name, "Alice Cooper");
    }
}
