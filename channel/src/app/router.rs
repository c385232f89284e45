//! # Router
//!
//! Current page plus navigation history, with an authentication guard on
//! protected routes.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::service::Navigator;

/// Room joined when a channel route carries no name
pub const DEFAULT_ROOM: &str = "default-room";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Settings,
    /// AI channel for the named room
    Channel(String),
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::Channel(room) => format!("/channel/{}", room),
        }
    }

    /// Parse a path. `/` and unknown paths land on the dashboard.
    pub fn from_path(path: &str) -> Route {
        let path = path.trim_end_matches('/');
        match path {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/settings" => Route::Settings,
            "/channel" => Route::Channel(DEFAULT_ROOM.to_string()),
            _ => match path.strip_prefix("/channel/") {
                Some(room) if !room.is_empty() => Route::Channel(room.to_string()),
                _ => Route::Dashboard,
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign In",
            Route::Register => "Sign Up",
            Route::Dashboard => "Dashboard",
            Route::Settings => "Settings",
            Route::Channel(_) => "AI Channel",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

type AuthCheck = Arc<dyn Fn() -> bool + Send + Sync>;

pub struct Router {
    current: RwLock<Route>,
    history: RwLock<Vec<Route>>,
    auth_check: RwLock<Option<AuthCheck>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Route::Login),
            history: RwLock::new(Vec::new()),
            auth_check: RwLock::new(None),
        }
    }

    /// Install the guard consulted for protected routes. Without one every
    /// protected route redirects to login.
    pub fn set_auth_check(&self, check: impl Fn() -> bool + Send + Sync + 'static) {
        *self.auth_check.write() = Some(Arc::new(check));
    }

    fn is_authenticated(&self) -> bool {
        let check = self.auth_check.read().clone();
        check.is_some_and(|check| check())
    }

    pub fn current(&self) -> Route {
        self.current.read().clone()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.read().clone()
    }

    /// Return to the previous route, if any
    pub fn back(&self) -> Option<Route> {
        let previous = self.history.write().pop()?;
        *self.current.write() = previous.clone();
        Some(previous)
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        let target = if route.requires_auth() && !self.is_authenticated() {
            tracing::info!(route = %route, "Access denied: route requires authentication, redirecting to login");
            Route::Login
        } else {
            route
        };

        let mut current = self.current.write();
        if *current == target {
            return;
        }
        tracing::debug!(from = %*current, to = %target, "Navigating");
        let previous = std::mem::replace(&mut *current, target);
        self.history.write().push(previous);
    }
}
