//! # Application Orchestrator
//!
//! [`App`] wires the services, bridges and pages together and keeps the
//! page for the current route alive.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  front-end (console)                                     │
//! │    reads page state, calls handlers                      │
//! └────────────┬─────────────────────────────────────────────┘
//!              │
//! ┌────────────▼─────────────────────────────────────────────┐
//! │  App                                                     │
//! │  - Router (Navigator, auth guard)                        │
//! │  - SessionBridge ── ApiClient ── TokenStore              │
//! │  - LoginForm / RegisterForm / DashboardState /           │
//! │    SettingsState / ChannelPage                           │
//! └────────────┬─────────────────────────────────────────────┘
//!              │ tokio tasks
//! ┌────────────▼─────────────────────────────────────────────┐
//! │  RoomBridge event pump, AgentSocket reader/writer        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The channel page is created when the router lands on `Channel(room)` and
//! torn down (room and agent disconnected) when it leaves.

pub mod handlers;
pub mod router;
pub mod state;

use std::sync::Arc;

use crate::bridge::agent::AgentOptions;
use crate::bridge::session::SessionBridge;
use crate::config::ChannelConfig;
use crate::core::error::Result;
use crate::core::service::{MediaApi, Navigator, TokenStore};
use crate::services::api::ApiClient;
use crate::services::credentials::FileTokenStore;
use crate::services::media::MediaSdk;

use handlers::channel::ChannelPage;
use router::{Route, Router};
use state::{DashboardState, LoginForm, RegisterForm, SettingsState};

pub struct App {
    pub config: ChannelConfig,
    pub router: Arc<Router>,
    pub credentials: Arc<dyn TokenStore>,
    pub session: Arc<SessionBridge>,
    pub media_api: Arc<dyn MediaApi>,
    pub sdk: Option<Arc<dyn MediaSdk>>,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub dashboard: DashboardState,
    pub settings: SettingsState,
    pub channel: Option<ChannelPage>,
    /// User whose profile the settings form was filled from
    settings_owner: Option<String>,
}

impl App {
    /// Build the production wiring: file-backed token, REST client, router.
    pub fn from_config(config: ChannelConfig, sdk: Option<Arc<dyn MediaSdk>>) -> Result<Self> {
        let credentials: Arc<dyn TokenStore> = Arc::new(FileTokenStore::open(config.token_file.clone()));
        let router = Arc::new(Router::new());
        let client = Arc::new(ApiClient::new(
            &config,
            credentials.clone(),
            router.clone() as Arc<dyn Navigator>,
        )?);
        let session = Arc::new(SessionBridge::new(client.clone(), credentials.clone()));
        Ok(Self::assemble(config, router, credentials, session, client, sdk))
    }

    /// Build from already-constructed parts
    pub fn assemble(
        config: ChannelConfig,
        router: Arc<Router>,
        credentials: Arc<dyn TokenStore>,
        session: Arc<SessionBridge>,
        media_api: Arc<dyn MediaApi>,
        sdk: Option<Arc<dyn MediaSdk>>,
    ) -> Self {
        let guard = session.clone();
        router.set_auth_check(move || guard.is_authenticated());
        let media = handlers::settings::load_media_or_default(&config.settings_file);

        Self {
            settings: SettingsState::for_user(None, media),
            config,
            router,
            credentials,
            session,
            media_api,
            sdk,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            dashboard: DashboardState::default(),
            channel: None,
            settings_owner: None,
        }
    }

    /// Restore a persisted session and land on the matching page
    pub async fn start(&mut self) {
        self.session.check_auth_status().await;
        self.router.navigate(Route::Dashboard);
        self.sync_route().await;
    }

    pub fn route(&self) -> Route {
        self.router.current()
    }

    /// Reconcile pages with the current route. Call after every handler.
    pub async fn sync_route(&mut self) {
        // A 401 clears the token behind the session's back
        self.session.sync_with_credentials();
        if self.router.current().requires_auth() && !self.session.is_authenticated() {
            self.router.navigate(Route::Login);
        }

        let route = self.router.current();
        let wanted_room = match &route {
            Route::Channel(room) => Some(room.clone()),
            _ => None,
        };

        let stale = match (&self.channel, &wanted_room) {
            (Some(page), Some(room)) => page.state.room_name != *room,
            (Some(_), None) => true,
            _ => false,
        };
        if stale {
            if let Some(mut page) = self.channel.take() {
                page.leave_quietly();
            }
        }

        match route {
            Route::Settings => {
                let user = self.session.user();
                let owner = user.as_ref().map(|u| u.id.clone());
                if owner != self.settings_owner {
                    let media = self.settings.media.clone();
                    self.settings = SettingsState::for_user(user.as_ref(), media);
                    self.settings_owner = owner;
                }
            }
            Route::Channel(room) if self.channel.is_none() => {
                let mut page = ChannelPage::new(
                    room,
                    self.session.user(),
                    self.config.media_server_url.clone(),
                    AgentOptions::from_config(&self.config),
                    self.media_api.clone(),
                    self.sdk.clone(),
                    self.router.clone(),
                );
                if page.initialize().await {
                    page.connect_room().await;
                }
                self.channel = Some(page);
            }
            _ => {}
        }
    }
}
