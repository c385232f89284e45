//! # Page State Types
//!
//! Form and page state for every route. Handlers in [`crate::app::handlers`]
//! mutate these; the front-end only renders them.

use shared::{LiveKitSession, MediaSettings, User};

use crate::utils::validation::FieldErrors;

/// Sign-in form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub errors: FieldErrors,
    /// Server-side failure shown above the form
    pub form_error: Option<String>,
    pub is_submitting: bool,
}

/// Sign-up form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: FieldErrors,
    pub form_error: Option<String>,
    pub is_submitting: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub join_dialog_open: bool,
    pub room_input: String,
    pub sessions: Vec<LiveKitSession>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Dismissable banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsState {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub media: MediaSettings,
    pub is_saving: bool,
    pub notice: Option<Notice>,
}

impl SettingsState {
    /// Profile fields prefilled from the signed-in user
    pub fn for_user(user: Option<&User>, media: MediaSettings) -> Self {
        Self {
            name: user.map(|u| u.name.clone()).unwrap_or_default(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            avatar: user.and_then(|u| u.avatar.clone()),
            media,
            ..Default::default()
        }
    }
}

/// Local view of the AI channel page
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelState {
    pub room_name: String,
    /// Media access token once fetched
    pub token: Option<String>,
    pub is_connecting: bool,
    pub connection_error: Option<String>,
    pub message_input: String,
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub screen_sharing: bool,
}

impl ChannelState {
    pub fn new(room_name: impl Into<String>) -> Self {
        Self {
            room_name: room_name.into(),
            token: None,
            is_connecting: false,
            connection_error: None,
            message_input: String::new(),
            audio_enabled: true,
            video_enabled: true,
            screen_sharing: false,
        }
    }
}
