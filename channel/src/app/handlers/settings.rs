//! # Settings Handlers
//!
//! Profile editing plus media preferences persisted as a JSON file.

use std::path::Path;

use shared::{MediaSettings, ProfileUpdate};

use crate::app::state::{Notice, SettingsState};
use crate::bridge::session::SessionBridge;
use crate::core::error::Result;

/// One edit to the media preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaChange {
    AudioEnabled(bool),
    VideoEnabled(bool),
    ScreenShareEnabled(bool),
    AudioDevice(String),
    VideoDevice(String),
    AudioOutputDevice(String),
}

/// Load media preferences. A missing file yields the defaults.
pub fn load_media(path: &Path) -> Result<MediaSettings> {
    if !path.exists() {
        return Ok(MediaSettings::default());
    }
    let content = std::fs::read_to_string(path)?;
    let settings: MediaSettings = serde_json::from_str(&content)?;
    Ok(settings)
}

pub fn save_media(path: &Path, settings: &MediaSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Startup load that never fails
pub fn load_media_or_default(path: &Path) -> MediaSettings {
    match load_media(path) {
        Ok(settings) => {
            tracing::info!(path = ?path, "Loaded media settings");
            settings
        }
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Failed to load media settings, using defaults");
            MediaSettings::default()
        }
    }
}

pub async fn save_profile(session: &SessionBridge, state: &mut SettingsState) -> bool {
    if state.name.trim().is_empty() || state.email.trim().is_empty() {
        state.notice = Some(Notice::error("Name and email are required"));
        return false;
    }

    let update = ProfileUpdate {
        name: Some(state.name.trim().to_string()),
        email: Some(state.email.trim().to_string()),
        avatar: state.avatar.clone(),
    };

    state.is_saving = true;
    state.notice = None;
    let result = session.update_profile(&update).await;
    state.is_saving = false;

    match result {
        Ok(user) => {
            state.name = user.name;
            state.email = user.email;
            state.avatar = user.avatar;
            state.notice = Some(Notice::success("Profile updated successfully"));
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update profile");
            state.notice = Some(Notice::error("Failed to update profile"));
            false
        }
    }
}

pub fn set_media(state: &mut SettingsState, change: MediaChange) {
    let media = &mut state.media;
    match change {
        MediaChange::AudioEnabled(on) => media.audio_enabled = on,
        MediaChange::VideoEnabled(on) => media.video_enabled = on,
        MediaChange::ScreenShareEnabled(on) => media.screen_share_enabled = on,
        MediaChange::AudioDevice(id) => media.audio_device_id = id,
        MediaChange::VideoDevice(id) => media.video_device_id = id,
        MediaChange::AudioOutputDevice(id) => media.audio_output_device_id = id,
    }
}

pub fn reset_media(state: &mut SettingsState) {
    state.media = MediaSettings::default();
    state.notice = Some(Notice::success("Settings reset to default"));
}

/// Persist the current media preferences
pub fn handle_media_save(path: &Path, state: &mut SettingsState) {
    match save_media(path, &state.media) {
        Ok(()) => {
            tracing::info!(path = ?path, "Saved media settings");
            state.notice = Some(Notice::success("Media settings saved"));
        }
        Err(e) => {
            tracing::error!(path = ?path, error = %e, "Failed to save media settings");
            state.notice = Some(Notice::error("Failed to save media settings"));
        }
    }
}

pub fn test_audio(state: &mut SettingsState) {
    state.notice = Some(Notice::success("Audio test completed successfully"));
}

pub fn test_video(state: &mut SettingsState) {
    state.notice = Some(Notice::success("Video test completed successfully"));
}

pub fn dismiss_notice(state: &mut SettingsState) {
    state.notice = None;
}
