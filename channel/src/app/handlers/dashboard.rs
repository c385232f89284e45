//! # Dashboard Handlers
//!
//! Joining a named room, quick-starting a room, and the recent sessions list.

use shared::{format_duration, now_millis, LiveKitSession};

use crate::app::router::Route;
use crate::app::state::DashboardState;
use crate::core::service::Navigator;

/// Colour band for a session quality percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBand {
    Good,
    Warning,
    Poor,
}

impl QualityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            QualityBand::Good
        } else if score >= 70.0 {
            QualityBand::Warning
        } else {
            QualityBand::Poor
        }
    }
}

/// One row of the recent sessions list
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub room_name: String,
    pub started: String,
    pub duration: Option<String>,
    pub participants: usize,
    pub audio: QualityBand,
    pub video: QualityBand,
}

pub fn open_join_dialog(state: &mut DashboardState) {
    state.join_dialog_open = true;
}

pub fn close_join_dialog(state: &mut DashboardState) {
    state.join_dialog_open = false;
}

/// Join the room typed into the dialog. Blank names are ignored.
pub fn join_room(navigator: &dyn Navigator, state: &mut DashboardState) -> bool {
    let room = state.room_input.trim();
    if room.is_empty() {
        return false;
    }
    navigator.navigate(Route::Channel(room.to_string()));
    state.join_dialog_open = false;
    state.room_input.clear();
    true
}

/// Start a fresh room named after the current time
pub fn quick_start(navigator: &dyn Navigator) -> String {
    let room = quick_room_name(now_millis());
    navigator.navigate(Route::Channel(room.clone()));
    room
}

pub fn quick_room_name(epoch_millis: i64) -> String {
    format!("quick-session-{}", epoch_millis)
}

/// Rejoin a room from the recent sessions list
pub fn rejoin(navigator: &dyn Navigator, session: &LiveKitSession) {
    navigator.navigate(Route::Channel(session.room_name.clone()));
}

pub fn session_rows(state: &DashboardState) -> Vec<SessionRow> {
    state
        .sessions
        .iter()
        .map(|session| SessionRow {
            room_name: session.room_name.clone(),
            started: session.start_time.clone(),
            duration: session.duration.map(format_duration),
            participants: session.participants.len(),
            audio: QualityBand::from_score(session.quality.audio),
            video: QualityBand::from_score(session.quality.video),
        })
        .collect()
}
