//! # Room Bridge
//!
//! Drives one media room through the SDK seam and mirrors it into a
//! [`RoomState`] store.
//!
//! ```text
//! Idle ──connect──▶ Connecting ──ok──▶ Connected ──leave/kick/loss──▶ Disconnected
//!                       │                                                 │
//!                       └──error──▶ Failed ◀────── connect again ─────────┘
//! ```
//!
//! SDK events are consumed by a spawned pump task. Every `connect` bumps a
//! generation counter; events and completions from an older generation are
//! dropped.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared::{ConnectionQuality, Participant, QualityMetrics, RoomState};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::core::error::{AppError, Result};
use crate::services::media::{MediaRoom, MediaSdk, ParticipantInfo, RoomEvent, RoomOptions};

/// Everything needed to join a room
#[derive(Clone, Default)]
pub struct RoomParams {
    pub token: String,
    pub server_url: String,
    pub room_name: String,
}

impl RoomParams {
    fn is_complete(&self) -> bool {
        !self.token.is_empty() && !self.server_url.is_empty() && !self.room_name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomPhase {
    Idle,
    Connecting,
    Connected,
    Disconnected,
    Failed(String),
}

#[derive(Debug, Clone, Copy)]
enum LocalTrack {
    Microphone,
    Camera,
    ScreenShare,
}

struct RoomInner {
    phase: RoomPhase,
    room: Option<Arc<dyn MediaRoom>>,
    generation: u64,
    pump: Option<JoinHandle<()>>,
}

/// State shared with the pump task. Lock order is `inner` then `state`.
struct RoomShared {
    state: RwLock<RoomState>,
    inner: Mutex<RoomInner>,
}

impl RoomShared {
    fn current_room(&self, generation: u64) -> Option<Option<Arc<dyn MediaRoom>>> {
        let inner = self.inner.lock();
        (inner.generation == generation).then(|| inner.room.clone())
    }

    fn handle_event(&self, generation: u64, event: RoomEvent) {
        let Some(room) = self.current_room(generation) else {
            trace!(generation, "Ignoring event from superseded room");
            return;
        };

        match event {
            RoomEvent::Connected => {
                self.mark_connected(generation);
            }
            RoomEvent::Disconnected { reason } => {
                let mut inner = self.inner.lock();
                if inner.generation != generation {
                    return;
                }
                info!(reason = ?reason, "Disconnected from room");
                inner.phase = RoomPhase::Disconnected;
                inner.room = None;
                // Detach rather than abort: this may be the pump itself
                inner.pump = None;
                self.state.write().disconnect();
            }
            RoomEvent::ParticipantConnected(participant) => {
                debug!(identity = %participant.identity, "Participant connected");
                if let Some(room) = room {
                    self.refresh_participants(room.as_ref());
                }
            }
            RoomEvent::ParticipantDisconnected(participant) => {
                debug!(identity = %participant.identity, "Participant disconnected");
                if let Some(room) = room {
                    self.refresh_participants(room.as_ref());
                }
            }
            RoomEvent::ConnectionQualityChanged {
                quality,
                participant,
            } => {
                if !participant.is_local {
                    return;
                }
                let latency = room.as_ref().map(|r| r.latency_ms()).unwrap_or(0.0);
                self.state.write().update_quality(QualityMetrics {
                    connection_quality: ConnectionQuality::from_code(quality),
                    latency,
                    bandwidth: 0.0,
                });
            }
            RoomEvent::RoomMetadataChanged(metadata) => {
                info!(metadata = %metadata, "Room metadata changed");
            }
        }
    }

    /// Promote `Connecting` to `Connected`. A room already torn down by a
    /// `Disconnected` event stays down.
    fn mark_connected(&self, generation: u64) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation || inner.room.is_none() {
            return false;
        }
        if inner.phase != RoomPhase::Connecting {
            return inner.phase == RoomPhase::Connected;
        }
        inner.phase = RoomPhase::Connected;
        let room = inner.room.clone();
        let mut state = self.state.write();
        state.connect_success();
        if let Some(room) = room {
            state.update_participants(participants_of(room.as_ref()));
        }
        info!(room = ?state.room_name, "Connected to room");
        true
    }

    fn refresh_participants(&self, room: &dyn MediaRoom) {
        let participants = participants_of(room);
        trace!(count = participants.len(), "Participants updated");
        self.state.write().update_participants(participants);
    }
}

/// Local participant first, then remotes in SDK order
fn participants_of(room: &dyn MediaRoom) -> Vec<Participant> {
    let local = room.local_participant();
    let remotes = room.remote_participants();
    local
        .iter()
        .chain(remotes.iter())
        .map(ParticipantInfo::to_participant)
        .collect()
}

async fn pump_events(
    shared: Arc<RoomShared>,
    generation: u64,
    events: async_channel::Receiver<RoomEvent>,
) {
    while let Ok(event) = events.recv().await {
        let finished = matches!(event, RoomEvent::Disconnected { .. });
        shared.handle_event(generation, event);
        if finished {
            break;
        }
    }
    trace!(generation, "Room event pump ended");
}

pub struct RoomBridge {
    sdk: Arc<dyn MediaSdk>,
    params: RoomParams,
    shared: Arc<RoomShared>,
}

impl RoomBridge {
    pub fn new(sdk: Arc<dyn MediaSdk>, params: RoomParams) -> Self {
        Self {
            sdk,
            params,
            shared: Arc::new(RoomShared {
                state: RwLock::new(RoomState::default()),
                inner: Mutex::new(RoomInner {
                    phase: RoomPhase::Idle,
                    room: None,
                    generation: 0,
                    pump: None,
                }),
            }),
        }
    }

    /// Join the room.
    ///
    /// `Ok(false)` means the room is not live: a parameter is missing, a
    /// connect is already in flight or the room is live, or a `disconnect`
    /// or `Disconnected` event ended this attempt while it was pending.
    pub async fn connect(&self) -> Result<bool> {
        if !self.params.is_complete() {
            debug!("Room parameters incomplete, not connecting");
            return Ok(false);
        }

        let (room, generation) = {
            let mut inner = self.shared.inner.lock();
            if matches!(inner.phase, RoomPhase::Connecting | RoomPhase::Connected) {
                return Ok(false);
            }
            inner.phase = RoomPhase::Connecting;
            inner.generation += 1;
            let generation = inner.generation;
            if let Some(stale) = inner.pump.take() {
                stale.abort();
            }

            let handle = self.sdk.create_room(RoomOptions::default());
            inner.room = Some(handle.room.clone());
            inner.pump = Some(tokio::spawn(pump_events(
                self.shared.clone(),
                generation,
                handle.events,
            )));
            self.shared
                .state
                .write()
                .connect_start(self.params.room_name.clone());
            (handle.room, generation)
        };

        info!(room = %self.params.room_name, generation, "Connecting to room");
        let result = room
            .connect(&self.params.server_url, &self.params.token)
            .await;

        match result {
            Ok(()) => {
                if !self.shared.mark_connected(generation) {
                    debug!(generation, "Connect completed for a room that is already gone");
                    return Ok(false);
                }
                Ok(true)
            }
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, room = %self.params.room_name, "Failed to connect to room");
                let mut inner = self.shared.inner.lock();
                if inner.generation == generation {
                    inner.phase = RoomPhase::Failed(message.clone());
                    inner.room = None;
                    if let Some(pump) = inner.pump.take() {
                        pump.abort();
                    }
                    self.shared.state.write().connect_failure(message.clone());
                }
                Err(AppError::Room(message))
            }
        }
    }

    /// Leave the room and reset the store. Safe to call in any phase.
    pub fn disconnect(&self) {
        let (room, pump) = {
            let mut inner = self.shared.inner.lock();
            inner.generation += 1;
            if inner.phase != RoomPhase::Idle {
                inner.phase = RoomPhase::Disconnected;
            }
            (inner.room.take(), inner.pump.take())
        };

        if let Some(pump) = pump {
            pump.abort();
        }
        if let Some(room) = room {
            info!(room = %self.params.room_name, "Leaving room");
            room.disconnect();
        }
        self.shared.state.write().disconnect();
    }

    /// Flip the local microphone. `Ok(None)` when there is no room.
    pub async fn toggle_microphone(&self) -> Result<Option<bool>> {
        self.toggle(LocalTrack::Microphone).await
    }

    pub async fn toggle_camera(&self) -> Result<Option<bool>> {
        self.toggle(LocalTrack::Camera).await
    }

    pub async fn toggle_screen_share(&self) -> Result<Option<bool>> {
        self.toggle(LocalTrack::ScreenShare).await
    }

    async fn toggle(&self, track: LocalTrack) -> Result<Option<bool>> {
        let Some(room) = self.shared.inner.lock().room.clone() else {
            return Ok(None);
        };
        let Some(local) = room.local_participant() else {
            return Ok(None);
        };

        let enabled = !match track {
            LocalTrack::Microphone => local.microphone_enabled,
            LocalTrack::Camera => local.camera_enabled,
            LocalTrack::ScreenShare => local.screen_share_enabled,
        };
        let result = match track {
            LocalTrack::Microphone => room.set_microphone_enabled(enabled).await,
            LocalTrack::Camera => room.set_camera_enabled(enabled).await,
            LocalTrack::ScreenShare => room.set_screen_share_enabled(enabled).await,
        };
        result.map_err(|e| {
            warn!(track = ?track, error = %e, "Track toggle failed");
            AppError::Room(e.to_string())
        })?;

        debug!(track = ?track, enabled, "Local track toggled");
        self.shared.refresh_participants(room.as_ref());
        Ok(Some(enabled))
    }

    pub fn clear_error(&self) {
        self.shared.state.write().clear_error();
    }

    pub fn state(&self) -> RoomState {
        self.shared.state.read().clone()
    }

    pub fn phase(&self) -> RoomPhase {
        self.shared.inner.lock().phase.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state.read().is_connected
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.shared.state.read().participants.clone()
    }

    pub fn quality(&self) -> QualityMetrics {
        self.shared.state.read().quality
    }

    pub fn error(&self) -> Option<String> {
        self.shared.state.read().error.clone()
    }

    pub fn room_name(&self) -> &str {
        &self.params.room_name
    }

    /// Media token this bridge joins with
    pub fn token(&self) -> &str {
        &self.params.token
    }
}

impl Drop for RoomBridge {
    fn drop(&mut self) {
        self.disconnect();
    }
}
