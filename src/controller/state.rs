use std::time::Duration;

use crate::audio::TransportState;
use crate::config::PlaybackSettings;
use crate::library::{Playlist, Track};

/// Mutable transport state owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: Option<usize>,
    pub paused: bool,
    pub loop_enabled: bool,
    pub autoplay_enabled: bool,
    pub volume_percent: u8,
    /// A backend session exists for `current_index`.
    pub session_loaded: bool,
    /// Last failure reported by the backend in the middle of a track.
    pub last_error: Option<String>,
}

impl PlaybackState {
    pub fn new(settings: &PlaybackSettings) -> Self {
        Self {
            current_index: None,
            paused: false,
            loop_enabled: settings.loop_enabled,
            autoplay_enabled: settings.autoplay,
            volume_percent: clamp_volume(settings.volume),
            session_loaded: false,
            last_error: None,
        }
    }

    pub(super) fn gain(&self) -> f32 {
        f32::from(self.volume_percent) / 100.0
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(&PlaybackSettings::default())
    }
}

pub(super) fn clamp_volume(percent: i32) -> u8 {
    // Lossless: the value is within 0..=100 after clamping.
    percent.clamp(0, 100) as u8
}

/// What `on_backend_finished` did with the notification.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// Stopped by hand, stale, or nothing loaded.
    Ignored,
    /// Restarted the same track from zero.
    Looped(usize),
    /// Autoplay moved on to this index.
    Advanced(usize),
    /// Finished naturally with autoplay off.
    Stopped,
}

/// Result of a skip/rewind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeekOutcome {
    Moved(Duration),
    /// Seeking past the end started the next track instead.
    Advanced(usize),
}

/// Everything the renderer needs for one frame, read under a single lock.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub playlist: Playlist,
    pub current_index: Option<usize>,
    pub transport: TransportState,
    pub paused: bool,
    pub loop_enabled: bool,
    pub autoplay_enabled: bool,
    pub volume_percent: u8,
    pub position: Duration,
    pub total: Duration,
    pub last_error: Option<String>,
}

impl PlayerSnapshot {
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.playlist.get(i))
    }

    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }

    /// Elapsed fraction of the current track in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.total.as_secs_f64()).clamp(0.0, 1.0)
    }
}
