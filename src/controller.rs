//! The playlist controller.
//!
//! `PlaylistController` is the single authority for what plays next and what
//! the transport is doing. It owns the playlist, the current index and the
//! pause/loop/autoplay/volume flags, and drives an `AudioBackend`.
//!
//! Every public method locks one mutex for its whole read-modify-write, so
//! key commands and backend finish notifications never interleave, whichever
//! thread they arrive on.

mod error;
mod state;

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::audio::{AudioBackend, AudioError, TransportState};
use crate::config::{LibrarySettings, PlaybackSettings};
use crate::library::{Playlist, Track};

pub use error::ControlError;
pub use state::{FinishOutcome, PlaybackState, PlayerSnapshot, SeekOutcome};

use state::clamp_volume;

pub type ControlResult<T> = Result<T, ControlError>;

pub struct PlaylistController<B> {
    inner: Mutex<Inner<B>>,
}

struct Inner<B> {
    backend: B,
    playlist: Playlist,
    state: PlaybackState,
    finish_tolerance: Duration,
}

impl<B: AudioBackend> PlaylistController<B> {
    pub fn new(backend: B, settings: &PlaybackSettings) -> Self {
        let mut inner = Inner {
            backend,
            playlist: Playlist::default(),
            state: PlaybackState::new(settings),
            finish_tolerance: Duration::from_millis(settings.finish_tolerance_ms),
        };
        let gain = inner.state.gain();
        inner.backend.set_volume(gain);

        Self {
            inner: Mutex::new(inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<B>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scan `folders` and replace the playlist. Returns whether anything was found.
    ///
    /// Scanning happens before the lock is taken.
    pub fn load(&self, folders: &[PathBuf], settings: &LibrarySettings) -> bool {
        let playlist = Playlist::from_folders(folders, settings);
        self.replace_playlist(playlist)
    }

    /// Swap in a new playlist, stopping playback and clearing the current index.
    pub fn replace_playlist(&self, playlist: Playlist) -> bool {
        let mut inner = self.lock();
        inner.stop_session();
        inner.state.current_index = None;
        inner.playlist = playlist;
        info!(tracks = inner.playlist.len(), "playlist loaded");
        !inner.playlist.is_empty()
    }

    /// Play `index`, or replay the current track (index 0 if none) when `None`.
    pub fn play(&self, index: Option<usize>) -> ControlResult<usize> {
        self.lock().play(index)
    }

    pub fn play_random(&self) -> ControlResult<usize> {
        self.play_random_with(&mut rand::rng())
    }

    /// Pick uniformly over the whole playlist; the current track may repeat.
    pub fn play_random_with<R: Rng>(&self, rng: &mut R) -> ControlResult<usize> {
        let mut inner = self.lock();
        let len = inner.playlist.len();
        if len == 0 {
            return Err(ControlError::EmptyPlaylist);
        }
        let index = rng.random_range(0..len);
        inner.start(index)
    }

    pub fn play_next(&self) -> ControlResult<usize> {
        self.lock().play_next()
    }

    pub fn play_previous(&self) -> ControlResult<usize> {
        self.lock().play_previous()
    }

    /// Flip between paused and playing. Returns the new paused flag.
    pub fn toggle_pause(&self) -> ControlResult<bool> {
        let mut inner = self.lock();
        if !inner.state.session_loaded {
            return Err(ControlError::NothingLoaded);
        }

        if inner.state.paused {
            inner.backend.resume();
            inner.state.paused = false;
            debug!("resumed playback");
        } else if inner.backend.state() == TransportState::Playing {
            inner.backend.pause();
            inner.state.paused = true;
            debug!("paused playback");
        }
        Ok(inner.state.paused)
    }

    /// Seek forward; running off the end starts the next track.
    pub fn skip_forward(&self, seconds: u64) -> ControlResult<SeekOutcome> {
        let mut inner = self.lock();
        inner.require_active()?;

        let target = inner.backend.position() + Duration::from_secs(seconds);
        let total = inner.backend.total_duration();
        if !total.is_zero() && target >= total {
            return inner.play_next().map(SeekOutcome::Advanced);
        }
        inner.seek_to(target).map(SeekOutcome::Moved)
    }

    /// Seek backward, stopping at the start of the track.
    pub fn rewind(&self, seconds: u64) -> ControlResult<SeekOutcome> {
        let mut inner = self.lock();
        inner.require_active()?;

        let target = inner
            .backend
            .position()
            .saturating_sub(Duration::from_secs(seconds));
        inner.seek_to(target).map(SeekOutcome::Moved)
    }

    pub fn toggle_loop(&self) -> bool {
        let mut inner = self.lock();
        inner.state.loop_enabled = !inner.state.loop_enabled;
        info!(enabled = inner.state.loop_enabled, "loop toggled");
        inner.state.loop_enabled
    }

    pub fn toggle_autoplay(&self) -> bool {
        let mut inner = self.lock();
        inner.state.autoplay_enabled = !inner.state.autoplay_enabled;
        info!(enabled = inner.state.autoplay_enabled, "autoplay toggled");
        inner.state.autoplay_enabled
    }

    /// Set the volume, clamped to 0..=100. Returns the applied value.
    pub fn set_volume(&self, percent: i32) -> u8 {
        self.lock().set_volume(percent)
    }

    pub fn adjust_volume(&self, delta: i32) -> u8 {
        let mut inner = self.lock();
        let target = i32::from(inner.state.volume_percent).saturating_add(delta);
        inner.set_volume(target)
    }

    /// Case-insensitive substring search over track names as `(name, index)`.
    pub fn search_by_name(&self, query: &str) -> Vec<(String, usize)> {
        self.lock().playlist.search(query)
    }

    /// Handle the end of a backend session.
    ///
    /// Errors are recorded and never auto-advance; the record is cleared when
    /// the next track starts. A session counts as finished naturally when it
    /// has played and its position is within the finish tolerance of the
    /// total duration; anything else is a manual or stale stop.
    pub fn on_backend_finished(&self, error: Option<String>) -> ControlResult<FinishOutcome> {
        let mut inner = self.lock();

        if let Some(err) = error {
            warn!(error = %err, "backend reported a playback error");
            inner.state.paused = false;
            inner.state.last_error = Some(err.clone());
            return Err(ControlError::BackendError(err));
        }

        let Some(index) = inner.state.current_index else {
            return Ok(FinishOutcome::Ignored);
        };
        if !inner.state.session_loaded {
            return Ok(FinishOutcome::Ignored);
        }

        let position = inner.backend.position();
        let total = inner.backend.total_duration();
        // A queued event from the previous session can land right after a new
        // track starts; a session that hasn't advanced has not finished.
        if position.is_zero() && !total.is_zero() {
            debug!(?total, "finish before any playback; treating as stale");
            return Ok(FinishOutcome::Ignored);
        }
        if position + inner.finish_tolerance < total {
            debug!(?position, ?total, "session ended early; not advancing");
            return Ok(FinishOutcome::Ignored);
        }

        if inner.state.loop_enabled {
            inner.seek_to(Duration::ZERO)?;
            inner.backend.play();
            inner.state.paused = false;
            debug!(index, "looping track");
            Ok(FinishOutcome::Looped(index))
        } else if inner.state.autoplay_enabled {
            inner.play_next().map(FinishOutcome::Advanced)
        } else {
            inner.state.paused = false;
            Ok(FinishOutcome::Stopped)
        }
    }

    /// Stop the backend and release the session.
    pub fn shutdown(&self) {
        self.lock().stop_session();
    }

    pub fn current_index(&self) -> Option<usize> {
        self.lock().state.current_index
    }

    pub fn current_track(&self) -> Option<Track> {
        let inner = self.lock();
        inner.current_track().cloned()
    }

    pub fn current_track_name(&self) -> Option<String> {
        let inner = self.lock();
        inner.current_track().map(|t| t.name.clone())
    }

    pub fn is_playing(&self) -> bool {
        self.lock().transport() == TransportState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.lock().state.paused
    }

    pub fn is_loop_enabled(&self) -> bool {
        self.lock().state.loop_enabled
    }

    pub fn is_autoplay_enabled(&self) -> bool {
        self.lock().state.autoplay_enabled
    }

    pub fn volume_percent(&self) -> u8 {
        self.lock().state.volume_percent
    }

    pub fn current_position(&self) -> Duration {
        self.lock().position()
    }

    pub fn total_duration(&self) -> Duration {
        self.lock().total()
    }

    pub fn playlist_len(&self) -> usize {
        self.lock().playlist.len()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().state.last_error.clone()
    }

    /// A copy of the state for drawing one frame.
    pub fn state(&self) -> PlaybackState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let inner = self.lock();
        PlayerSnapshot {
            playlist: inner.playlist.clone(),
            current_index: inner.state.current_index,
            transport: inner.transport(),
            paused: inner.state.paused,
            loop_enabled: inner.state.loop_enabled,
            autoplay_enabled: inner.state.autoplay_enabled,
            volume_percent: inner.state.volume_percent,
            position: inner.position(),
            total: inner.total(),
            last_error: inner.state.last_error.clone(),
        }
    }
}

impl<B: AudioBackend> Inner<B> {
    fn current_track(&self) -> Option<&Track> {
        self.state.current_index.and_then(|i| self.playlist.get(i))
    }

    fn transport(&self) -> TransportState {
        if self.state.session_loaded {
            self.backend.state()
        } else {
            TransportState::Stopped
        }
    }

    fn position(&self) -> Duration {
        if self.state.session_loaded {
            self.backend.position()
        } else {
            Duration::ZERO
        }
    }

    fn total(&self) -> Duration {
        if self.state.session_loaded {
            self.backend.total_duration()
        } else {
            Duration::ZERO
        }
    }

    fn stop_session(&mut self) {
        if self.state.session_loaded {
            self.backend.stop();
        }
        self.state.session_loaded = false;
        self.state.paused = false;
    }

    fn require_active(&self) -> ControlResult<()> {
        if !self.state.session_loaded || self.backend.state() == TransportState::Stopped {
            return Err(ControlError::NothingLoaded);
        }
        Ok(())
    }

    fn play(&mut self, index: Option<usize>) -> ControlResult<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(ControlError::EmptyPlaylist);
        }
        let target = match index {
            Some(i) if i < len => i,
            Some(i) => return Err(ControlError::InvalidIndex { index: i, len }),
            None => self.state.current_index.unwrap_or(0),
        };
        self.start(target)
    }

    fn play_next(&mut self) -> ControlResult<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(ControlError::EmptyPlaylist);
        }
        let next = self.state.current_index.map_or(0, |i| (i + 1) % len);
        self.start(next)
    }

    fn play_previous(&mut self) -> ControlResult<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(ControlError::EmptyPlaylist);
        }
        let prev = self.state.current_index.map_or(len - 1, |i| (i + len - 1) % len);
        self.start(prev)
    }

    /// Tear down the old session and start `index`. The only place a session begins.
    fn start(&mut self, index: usize) -> ControlResult<usize> {
        self.stop_session();

        let Some(track) = self.playlist.get(index) else {
            return Err(ControlError::InvalidIndex {
                index,
                len: self.playlist.len(),
            });
        };
        let path = track.path.clone();
        let name = track.name.clone();

        match self.backend.load(&path) {
            Ok(total) => {
                let gain = self.state.gain();
                self.backend.set_volume(gain);
                self.backend.play();
                self.state.current_index = Some(index);
                self.state.paused = false;
                self.state.session_loaded = true;
                self.state.last_error = None;
                info!(index, track = %name, ?total, "now playing");
                Ok(index)
            }
            Err(source) => Err(self.fail_session(path, source)),
        }
    }

    fn seek_to(&mut self, target: Duration) -> ControlResult<Duration> {
        match self.backend.seek(target) {
            Ok(()) => Ok(target),
            Err(source) => {
                let path = self
                    .current_track()
                    .map(|t| t.path.clone())
                    .unwrap_or_default();
                Err(self.fail_session(path, source))
            }
        }
    }

    /// Drop back to "nothing loaded" after the backend could not open or reopen a file.
    fn fail_session(&mut self, path: PathBuf, source: AudioError) -> ControlError {
        warn!(path = %path.display(), error = %source, "playback failed");
        self.backend.stop();
        self.state.session_loaded = false;
        self.state.paused = false;
        self.state.current_index = None;
        ControlError::PlaybackFailed { path, source }
    }

    fn set_volume(&mut self, percent: i32) -> u8 {
        self.state.volume_percent = clamp_volume(percent);
        let gain = self.state.gain();
        self.backend.set_volume(gain);
        debug!(volume = self.state.volume_percent, "volume set");
        self.state.volume_percent
    }
}
