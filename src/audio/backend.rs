use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;

use super::types::{BackendEvent, TransportState};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("no track is loaded")]
    NoSession,
    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// A single-session audio output.
///
/// At most one session exists at a time: `load` replaces whatever was loaded
/// before. A freshly loaded session is paused at position zero until `play`.
pub trait AudioBackend {
    /// Open `path` as the new session and return its total duration
    /// (`Duration::ZERO` when unknown).
    fn load(&mut self, path: &Path) -> Result<Duration, AudioError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    /// Stop and release the current session. Never emits `Finished`.
    fn stop(&mut self);
    fn seek(&mut self, to: Duration) -> Result<(), AudioError>;
    fn position(&self) -> Duration;
    fn total_duration(&self) -> Duration;
    fn state(&self) -> TransportState;
    /// `volume` is linear gain in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    /// Register where `BackendEvent`s are delivered.
    fn on_finished(&mut self, notify: Sender<BackendEvent>);
}
