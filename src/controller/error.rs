use std::path::PathBuf;

use thiserror::Error;

use crate::audio::AudioError;

/// Advisory signals returned by controller operations.
///
/// None of these leave the controller half-updated; the UI only has to show them.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("no music files loaded")]
    EmptyPlaylist,
    #[error("invalid song index {index} (playlist has {len} songs)")]
    InvalidIndex { index: usize, len: usize },
    #[error("no song is loaded")]
    NothingLoaded,
    #[error("error playing {}: {source}", path.display())]
    PlaybackFailed {
        path: PathBuf,
        #[source]
        source: AudioError,
    },
    #[error("playback error: {0}")]
    BackendError(String),
}
