//! Utilities for creating `rodio` sinks from files.
//!
//! Seeking is implemented by building a fresh sink whose source skips ahead
//! to the requested offset.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, Sink, Source, mixer::Mixer};

use super::backend::AudioError;

pub(super) type FileDecoder = Decoder<BufReader<File>>;

pub(super) fn open_decoder(path: &Path) -> Result<FileDecoder, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the duration reported by the decoder, if it knows one.
pub(super) fn create_sink_at(
    mixer: &Mixer,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let decoder = open_decoder(path)?;
    let total = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(mixer);
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
