//! Library scanning and playlist construction.
//!
//! Folders are walked for audio files, tags are read with `lofty`, and the
//! result is collected into a de-duplicated, path-sorted `Playlist`.

mod model;
mod playlist;
mod scan;

pub use model::Track;
pub use playlist::Playlist;

#[cfg(test)]
mod tests;
