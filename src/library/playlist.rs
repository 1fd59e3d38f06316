use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::config::LibrarySettings;

use super::model::Track;
use super::scan::scan;

/// Ordered, de-duplicated list of tracks, sorted by path.
///
/// Immutable once built, so clones share the same track storage.
#[derive(Clone, Debug, Default)]
pub struct Playlist {
    tracks: Arc<[Track]>,
}

impl Playlist {
    pub fn from_tracks(mut tracks: Vec<Track>) -> Self {
        tracks.sort_by(|a, b| a.path.cmp(&b.path));
        tracks.dedup_by(|a, b| a.path == b.path);
        Self {
            tracks: tracks.into(),
        }
    }

    /// Scan every folder and merge the results. Folders that do not exist are
    /// logged and skipped.
    pub fn from_folders(folders: &[PathBuf], settings: &LibrarySettings) -> Self {
        let mut tracks = Vec::new();
        for folder in folders {
            if folder.is_dir() {
                tracks.extend(scan(folder, settings));
            } else {
                warn!(folder = %folder.display(), "music folder not found");
            }
        }
        Self::from_tracks(tracks)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Case-insensitive substring search over track names, in playlist order.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<(String, usize)> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name.to_lowercase().contains(&needle))
            .map(|(i, t)| (t.name.clone(), i))
            .collect()
    }
}
