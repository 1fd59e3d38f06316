use std::path::{Path, PathBuf};
use std::time::Duration;

/// One playable file. `path` is the identity; everything else is derived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    /// File name including extension, e.g. `song.mp3`.
    pub name: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// Build a track with no tag metadata.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self {
            path,
            name,
            title: None,
            artist: None,
            album: None,
            duration: None,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
