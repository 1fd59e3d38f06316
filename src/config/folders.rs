//! The music folder list: a plain text file with one folder path per line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::load::default_config_dir;
use super::schema::LibrarySettings;

/// Pick the folder list file: an explicit path wins, then
/// `library.folders_file`, then `folders.txt` next to the config file.
pub fn resolve_folders_file(explicit: Option<&Path>, settings: &LibrarySettings) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Some(p) = &settings.folders_file {
        return Some(p.clone());
    }
    default_config_dir().map(|d| d.join("folders.txt"))
}

/// Read folder paths from `path`.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
pub fn read_folder_list(path: &Path) -> io::Result<Vec<PathBuf>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_folder_list(&text))
}

pub(super) fn parse_folder_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}
