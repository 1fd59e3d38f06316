use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{self, LibrarySettings, LogSettings};

/// Failures that stop the player before the terminal is taken over.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no folder list found; pass folders as arguments or create {0}")]
    NoFolderList(String),

    #[error("failed to read folder list {path}: {source}")]
    FolderList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("folder list {0} has no folders")]
    EmptyFolderList(PathBuf),
}

/// Folders to offer: positional CLI folders bypass the list file entirely.
pub fn resolve_folders(
    cli_folders: &[PathBuf],
    folders_file: Option<&Path>,
    settings: &LibrarySettings,
) -> Result<Vec<PathBuf>, StartupError> {
    if !cli_folders.is_empty() {
        return Ok(cli_folders.to_vec());
    }

    let path = config::resolve_folders_file(folders_file, settings).ok_or_else(|| {
        StartupError::NoFolderList("$XDG_CONFIG_HOME/cadenza/folders.txt".to_string())
    })?;

    let folders = match config::read_folder_list(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StartupError::NoFolderList(path.display().to_string()));
        }
        Err(source) => return Err(StartupError::FolderList { path, source }),
    };

    if folders.is_empty() {
        return Err(StartupError::EmptyFolderList(path));
    }
    Ok(folders)
}

/// `--log-dir`, then `log.directory`, then the XDG state dir.
pub fn resolve_log_dir(cli: Option<&Path>, settings: &LogSettings) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| settings.directory.clone())
        .or_else(config::default_state_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
