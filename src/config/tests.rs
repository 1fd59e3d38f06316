use super::folders::parse_folder_list;
use super::load::{default_config_dir, default_state_dir, resolve_config_path};
use super::schema::*;
use super::{read_folder_list, resolve_folders_file};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_dir_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_dir().unwrap(),
        PathBuf::from("/tmp/xdg-config-home").join("cadenza")
    );
}

#[test]
fn default_state_dir_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_state_dir().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("state")
            .join("cadenza")
    );
}

#[test]
fn defaults_match_classic_player_behavior() {
    let s = Settings::default();
    assert_eq!(s.playback.volume, 50);
    assert!(s.playback.autoplay);
    assert!(!s.playback.loop_enabled);
    assert_eq!(s.playback.finish_tolerance_ms, 500);
    assert_eq!(s.controls.seek_seconds, 10);
    assert_eq!(s.controls.volume_step, 10);
    assert!(!s.library.recursive);
    assert!(!s.ui.show_progress_bar);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_seek_seconds() {
    let mut s = Settings::default();
    s.controls.seek_seconds = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume = 80
loop_enabled = true
autoplay = false
finish_tolerance_ms = 750

[controls]
seek_seconds = 5
volume_step = 2

[library]
folders_file = "/tmp/my-folders.txt"
extensions = ["mp3"]
recursive = true
max_depth = 3

[audio]
poll_ms = 100

[ui]
header_text = "hello"
show_progress_bar = true
tick_ms = 20

[log]
filter = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__PLAYBACK__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 80);
    assert!(s.playback.loop_enabled);
    assert!(!s.playback.autoplay);
    assert_eq!(s.playback.finish_tolerance_ms, 750);
    assert_eq!(s.controls.seek_seconds, 5);
    assert_eq!(s.controls.volume_step, 2);
    assert_eq!(
        s.library.folders_file.as_deref(),
        Some(Path::new("/tmp/my-folders.txt"))
    );
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.recursive);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.audio.poll_ms, 100);
    assert_eq!(s.ui.header_text, "hello");
    assert!(s.ui.show_progress_bar);
    assert_eq!(s.ui.tick_ms, 20);
    assert_eq!(s.log.filter, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENZA__PLAYBACK__VOLUME", "20");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 20);
}

#[test]
fn parse_folder_list_skips_blank_and_comment_lines() {
    let text = "/music/rock\n\n   # old stuff\n  /music/jazz  \r\n";
    assert_eq!(
        parse_folder_list(text),
        vec![PathBuf::from("/music/rock"), PathBuf::from("/music/jazz")]
    );
}

#[test]
fn read_folder_list_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_folder_list(&dir.path().join("nope.txt")).is_err());
}

#[test]
fn resolve_folders_file_prefers_explicit_then_settings() {
    let settings = LibrarySettings {
        folders_file: Some(PathBuf::from("/etc/cadenza/folders.txt")),
        ..LibrarySettings::default()
    };
    assert_eq!(
        resolve_folders_file(Some(Path::new("/tmp/cli.txt")), &settings),
        Some(PathBuf::from("/tmp/cli.txt"))
    );
    assert_eq!(
        resolve_folders_file(None, &settings),
        Some(PathBuf::from("/etc/cadenza/folders.txt"))
    );
}
