use super::{Playlist, Track};
use crate::config::LibrarySettings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn names(p: &Playlist) -> Vec<&str> {
    p.tracks().iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn from_tracks_sorts_by_path_and_drops_duplicates() {
    let p = Playlist::from_tracks(vec![
        Track::from_path("/m/c.mp3"),
        Track::from_path("/m/a.mp3"),
        Track::from_path("/m/b.mp3"),
        Track::from_path("/m/a.mp3"),
    ]);
    assert_eq!(names(&p), vec!["a.mp3", "b.mp3", "c.mp3"]);
    assert_eq!(p.len(), 3);
}

#[test]
fn track_name_is_file_name_with_extension() {
    let t = Track::from_path("/music/rock/Song One.MP3");
    assert_eq!(t.name, "Song One.MP3");
    assert!(t.title.is_none());
}

#[test]
fn search_is_case_insensitive_and_keeps_playlist_order() {
    let p = Playlist::from_tracks(vec![
        Track::from_path("/m/Blue Monday.mp3"),
        Track::from_path("/m/Another Blue.wav"),
        Track::from_path("/m/Red.mp3"),
    ]);
    assert_eq!(
        p.search("BLUE"),
        vec![
            ("Another Blue.wav".to_string(), 0),
            ("Blue Monday.mp3".to_string(), 1)
        ]
    );
    assert!(p.search("green").is_empty());
}

#[test]
fn blank_search_matches_nothing() {
    let p = Playlist::from_tracks(vec![Track::from_path("/m/a.mp3")]);
    assert!(p.search("").is_empty());
    assert!(p.search("   ").is_empty());
}

#[test]
fn from_folders_merges_dedups_and_skips_missing() {
    let dir = tempdir().unwrap();
    let rock = dir.path().join("rock");
    let jazz = dir.path().join("jazz");
    fs::create_dir_all(&rock).unwrap();
    fs::create_dir_all(&jazz).unwrap();
    fs::write(rock.join("b.mp3"), b"x").unwrap();
    fs::write(jazz.join("a.wav"), b"x").unwrap();

    let folders: Vec<PathBuf> = vec![
        rock.clone(),
        jazz.clone(),
        rock.clone(),
        dir.path().join("missing"),
    ];
    let p = Playlist::from_folders(&folders, &LibrarySettings::default());

    // jazz/ sorts before rock/
    assert_eq!(names(&p), vec!["a.wav", "b.mp3"]);
}
