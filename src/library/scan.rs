use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

/// Lower-cased extensions without their leading dot.
fn wanted_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_extension(path: &Path, wanted: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    wanted.iter().any(|w| w.eq_ignore_ascii_case(ext))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn non_blank(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Fill tag metadata from the file. Unreadable tags leave the track as-is.
fn read_tags(track: &mut Track) {
    let Ok(tagged) = lofty::read_from_path(&track.path) else {
        return;
    };
    track.duration = Some(tagged.properties().duration());

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        track.title = tag.title().as_deref().and_then(non_blank);
        track.artist = tag.artist().as_deref().and_then(non_blank);
        track.album = tag.album().as_deref().and_then(non_blank);
    }
}

fn walker(dir: &Path, settings: &LibrarySettings) -> WalkDir {
    let walker = WalkDir::new(dir).follow_links(settings.follow_links);
    // WalkDir counts the root as depth 0, so depth 1 is the folder's own entries.
    match (settings.recursive, settings.max_depth) {
        (false, _) => walker.max_depth(1),
        (true, Some(depth)) => walker.max_depth(depth),
        (true, None) => walker,
    }
}

/// Collect audio files under `dir`.
///
/// Only the folder itself is listed unless `settings.recursive` is set. The
/// returned order is whatever the walk produced; `Playlist` does the sorting.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let wanted = wanted_extensions(settings);
    let visible = |path: &Path| settings.include_hidden || !is_hidden(path);

    let tracks: Vec<Track> = walker(dir, settings)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || visible(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && has_extension(e.path(), &wanted))
        .map(|e| {
            let mut track = Track::from_path(e.path());
            read_tags(&mut track);
            track
        })
        .collect();

    debug!(dir = %dir.display(), found = tracks.len(), "scanned folder");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn default_extensions_match_case_insensitively() {
        let wanted = wanted_extensions(&LibrarySettings::default());
        for name in ["a.mp3", "a.MP3", "a.wav", "a.Ogg", "a.flac"] {
            assert!(has_extension(Path::new(name), &wanted), "{name}");
        }
        assert!(!has_extension(Path::new("a.txt"), &wanted));
        assert!(!has_extension(Path::new("a"), &wanted));
    }

    #[test]
    fn extensions_tolerate_leading_dots_and_spaces() {
        let settings = LibrarySettings {
            extensions: vec![" .Mp3 ".into(), "  ".into()],
            ..LibrarySettings::default()
        };
        let wanted = wanted_extensions(&settings);
        assert_eq!(wanted, vec!["mp3".to_string()]);
        assert!(has_extension(Path::new("/tmp/a.mp3"), &wanted));
        assert!(!has_extension(Path::new("/tmp/a.wav"), &wanted));
    }

    #[test]
    fn scan_filters_non_audio_and_keeps_file_names() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let mut names: Vec<String> = scan(dir.path(), &LibrarySettings::default())
            .into_iter()
            .map(|t| t.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["A.ogg".to_string(), "b.MP3".to_string()]);
    }

    #[test]
    fn scan_skips_hidden_files_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "visible.mp3");
    }

    #[test]
    fn scan_is_flat_unless_recursive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let flat = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].name, "root.mp3");

        let settings = LibrarySettings {
            recursive: true,
            ..LibrarySettings::default()
        };
        assert_eq!(scan(dir.path(), &settings).len(), 2);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            recursive: true,
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let names: Vec<String> = scan(dir.path(), &settings)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert!(names.contains(&"root.mp3".to_string()));
        assert!(names.contains(&"one.mp3".to_string()));
        assert!(!names.contains(&"two.mp3".to_string()));
    }
}
