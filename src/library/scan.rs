use std::path::Path;

use lofty::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Track, TrackId};

/// Gradient pairs handed out round-robin to scanned tracks.
const PALETTE: [(&str, &str); 6] = [
    ("#205950", "#2ab3bf"),
    ("#ef8ea9", "#ab417f"),
    ("#cd607d", "#c94043"),
    ("#eb5757", "#000000"),
    ("#8e9eab", "#eef2f3"),
    ("#f2994a", "#f2c94c"),
];

const COVER_STEMS: [&str; 3] = ["cover", "folder", "front"];
const COVER_EXTS: [&str; 3] = ["jpg", "jpeg", "png"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// First `cover.jpg`/`folder.png`/... next to the audio file, if any.
fn find_cover(dir: &Path) -> Option<String> {
    COVER_STEMS.iter().find_map(|stem| {
        COVER_EXTS.iter().find_map(|ext| {
            let candidate = dir.join(format!("{stem}.{ext}"));
            candidate
                .is_file()
                .then(|| candidate.to_string_lossy().into_owned())
        })
    })
}

/// Tag title/artist, falling back to the file stem and an empty artist.
fn read_tags(path: &Path) -> (String, String) {
    let mut name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = String::new();

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                    name = v.trim().to_string();
                }
                if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                    artist = v.trim().to_string();
                }
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    (name, artist)
}

/// Walk `dir` for audio files and turn them into tracks ordered by
/// "artist - name", case-insensitively. Ids are the paths relative to `dir`.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !(path.is_file() && is_audio_file(path, settings)) {
            continue;
        }

        let (name, artist) = read_tags(path);
        let rel = path.strip_prefix(dir).unwrap_or(path);
        let cover = path.parent().and_then(find_cover).unwrap_or_default();

        tracks.push(Track {
            id: TrackId::new(rel.to_string_lossy()),
            name,
            artist,
            cover,
            audio: path.to_string_lossy().into_owned(),
            color: ["".to_string(), "".to_string()],
        });
    }

    tracks.sort_by_key(|t| format!("{} - {}", t.artist, t.name).to_lowercase());
    for (i, t) in tracks.iter_mut().enumerate() {
        let (from, to) = PALETTE[i % PALETTE.len()];
        t.color = [from.to_string(), to.to_string()];
    }
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(tracks: &[Track]) -> Vec<String> {
        tracks.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));

        let dotted = LibrarySettings {
            extensions: vec![".OPUS".into()],
            ..LibrarySettings::default()
        };
        assert!(is_audio_file(Path::new("/tmp/a.opus"), &dotted));
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_case_insensitive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(names(&tracks), vec!["A", "b"]);
        assert_eq!(tracks[0].id.as_str(), "A.ogg");
        assert!(tracks[0].artist.is_empty());
        assert!(tracks[0].audio.ends_with("A.ogg"));
    }

    #[test]
    fn scan_assigns_palette_colors_in_order() {
        let dir = tempdir().unwrap();
        for n in ["a", "b", "c", "d", "e", "f", "g"] {
            fs::write(dir.path().join(format!("{n}.mp3")), b"x").unwrap();
        }
        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks[0].color, ["#205950".to_string(), "#2ab3bf".to_string()]);
        assert_eq!(tracks[6].color, tracks[0].color);
        assert_ne!(tracks[1].color, tracks[0].color);
    }

    #[test]
    fn scan_picks_up_sibling_cover() {
        let dir = tempdir().unwrap();
        let album = dir.path().join("album");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("song.mp3"), b"x").unwrap();
        fs::write(album.join("folder.png"), b"png").unwrap();
        fs::write(dir.path().join("loose.mp3"), b"x").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        let song = tracks.iter().find(|t| t.name == "song").unwrap();
        assert!(song.cover.ends_with("folder.png"));
        let loose = tracks.iter().find(|t| t.name == "loose").unwrap();
        assert!(loose.cover.is_empty());
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        assert_eq!(names(&scan(dir.path(), &settings)), vec!["visible"]);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(names(&scan(dir.path(), &settings)), vec!["root"]);
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
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let found = names(&scan(dir.path(), &settings));
        assert!(found.contains(&"root".to_string()));
        assert!(found.contains(&"one".to_string()));
        assert!(!found.contains(&"two".to_string()));
    }
}
