use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::CatalogError;
use super::model::{Playlist, Track};

/// On-disk shape of a catalog: a list of `[[track]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "track", default)]
    tracks: Vec<Track>,
}

/// Read a TOML catalog and validate it into a playlist.
///
/// Relative `audio`/`cover` references resolve against the catalog's directory.
pub fn load_catalog(path: &Path) -> Result<Playlist, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_catalog(&text, base_dir)
}

pub fn parse_catalog(text: &str, base_dir: &Path) -> Result<Playlist, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;
    let tracks = file
        .tracks
        .into_iter()
        .map(|t| Track {
            audio: resolve_reference(&t.audio, base_dir),
            cover: resolve_reference(&t.cover, base_dir),
            ..t
        })
        .collect();
    Ok(Playlist::new(tracks)?)
}

/// URLs, absolute paths and empty references are kept as written.
fn resolve_reference(reference: &str, base_dir: &Path) -> String {
    let reference = reference.trim();
    if reference.is_empty() || reference.contains("://") || Path::new(reference).is_absolute() {
        return reference.to_string();
    }
    base_dir.join(reference).to_string_lossy().into_owned()
}
