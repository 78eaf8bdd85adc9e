//! Track catalog: the `Track`/`Playlist` model plus the two ways of building
//! a playlist, from a TOML catalog file or by scanning a music directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::LibrarySettings;

mod catalog;
mod model;
mod scan;

pub use catalog::{load_catalog, parse_catalog};
pub use model::{Playlist, PlaylistError, Track, TrackId};
pub use scan::scan;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unusable playlist: {0}")]
    Playlist(#[from] PlaylistError),
}

/// Build the session playlist from `source`: a directory is scanned, anything
/// else is read as a TOML catalog.
pub fn load_playlist(source: &Path, settings: &LibrarySettings) -> Result<Playlist, CatalogError> {
    if source.is_dir() {
        Ok(Playlist::new(scan(source, settings))?)
    } else {
        load_catalog(source)
    }
}
