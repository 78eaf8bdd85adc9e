use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Stable identifier of a track inside a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A playable item. Tracks are never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    /// Cover image reference (path or URL), may be empty.
    #[serde(default)]
    pub cover: String,
    /// Audio source reference handed to the media device.
    pub audio: String,
    /// Gradient endpoints, as `#rrggbb` strings.
    pub color: [String; 2],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("playlist is empty")]
    Empty,
    #[error("duplicate track id: {0}")]
    DuplicateId(TrackId),
}

/// Ordered, non-empty list of tracks with unique ids. Index order is skip order.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }

        let mut seen: HashSet<&TrackId> = HashSet::with_capacity(tracks.len());
        for t in &tracks {
            if !seen.insert(&t.id) {
                return Err(PlaylistError::DuplicateId(t.id.clone()));
            }
        }

        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn first(&self) -> &Track {
        &self.tracks[0]
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.position(id).is_some()
    }

    /// Index after `index`, wrapping from the last track to the first.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.tracks.len()
    }

    /// Index before `index`, wrapping from the first track to the last.
    pub fn prev_index(&self, index: usize) -> usize {
        if index == 0 {
            self.tracks.len() - 1
        } else {
            index - 1
        }
    }
}
