use thiserror::Error;

use crate::library::{PlaylistError, TrackId};

/// Errors raised by [`PlaybackController`](super::PlaybackController) commands.
#[derive(Debug, Error, PartialEq)]
pub enum PlayerError {
    /// The playlist handed to the controller is unusable.
    #[error(transparent)]
    Playlist(#[from] PlaylistError),

    /// A track outside the session playlist was selected.
    #[error("track {0} is not part of the playlist")]
    UnknownTrack(TrackId),

    /// Seek target was NaN or infinite.
    #[error("invalid seek position: {0}")]
    InvalidSeek(f64),

    /// Volume was NaN or infinite.
    #[error("invalid volume: {0}")]
    InvalidVolume(f64),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
