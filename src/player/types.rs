use crate::library::TrackId;

use super::format::{VolumeLevel, format_time, progress_percentage, volume_percentage};

/// Per-track lifecycle of the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerPhase {
    /// Nothing has been loaded on the device yet.
    #[default]
    Idle,
    /// A load was issued; waiting for the device to report metadata.
    MetadataLoading,
    /// Metadata is known but playback has not started on this track.
    Ready,
    Playing,
    Paused,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipDirection {
    Forward,
    Backward,
}

/// Everything the UI renders from. Mutated only by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track_id: TrackId,
    /// Playback intent. May run ahead of the device while a load is pending.
    pub is_playing: bool,
    /// Seconds elapsed in the current track.
    pub current_time: f64,
    /// Track length in seconds, 0 until the device reports it.
    pub duration: f64,
    /// Output gain in `[0, 1]`.
    pub volume: f64,
    /// Drives the "now playing" animation on the cover.
    pub is_playing_indicator_active: bool,
    /// Whether the volume slider is shown.
    pub volume_control_expanded: bool,
    /// Reason the current source failed to load, if it did.
    pub load_error: Option<String>,
}

impl PlaybackState {
    pub fn new(current_track_id: TrackId) -> Self {
        Self {
            current_track_id,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_playing_indicator_active: false,
            volume_control_expanded: false,
            load_error: None,
        }
    }

    pub fn progress_percentage(&self) -> u8 {
        progress_percentage(self.current_time, self.duration)
    }

    pub fn volume_percentage(&self) -> u8 {
        volume_percentage(self.volume)
    }

    pub fn volume_level(&self) -> VolumeLevel {
        VolumeLevel::from_volume(self.volume)
    }

    pub fn elapsed_label(&self) -> String {
        format_time(self.current_time)
    }

    pub fn duration_label(&self) -> String {
        format_time(self.duration)
    }
}
