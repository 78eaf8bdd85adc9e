//! Readout math shared by the controller and the UI.

/// Format seconds as `m:ss`. Minutes are not padded or capped.
///
/// Negative and non-finite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}

/// Playhead position as a whole percentage of `duration`.
///
/// Both inputs are rounded to whole seconds before dividing, so the bar moves
/// in one-second steps. Returns 0 while the duration is unknown (0).
pub fn progress_percentage(current_time: f64, duration: f64) -> u8 {
    let duration = finite_or_zero(duration).round();
    if duration <= 0.0 {
        return 0;
    }
    let current = finite_or_zero(current_time).round();
    (current / duration * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Volume fraction as a whole percentage.
pub fn volume_percentage(volume: f64) -> u8 {
    (finite_or_zero(volume).clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Icon bucket for the volume control.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeLevel {
    Muted,
    Low,
    High,
}

impl VolumeLevel {
    pub fn from_volume(volume: f64) -> Self {
        if volume <= 0.0 {
            Self::Muted
        } else if volume > 0.5 {
            Self::High
        } else {
            Self::Low
        }
    }
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
