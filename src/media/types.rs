//! Media-device vocabulary: the command trait the controller drives, the
//! events the device reports back, and the generation tag tying them together.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Monotonic tag attached to every `load`. Events carry the generation of the
/// load they belong to so late events from a replaced source can be dropped.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The playback engine as seen by the controller.
///
/// Every command returns immediately; outcomes are reported later as
/// [`MediaEvent`]s.
pub trait MediaTimeline {
    /// Replace the current source. A fresh load starts paused at 0.
    fn load(&mut self, generation: Generation, source: &str);
    fn play(&mut self);
    fn pause(&mut self);
    /// Move the playhead, in seconds.
    fn set_current_time(&mut self, seconds: f64);
    /// Output gain as a fraction in `[0, 1]`.
    fn set_volume(&mut self, volume: f64);
}

/// Events emitted by a media device, always after the command that caused them.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration of the loaded source became known.
    MetadataLoaded { generation: Generation, duration: f64 },
    /// Periodic playhead report. `duration` is `None` while still unknown.
    TimeUpdated {
        generation: Generation,
        current_time: f64,
        duration: Option<f64>,
    },
    /// Enough of the source is buffered to start playing.
    DataReady { generation: Generation },
    /// The source played to its end.
    Ended { generation: Generation },
    /// The source could not be opened or decoded.
    LoadFailed { generation: Generation, reason: String },
}

impl MediaEvent {
    pub fn generation(&self) -> Generation {
        match self {
            MediaEvent::MetadataLoaded { generation, .. }
            | MediaEvent::TimeUpdated { generation, .. }
            | MediaEvent::DataReady { generation }
            | MediaEvent::Ended { generation }
            | MediaEvent::LoadFailed { generation, .. } => *generation,
        }
    }
}

/// Messages from the [`AudioDevice`](super::AudioDevice) handle to its thread.
#[derive(Debug)]
pub enum DeviceCmd {
    Load { generation: Generation, source: String },
    Play,
    Pause,
    /// Seek to an absolute position, in seconds.
    Seek(f64),
    SetVolume(f64),
    /// Quit the device thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no audio output device: {0}")]
    NoOutput(String),
    #[error("unsupported source {0:?}: only local files can be played")]
    UnsupportedSource(String),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}
