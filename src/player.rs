//! Playback controller: playback intent, the current track pointer and the
//! time/volume readout, kept in step with an asynchronous media device.

mod controller;
mod error;
pub mod format;
mod types;

pub use controller::{PlaybackController, RESTART_THRESHOLD_SECS};
pub use error::{PlayerError, Result};
pub use format::{VolumeLevel, format_time};
pub use types::{PlaybackState, PlayerPhase, SkipDirection};
