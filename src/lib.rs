//! Single-track audio player for the terminal.
//!
//! [`player::PlaybackController`] owns the playback state machine and drives a
//! [`media::MediaTimeline`]; [`media::AudioDevice`] is the rodio-backed timeline
//! the binary uses.

pub mod app;
pub mod config;
pub mod library;
pub mod logging;
pub mod media;
pub mod player;
pub mod runtime;
pub mod ui;
