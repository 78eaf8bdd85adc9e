//! Test double for [`MediaTimeline`] that records every command.

use super::types::{Generation, MediaTimeline};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(Generation, String),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingTimeline {
    pub(crate) calls: Vec<Call>,
}

impl MediaTimeline for RecordingTimeline {
    fn load(&mut self, generation: Generation, source: &str) {
        self.calls.push(Call::Load(generation, source.to_string()));
    }
    fn play(&mut self) {
        self.calls.push(Call::Play);
    }
    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }
    fn set_current_time(&mut self, seconds: f64) {
        self.calls.push(Call::Seek(seconds));
    }
    fn set_volume(&mut self, volume: f64) {
        self.calls.push(Call::Volume(volume));
    }
}
