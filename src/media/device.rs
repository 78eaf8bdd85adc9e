use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;

use super::thread::spawn_device_thread;
use super::types::{DeviceCmd, Generation, MediaEvent, MediaTimeline};

/// `MediaTimeline` backed by a rodio output running on its own thread.
///
/// Commands are queued to the thread; its events come back on the receiver
/// returned by [`AudioDevice::new`].
pub struct AudioDevice {
    tx: Sender<DeviceCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioDevice {
    pub fn new(audio_settings: AudioSettings) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<DeviceCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();

        let handle = spawn_device_thread(rx, event_tx, audio_settings);

        let device = Self {
            tx,
            join: Mutex::new(Some(handle)),
        };
        (device, event_rx)
    }

    fn send(&self, cmd: DeviceCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "media device thread is gone");
        }
    }

    /// Fade out, stop the thread and wait for it.
    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(DeviceCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaTimeline for AudioDevice {
    fn load(&mut self, generation: Generation, source: &str) {
        self.send(DeviceCmd::Load {
            generation,
            source: source.to_string(),
        });
    }

    fn play(&mut self) {
        self.send(DeviceCmd::Play);
    }

    fn pause(&mut self) {
        self.send(DeviceCmd::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.send(DeviceCmd::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.send(DeviceCmd::SetVolume(volume));
    }
}
