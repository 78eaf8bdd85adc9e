use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, trace, warn};

use crate::config::AudioSettings;

use super::sink::{create_sink_at, probe_duration, resolve_source};
use super::types::{DeviceCmd, DeviceError, Generation, MediaEvent};

/// Everything the device thread owns between commands.
struct Device {
    stream: Result<OutputStream, String>,
    events: Sender<MediaEvent>,
    sink: Option<Sink>,
    path: Option<std::path::PathBuf>,
    generation: Generation,
    paused: bool,
    ended: bool,
    /// Position the current sink was created at; `Sink::get_pos` counts from here.
    offset: Duration,
    duration: Option<Duration>,
    volume: f32,
}

impl Device {
    fn open(events: Sender<MediaEvent>) -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut s) => {
                // rodio logs to stderr when OutputStream is dropped; noisy under a TUI.
                s.log_on_drop(false);
                Ok(s)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device");
                Err(e.to_string())
            }
        };

        Self {
            stream,
            events,
            sink: None,
            path: None,
            generation: Generation::default(),
            paused: true,
            ended: false,
            offset: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }

    fn emit(&self, event: MediaEvent) {
        if self.events.send(event).is_err() {
            trace!("media event receiver dropped");
        }
    }

    fn position(&self) -> Duration {
        self.offset + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    fn load(&mut self, generation: Generation, source: &str) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.generation = generation;
        self.path = None;
        self.paused = true;
        self.ended = false;
        self.offset = Duration::ZERO;
        self.duration = None;

        match self.prepare(source) {
            Ok(()) => {
                debug!(%generation, source, "source loaded");
                self.emit(MediaEvent::DataReady { generation });
            }
            Err(e) => {
                warn!(%generation, source, error = %e, "load failed");
                self.emit(MediaEvent::LoadFailed {
                    generation,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn prepare(&mut self, source: &str) -> Result<(), DeviceError> {
        let path = resolve_source(source)?;
        if !path.is_file() {
            return Err(DeviceError::Open {
                path,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let stream = self
            .stream
            .as_ref()
            .map_err(|e| DeviceError::NoOutput(e.clone()))?;

        self.duration = probe_duration(&path);
        self.emit(MediaEvent::MetadataLoaded {
            generation: self.generation,
            duration: self.duration_secs().unwrap_or(0.0),
        });

        let sink = create_sink_at(stream, &path, Duration::ZERO, self.volume)?;
        self.sink = Some(sink);
        self.path = Some(path);
        Ok(())
    }

    /// Rebuild the sink at `at`, keeping the play/pause state.
    fn rebuild_at(&mut self, at: Duration) {
        let (Some(path), Ok(stream)) = (self.path.as_ref(), self.stream.as_ref()) else {
            return;
        };
        match create_sink_at(stream, path, at, self.volume) {
            Ok(new_sink) => {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                if !self.paused {
                    new_sink.play();
                }
                self.sink = Some(new_sink);
                self.offset = at;
                self.ended = false;
            }
            Err(e) => warn!(error = %e, "failed to reopen source for seek"),
        }
    }

    fn play(&mut self) {
        if self.sink.is_none() {
            return;
        }
        if self.ended {
            // Playing a finished source starts it over.
            self.rebuild_at(Duration::ZERO);
        }
        self.paused = false;
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.paused = true;
    }

    fn seek(&mut self, seconds: f64) {
        if self.sink.is_none() {
            return;
        }
        match seek_target(seconds, self.duration) {
            Some(target) => self.rebuild_at(target),
            None => warn!(seconds, "seek target out of range"),
        }
        // Reported even when the seek was refused so the controller drops its guess.
        self.emit(MediaEvent::TimeUpdated {
            generation: self.generation,
            current_time: self.position().as_secs_f64(),
            duration: self.duration_secs(),
        });
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0) as f32;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    /// Periodic report: elapsed time while playing, `Ended` once when drained.
    fn tick(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if self.paused || self.ended {
            return;
        }
        if sink.empty() {
            self.ended = true;
            self.paused = true;
            debug!(generation = %self.generation, "source ended");
            self.emit(MediaEvent::Ended {
                generation: self.generation,
            });
        } else {
            self.emit(MediaEvent::TimeUpdated {
                generation: self.generation,
                current_time: self.position().as_secs_f64(),
                duration: self.duration_secs(),
            });
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || self.paused {
            sink.stop();
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.stop();
    }
}

/// Playhead position for a seek request, clamped to the known duration.
/// `None` when the request cannot be represented and there is no duration to clamp to.
pub(super) fn seek_target(seconds: f64, duration: Option<Duration>) -> Option<Duration> {
    match (Duration::try_from_secs_f64(seconds.max(0.0)), duration) {
        (Ok(target), Some(d)) => Some(target.min(d)),
        (Ok(target), None) => Some(target),
        (Err(_), Some(d)) => Some(d),
        (Err(_), None) => None,
    }
}

pub(super) fn spawn_device_thread(
    rx: Receiver<DeviceCmd>,
    events: Sender<MediaEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut device = Device::open(events);
        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    DeviceCmd::Load { generation, source } => device.load(generation, &source),
                    DeviceCmd::Play => device.play(),
                    DeviceCmd::Pause => device.pause(),
                    DeviceCmd::Seek(seconds) => device.seek(seconds),
                    DeviceCmd::SetVolume(volume) => device.set_volume(volume),
                    DeviceCmd::Quit { fade_out_ms } => {
                        device.fade_out(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // Commands can arrive faster than the tick; don't let them starve it.
            if last_tick.elapsed() >= tick {
                device.tick();
                last_tick = Instant::now();
            }
        }
        debug!("media device thread stopped");
    })
}
