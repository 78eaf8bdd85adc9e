//! The playback state machine.
//!
//! `PlaybackController` is the only writer of [`PlaybackState`]. Commands
//! update intent and forward to the [`MediaTimeline`]; the device answers
//! later through [`PlaybackController::handle_event`], which drops anything
//! tagged with a superseded load generation.

use tracing::{debug, warn};

use crate::library::{Playlist, Track, TrackId};
use crate::media::{Generation, MediaEvent, MediaTimeline};

use super::error::{PlayerError, Result};
use super::format::finite_or_zero;
use super::types::{PlaybackState, PlayerPhase, SkipDirection};

/// Elapsed seconds from which "previous" restarts the current track.
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

pub struct PlaybackController<M> {
    playlist: Playlist,
    timeline: M,
    state: PlaybackState,
    current_index: usize,
    phase: PlayerPhase,
    generation: Generation,
    restart_threshold: f64,
}

impl<M: MediaTimeline> PlaybackController<M> {
    /// Create a controller positioned on the first track, paused, at full volume.
    ///
    /// Nothing is sent to the device until [`open`](Self::open) or the first command.
    pub fn new(playlist: Playlist, timeline: M) -> Self {
        let state = PlaybackState::new(playlist.first().id.clone());
        Self {
            playlist,
            timeline,
            state,
            current_index: 0,
            phase: PlayerPhase::Idle,
            generation: Generation::default(),
            restart_threshold: RESTART_THRESHOLD_SECS,
        }
    }

    /// Validate `tracks` into a playlist and build a controller over it.
    pub fn from_tracks(tracks: Vec<Track>, timeline: M) -> Result<Self> {
        Ok(Self::new(Playlist::new(tracks)?, timeline))
    }

    pub fn with_restart_threshold(mut self, seconds: f64) -> Self {
        self.restart_threshold = seconds.max(0.0);
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> &Track {
        &self.playlist.tracks()[self.current_index]
    }

    pub fn timeline(&self) -> &M {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut M {
        &mut self.timeline
    }

    /// Load the current track on the device if nothing was loaded yet.
    pub fn open(&mut self) {
        if self.phase == PlayerPhase::Idle {
            self.load_current();
        }
    }

    /// Flip playback intent and tell the device.
    ///
    /// While a load is pending only the intent changes phase-wise; the
    /// transition into `Playing` happens once the device reports data ready.
    pub fn toggle_play_pause(&mut self) {
        if self.phase == PlayerPhase::Idle || self.state.load_error.is_some() {
            // Nothing playable on the device: (re)load before starting.
            self.state.load_error = None;
            self.load_current();
        }

        if self.state.is_playing {
            self.state.is_playing = false;
            self.state.is_playing_indicator_active = false;
            self.timeline.pause();
            if self.phase == PlayerPhase::Playing {
                self.phase = PlayerPhase::Paused;
            }
        } else {
            self.state.is_playing = true;
            self.state.is_playing_indicator_active = true;
            self.timeline.play();
            if matches!(self.phase, PlayerPhase::Ready | PlayerPhase::Paused) {
                self.phase = PlayerPhase::Playing;
            }
        }
        debug!(playing = self.state.is_playing, phase = ?self.phase, "toggle play/pause");
    }

    /// Make `track` current. Playback intent is left untouched.
    pub fn select_track(&mut self, track: &Track) -> Result<()> {
        self.select_track_id(&track.id)
    }

    pub fn select_track_id(&mut self, id: &TrackId) -> Result<()> {
        let index = self
            .playlist
            .position(id)
            .ok_or_else(|| PlayerError::UnknownTrack(id.clone()))?;
        self.change_track(index);
        Ok(())
    }

    /// Move through the playlist with wraparound.
    ///
    /// Going backward after the restart threshold rewinds the current track instead.
    pub fn skip(&mut self, direction: SkipDirection) {
        match direction {
            SkipDirection::Forward => {
                let next = self.playlist.next_index(self.current_index);
                self.change_track(next);
            }
            SkipDirection::Backward => {
                if self.state.current_time >= self.restart_threshold {
                    debug!(at = self.state.current_time, "restarting current track");
                    self.seek_to(0.0);
                } else {
                    let prev = self.playlist.prev_index(self.current_index);
                    self.change_track(prev);
                }
            }
        }
    }

    /// User scrub. The new position is visible immediately; the next device
    /// tick overwrites it.
    pub fn seek(&mut self, target: f64) -> Result<()> {
        if !target.is_finite() {
            return Err(PlayerError::InvalidSeek(target));
        }
        self.seek_to(target);
        Ok(())
    }

    /// Scrub relative to the current position.
    pub fn seek_by(&mut self, delta: f64) -> Result<()> {
        self.seek(self.state.current_time + delta)
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        if !volume.is_finite() {
            return Err(PlayerError::InvalidVolume(volume));
        }
        let volume = volume.clamp(0.0, 1.0);
        self.timeline.set_volume(volume);
        self.state.volume = volume;
        Ok(())
    }

    pub fn adjust_volume(&mut self, delta: f64) -> Result<()> {
        self.set_volume(self.state.volume + delta)
    }

    pub fn toggle_volume_control(&mut self) {
        self.state.volume_control_expanded = !self.state.volume_control_expanded;
    }

    /// Feed one device event. Returns `false` when the event belonged to a
    /// superseded load and was ignored.
    pub fn handle_event(&mut self, event: MediaEvent) -> bool {
        if self.phase == PlayerPhase::Idle || event.generation() != self.generation {
            debug!(
                event_generation = %event.generation(),
                current = %self.generation,
                "dropping stale media event"
            );
            return false;
        }

        match event {
            MediaEvent::MetadataLoaded { duration, .. } => self.on_metadata_loaded(duration),
            MediaEvent::TimeUpdated {
                current_time,
                duration,
                ..
            } => self.on_time_updated(current_time, duration),
            MediaEvent::DataReady { .. } => self.on_data_ready(),
            MediaEvent::Ended { .. } => self.on_track_ended(),
            MediaEvent::LoadFailed { reason, .. } => self.on_load_failed(reason),
        }
        true
    }

    /// Duration became known. Same bookkeeping as a time update.
    pub fn on_metadata_loaded(&mut self, duration: f64) {
        self.on_time_updated(self.state.current_time, Some(duration));
        if self.phase == PlayerPhase::MetadataLoading {
            self.phase = PlayerPhase::Ready;
        }
    }

    pub fn on_time_updated(&mut self, current_time: f64, duration: Option<f64>) {
        let duration = duration.map(finite_or_zero).unwrap_or(0.0).max(0.0);
        let mut current = finite_or_zero(current_time).max(0.0);
        if duration > 0.0 {
            current = current.min(duration);
        }
        self.state.current_time = current;
        self.state.duration = duration;
    }

    /// New source is playable; resume if the session wants audio.
    pub fn on_data_ready(&mut self) {
        if self.phase == PlayerPhase::MetadataLoading {
            self.phase = PlayerPhase::Ready;
        }
        if self.state.is_playing {
            self.timeline.play();
            self.phase = PlayerPhase::Playing;
        }
    }

    /// Auto-advance: always forward, and keep playing if we were.
    pub fn on_track_ended(&mut self) {
        let resume = self.state.is_playing;
        let next = self.playlist.next_index(self.current_index);
        self.change_track(next);
        if resume {
            self.timeline.play();
        }
    }

    pub fn on_load_failed(&mut self, reason: String) {
        warn!(track = %self.state.current_track_id, %reason, "media failed to load");
        self.state.is_playing = false;
        self.state.is_playing_indicator_active = false;
        self.state.load_error = Some(reason);
        self.phase = PlayerPhase::Paused;
    }

    fn change_track(&mut self, index: usize) {
        let id = self.playlist.tracks()[index].id.clone();
        debug!(from = %self.state.current_track_id, to = %id, resume = self.state.is_playing, "track change");

        self.current_index = index;
        self.state.current_track_id = id;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.state.load_error = None;
        self.load_current();
    }

    fn load_current(&mut self) {
        self.generation = self.generation.next();
        let source = self.playlist.tracks()[self.current_index].audio.clone();
        self.timeline.load(self.generation, &source);
        self.phase = PlayerPhase::MetadataLoading;
    }

    /// No-op while nothing is loaded: the device has no playhead to move and
    /// would never report a correction.
    fn seek_to(&mut self, target: f64) {
        if self.phase == PlayerPhase::Idle || self.state.load_error.is_some() {
            debug!(seconds = target, "seek ignored without a loaded source");
            return;
        }
        let mut target = target.max(0.0);
        if self.state.duration > 0.0 {
            target = target.min(self.state.duration);
        }
        self.timeline.set_current_time(target);
        self.state.current_time = target;
    }
}
