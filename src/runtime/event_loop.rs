use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{Action, App};
use crate::config::{self, ControlsSettings};
use crate::media::{AudioDevice, MediaEvent, MediaTimeline};
use crate::player::{PlaybackController, SkipDirection};
use crate::ui;

/// Main terminal event loop: feeds device events to the controller, draws,
/// and handles input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<AudioDevice>,
    events: &Receiver<MediaEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        drain_events(player, events);

        terminal.draw(|f| ui::draw(f, app, player, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match action_for_key(key, &settings.controls) {
                    Some(Action::Quit) => {
                        player
                            .timeline()
                            .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                        return Ok(());
                    }
                    Some(action) => dispatch(action, app, player, &settings.controls),
                    None => {}
                }
            }
        }
    }
}

/// Feed every queued device event to the controller. A closed channel means the
/// device thread died; that is reported as a load failure so the UI shows it.
pub(crate) fn drain_events<M: MediaTimeline>(
    player: &mut PlaybackController<M>,
    events: &Receiver<MediaEvent>,
) {
    loop {
        match events.try_recv() {
            Ok(ev) => {
                player.handle_event(ev);
            }
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                if player.state().load_error.is_none() {
                    player.on_load_failed(DEVICE_GONE.to_string());
                }
                return;
            }
        }
    }
}

const DEVICE_GONE: &str = "audio device stopped";

/// Key map. Unbound keys yield `None`.
pub(crate) fn action_for_key(key: KeyEvent, controls: &ControlsSettings) -> Option<Action> {
    let scrub = controls.scrub_seconds.min(i64::MAX as u64) as i64;
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePlayPause,
        KeyCode::Char('l') => Action::Next,
        KeyCode::Char('h') => Action::Prev,
        KeyCode::Char('L') => Action::Scrub(scrub),
        KeyCode::Char('H') => Action::Scrub(-scrub),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::VolumeUp,
        KeyCode::Char('-') => Action::VolumeDown,
        KeyCode::Char('v') => Action::ToggleVolumeControl,
        KeyCode::Char('b') => Action::ToggleLibrary,
        KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
        KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
        KeyCode::Enter => Action::SelectUnderCursor,
        _ => return None,
    };
    Some(action)
}

/// Apply one user action. Library navigation only acts while the panel is open.
pub(crate) fn dispatch<M: MediaTimeline>(
    action: Action,
    app: &mut App,
    player: &mut PlaybackController<M>,
    controls: &ControlsSettings,
) {
    debug!(?action, "user action");
    match action {
        Action::Quit => {}
        Action::TogglePlayPause => player.toggle_play_pause(),
        Action::Next => player.skip(SkipDirection::Forward),
        Action::Prev => player.skip(SkipDirection::Backward),
        Action::Scrub(secs) => {
            if let Err(e) = player.seek_by(secs as f64) {
                warn!(error = %e, "scrub rejected");
            }
        }
        Action::VolumeUp | Action::VolumeDown => {
            let step = if action == Action::VolumeUp {
                controls.volume_step
            } else {
                -controls.volume_step
            };
            if let Err(e) = player.adjust_volume(step) {
                warn!(error = %e, "volume change rejected");
            }
        }
        Action::ToggleVolumeControl => player.toggle_volume_control(),
        Action::ToggleLibrary => app.toggle_library(player.current_index()),
        Action::CursorDown if app.library_open => app.cursor_down(),
        Action::CursorUp if app.library_open => app.cursor_up(),
        Action::SelectUnderCursor if app.library_open => {
            let Some(id) = player.playlist().get(app.cursor).map(|t| t.id.clone()) else {
                return;
            };
            if let Err(e) = player.select_track_id(&id) {
                warn!(error = %e, "selection rejected");
                return;
            }
            if !player.state().is_playing {
                player.toggle_play_pause();
            }
        }
        Action::CursorDown | Action::CursorUp | Action::SelectUnderCursor => {}
    }
}
