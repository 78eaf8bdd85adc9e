use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::logging;
use crate::media::AudioDevice;

mod event_loop;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = startup::load_settings();
    if let Some(problem) = &settings_problem {
        eprintln!("playdeck: {problem}; starting with default settings");
    }
    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("playdeck: logging disabled: {e}");
            None
        }
    };
    if let Some(problem) = settings_problem {
        warn!(%problem, "using default settings");
    }

    // A catalog file or a music directory; defaults to the working directory.
    let source = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let playlist = startup::load_playlist(&source, &settings.library)?;

    let (device, events) = AudioDevice::new(settings.audio.clone());
    let mut player = startup::build_controller(playlist, device, &settings.playback);
    let mut app = App::new(player.playlist().len(), &settings.ui);
    app.set_cursor(player.current_index());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutdown");
    run_result
}
