use std::path::Path;

use tracing::{info, warn};

use crate::config;
use crate::library::{self, CatalogError, Playlist};
use crate::media::MediaTimeline;
use crate::player::PlaybackController;

/// Settings from the config file and environment. Anything unusable falls back
/// to the defaults and comes back as a message for the caller to report.
pub fn load_settings() -> (config::Settings, Option<String>) {
    let loaded = config::Settings::load()
        .map_err(|e| format!("config could not be read ({e})"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("config rejected ({msg})")),
        });
    match loaded {
        Ok(s) => (s, None),
        Err(problem) => (config::Settings::default(), Some(problem)),
    }
}

/// Read the playlist from a catalog file or a music directory.
pub fn load_playlist(
    source: &Path,
    settings: &config::LibrarySettings,
) -> Result<Playlist, CatalogError> {
    let playlist = library::load_playlist(source, settings)?;
    info!(source = %source.display(), tracks = playlist.len(), "playlist loaded");
    Ok(playlist)
}

/// Build the controller with the configured playback defaults and load the first track.
pub fn build_controller<M: MediaTimeline>(
    playlist: Playlist,
    timeline: M,
    playback: &config::PlaybackSettings,
) -> PlaybackController<M> {
    let mut player = PlaybackController::new(playlist, timeline)
        .with_restart_threshold(playback.restart_threshold_secs);
    if let Err(e) = player.set_volume(playback.initial_volume) {
        warn!(error = %e, "ignoring configured initial volume");
    }
    player.open();
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{EnvGuard, env_lock};
    use crate::library::{Track, TrackId};
    use crate::media::Generation;
    use crate::media::testing::{Call, RecordingTimeline};
    use crate::player::PlayerPhase;

    fn playlist() -> Playlist {
        Playlist::new(vec![Track {
            id: TrackId::from("a"),
            name: "A".into(),
            artist: "Band".into(),
            cover: String::new(),
            audio: "/music/a.mp3".into(),
            color: ["#000000".into(), "#ffffff".into()],
        }])
        .unwrap()
    }

    #[test]
    fn controller_starts_loading_with_configured_volume() {
        let playback = config::PlaybackSettings {
            restart_threshold_secs: 1.0,
            initial_volume: 0.4,
        };
        let player = build_controller(playlist(), RecordingTimeline::default(), &playback);

        assert_eq!(player.phase(), PlayerPhase::MetadataLoading);
        assert_eq!(player.state().volume, 0.4);
        assert!(!player.state().is_playing);
        assert_eq!(
            player.timeline().calls,
            vec![
                Call::Volume(0.4),
                Call::Load(Generation::new(1), "/music/a.mp3".into())
            ]
        );
    }

    #[test]
    fn rejected_config_falls_back_to_defaults() {
        let _lock = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[playback]\ninitial_volume = 2.0\n").unwrap();
        let _g = EnvGuard::set("PLAYDECK_CONFIG_PATH", path.to_str().unwrap());

        let (settings, problem) = load_settings();
        assert_eq!(settings.playback.initial_volume, 1.0);
        let problem = problem.unwrap();
        assert!(problem.starts_with("config rejected"), "{problem}");
        assert!(problem.contains("initial_volume"));

        std::fs::write(&path, "[playback]\ninitial_volume = 0.5\n").unwrap();
        let (settings, problem) = load_settings();
        assert_eq!(settings.playback.initial_volume, 0.5);
        assert!(problem.is_none());
    }

    #[test]
    fn missing_source_is_an_error() {
        let err = load_playlist(
            Path::new("/definitely/not/here.toml"),
            &config::LibrarySettings::default(),
        );
        assert!(matches!(err, Err(CatalogError::Io { .. })));
    }
}
