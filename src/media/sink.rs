//! Helpers for turning a source reference into a `rodio` sink.
//!
//! `create_sink_at` opens and decodes a file and prepares a paused `Sink`
//! at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::DeviceError;

/// Map a source reference to a local path. Only plain paths and `file://`
/// URLs are playable.
pub(crate) fn resolve_source(source: &str) -> Result<PathBuf, DeviceError> {
    let source = source.trim();
    let path = match source.strip_prefix("file://") {
        Some(rest) => rest,
        None if source.contains("://") || source.is_empty() => {
            return Err(DeviceError::UnsupportedSource(source.to_string()));
        }
        None => source,
    };
    Ok(PathBuf::from(path))
}

/// Best-effort track length: tag properties first, then the decoder's own estimate.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    if let Ok(tagged) = lofty::read_from_path(path) {
        let d = tagged.properties().duration();
        if !d.is_zero() {
            return Some(d);
        }
    }
    let file = File::open(path).ok()?;
    Decoder::new(BufReader::new(file)).ok()?.total_duration()
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, DeviceError> {
    let file = File::open(path).map_err(|source| DeviceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| DeviceError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
