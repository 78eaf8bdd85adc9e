//! Front-end model types: `App` and the `Action`s key presses map to.
//!
//! Playback itself lives in the controller; `App` only holds what the
//! terminal front-end needs on top of it (library panel and its cursor).

use crate::config::UiSettings;

/// User intents produced by the key map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePlayPause,
    Next,
    Prev,
    /// Scrub by a signed number of seconds.
    Scrub(i64),
    VolumeUp,
    VolumeDown,
    ToggleVolumeControl,
    ToggleLibrary,
    CursorDown,
    CursorUp,
    /// Play the track under the library cursor.
    SelectUnderCursor,
}

/// The main front-end model.
pub struct App {
    pub header_text: String,
    pub library_open: bool,
    /// Library row under the cursor.
    pub cursor: usize,
    track_count: usize,
}

impl App {
    /// Create a new `App` for a playlist of `track_count` entries.
    pub fn new(track_count: usize, ui: &UiSettings) -> Self {
        Self {
            header_text: ui.header_text.clone(),
            library_open: ui.show_library,
            cursor: 0,
            track_count,
        }
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    /// Open or close the library; opening puts the cursor on `current`.
    pub fn toggle_library(&mut self, current: usize) {
        self.library_open = !self.library_open;
        if self.library_open {
            self.set_cursor(current);
        }
    }

    pub fn set_cursor(&mut self, idx: usize) {
        self.cursor = idx.min(self.track_count.saturating_sub(1));
    }

    /// Move the cursor down, wrapping to the top.
    pub fn cursor_down(&mut self) {
        if self.track_count > 0 {
            self.cursor = (self.cursor + 1) % self.track_count;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn cursor_up(&mut self) {
        if self.track_count > 0 {
            self.cursor = match self.cursor {
                0 => self.track_count - 1,
                c => c - 1,
            };
        }
    }

    /// Visible window `[start, end)` of `height` rows keeping the cursor centered when possible.
    pub fn library_window(&self, height: usize) -> (usize, usize) {
        let total = self.track_count;
        if total <= height || height == 0 {
            return (0, total);
        }
        let half = height / 2;
        let mut start = self.cursor.saturating_sub(half);
        if start + height > total {
            start = total - height;
        }
        (start, start + height)
    }
}
