//! UI rendering helpers for the terminal user interface.
//!
//! Everything is drawn from the controller's [`PlaybackState`] plus the
//! front-end [`App`]; nothing here mutates playback.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::ControlsSettings;
use crate::library::Track;
use crate::media::MediaTimeline;
use crate::player::{PlaybackController, PlaybackState, VolumeLevel};

const BAR_FILLED: &str = "█";
const BAR_EMPTY: &str = "─";

/// Render the controls help text, incorporating scrub seconds and volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    let step = (controls.volume_step * 100.0).round() as u32;
    [
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next song".to_string(),
        format!("[H/L] scrub -/+{}s", controls.scrub_seconds),
        format!("[-/+] volume -/+{step}%"),
        "[v] volume".to_string(),
        "[b] library".to_string(),
        "[j/k] up/down".to_string(),
        "[enter] play selected song".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Parse `#rrggbb` (leading `#` optional) into an RGB color.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Linear blend between two RGB colors, `t` in `[0, 1]`. Non-RGB inputs yield `from`.
fn blend(from: Color, to: Color, t: f64) -> Color {
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let t = t.clamp(0.0, 1.0);
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ => from,
    }
}

/// One span per cell: the elapsed part tinted along the track gradient, the rest dimmed.
fn gradient_spans(width: usize, percent: u8, colors: &[String; 2]) -> Vec<Span<'static>> {
    let start = parse_hex_color(&colors[0]).unwrap_or(Color::Reset);
    let end = parse_hex_color(&colors[1]).unwrap_or(start);
    let filled = (width * percent.min(100) as usize + 50) / 100;
    let denom = width.saturating_sub(1).max(1) as f64;

    (0..width)
        .map(|i| {
            if i < filled {
                Span::styled(BAR_FILLED, Style::default().fg(blend(start, end, i as f64 / denom)))
            } else {
                Span::styled(BAR_EMPTY, Style::default().fg(Color::DarkGray))
            }
        })
        .collect()
}

/// `elapsed ▕gradient▏ total`, sized to `width` columns.
fn time_bar_line(state: &PlaybackState, colors: &[String; 2], width: u16) -> Line<'static> {
    let elapsed = state.elapsed_label();
    let total = state.duration_label();
    // Two spaces plus the two edge glyphs around the bar.
    let chrome = elapsed.chars().count() + total.chars().count() + 4;
    let bar_width = (width as usize).saturating_sub(chrome);

    let mut spans = vec![Span::raw(elapsed), Span::raw(" ▕")];
    spans.extend(gradient_spans(bar_width, state.progress_percentage(), colors));
    spans.push(Span::raw("▏ "));
    spans.push(Span::raw(total));
    Line::from(spans)
}

fn playing_indicator(state: &PlaybackState) -> &'static str {
    if state.load_error.is_some() {
        "✗ unavailable"
    } else if state.is_playing_indicator_active {
        "♪ playing"
    } else {
        "⏸ paused"
    }
}

/// Lines of the now-playing box.
fn now_playing_lines(track: &Track, state: &PlaybackState) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(track.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::raw(playing_indicator(state)),
        ]),
        Line::from(track.artist.clone()),
    ];
    if !track.cover.trim().is_empty() {
        lines.push(Line::from(format!("Cover: {}", track.cover)).dim());
    }
    if let Some(err) = &state.load_error {
        lines.push(Line::from(format!("Error: {err}")).red());
    }
    lines
}

fn volume_text(state: &PlaybackState) -> String {
    let icon = match state.volume_level() {
        VolumeLevel::Muted => "🔇",
        VolumeLevel::Low => "🔉",
        VolumeLevel::High => "🔊",
    };
    format!("{icon} {}%", state.volume_percentage())
}

/// Render the entire UI into the provided `frame`.
pub fn draw<M: MediaTimeline>(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackController<M>,
    controls_settings: &ControlsSettings,
) {
    let state = player.state();
    let track = player.current_track();

    let volume_height = if state.volume_control_expanded { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(volume_height),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(app.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let now_playing = Paragraph::new(now_playing_lines(track, state))
        .block(
            Block::bordered()
                .padding(Padding::left(1))
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    let bar_block = Block::bordered().padding(Padding::horizontal(1));
    let bar_inner = bar_block.inner(chunks[2]);
    frame.render_widget(bar_block, chunks[2]);
    frame.render_widget(
        Paragraph::new(time_bar_line(state, &track.color, bar_inner.width)),
        bar_inner,
    );

    if state.volume_control_expanded {
        let volume = Paragraph::new(volume_text(state))
            .block(Block::bordered().padding(Padding::left(1)).title(" volume "));
        frame.render_widget(volume, chunks[3]);
    }

    if app.library_open {
        draw_library(frame, app, player, chunks[4]);
    }

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::left(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

fn draw_library<M: MediaTimeline>(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackController<M>,
    area: Rect,
) {
    // Only build items for the visible window.
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = app.library_window(height);
    let current = player.current_index();

    let items: Vec<ListItem> = player.playlist().tracks()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let text = format!("{} - {}", track.artist, track.name);
            if start + offset == current {
                ListItem::new(format!("♪ {text}"))
                    .style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {text}"))
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" library "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if end > start {
        list_state.select(Some(app.cursor - start));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiSettings;
    use crate::library::TrackId;
    use crate::media::testing::RecordingTimeline;
    use ratatui::{Terminal, backend::TestBackend};

    fn track(id: &str) -> Track {
        Track {
            id: TrackId::from(id),
            name: format!("Song {id}"),
            artist: "Band".into(),
            cover: format!("/covers/{id}.jpg"),
            audio: format!("/music/{id}.mp3"),
            color: ["#000000".into(), "#ffffff".into()],
        }
    }

    fn render(app: &App, player: &PlaybackController<RecordingTimeline>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| {
                draw(f, app, player, &ControlsSettings::default())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        assert_eq!(parse_hex_color("#205950"), Some(Color::Rgb(0x20, 0x59, 0x50)));
        assert_eq!(parse_hex_color("2ab3bf"), Some(Color::Rgb(0x2a, 0xb3, 0xbf)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn blend_hits_both_endpoints() {
        let a = Color::Rgb(0, 0, 0);
        let b = Color::Rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(blend(Color::Reset, b, 0.5), Color::Reset);
    }

    #[test]
    fn gradient_fills_proportionally() {
        let colors = ["#000000".to_string(), "#ffffff".to_string()];
        let spans = gradient_spans(10, 50, &colors);
        assert_eq!(spans.len(), 10);
        let filled = spans.iter().filter(|s| s.content == BAR_FILLED).count();
        assert_eq!(filled, 5);
        assert_eq!(spans[0].style.fg, Some(Color::Rgb(0, 0, 0)));

        let full = gradient_spans(10, 100, &colors);
        assert_eq!(full[9].style.fg, Some(Color::Rgb(255, 255, 255)));
        assert!(gradient_spans(0, 100, &colors).is_empty());
    }

    #[test]
    fn time_bar_fits_width() {
        let mut state = PlaybackState::new(TrackId::from("a"));
        state.current_time = 65.0;
        state.duration = 130.0;
        let colors = ["#000000".to_string(), "#ffffff".to_string()];
        let line = time_bar_line(&state, &colors, 40);
        assert_eq!(line.width(), 40);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("1:05 ▕"));
        assert!(text.ends_with("▏ 2:10"));
    }

    #[test]
    fn controls_text_mentions_configured_steps() {
        let text = controls_text(&ControlsSettings {
            scrub_seconds: 10,
            volume_step: 0.1,
        });
        assert!(text.contains("[H/L] scrub -/+10s"));
        assert!(text.contains("[-/+] volume -/+10%"));
    }

    #[test]
    fn volume_text_tracks_level() {
        let mut state = PlaybackState::new(TrackId::from("a"));
        assert_eq!(volume_text(&state), "🔊 100%");
        state.volume = 0.3;
        assert_eq!(volume_text(&state), "🔉 30%");
        state.volume = 0.0;
        assert_eq!(volume_text(&state), "🔇 0%");
    }

    #[test]
    fn draw_shows_now_playing_and_optional_panels() {
        let mut player =
            PlaybackController::from_tracks(vec![track("a"), track("b")], RecordingTimeline::default())
                .unwrap();
        let mut app = App::new(2, &UiSettings::default());

        let screen = render(&app, &player);
        assert!(screen.contains("Song a"));
        assert!(screen.contains("Cover: /covers/a.jpg"));
        assert!(screen.contains("paused"));
        assert!(!screen.contains("Band - Song b"));
        assert!(!screen.contains("100%"));

        player.toggle_volume_control();
        app.toggle_library(0);
        let screen = render(&app, &player);
        assert!(screen.contains("Band - Song b"));
        assert!(screen.contains("100%"));
    }

    #[test]
    fn draw_surfaces_load_errors() {
        let mut player =
            PlaybackController::from_tracks(vec![track("a")], RecordingTimeline::default()).unwrap();
        player.open();
        player.on_load_failed("no such file".into());
        let app = App::new(1, &UiSettings::default());

        let screen = render(&app, &player);
        assert!(screen.contains("unavailable"));
        assert!(screen.contains("Error: no such file"));
    }
}
