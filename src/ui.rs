//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads `App` and a `PlayerSnapshot`; it never talks to the controller.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Mode};
use crate::audio::TransportState;
use crate::config::{ControlsSettings, UiSettings};
use crate::controller::PlayerSnapshot;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating the configured seek step.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[r] random".to_string(),
        "[space] pause/resume".to_string(),
        "[←/→] prev/next".to_string(),
        format!("[↑/↓] volume ±{}%", controls.volume_step),
        format!("[1/2] seek +/-{}s", controls.seek_seconds),
        "[l] loop".to_string(),
        "[a] autoplay".to_string(),
        "[n] search".to_string(),
        "[z] bar".to_string(),
        "[d] details".to_string(),
        "[esc/q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn on_off(b: bool) -> &'static str {
    if b { "ON" } else { "OFF" }
}

/// Build the one-line status text shown under the header.
fn status_text(app: &App, snap: &PlayerSnapshot) -> String {
    let mut parts: Vec<String> = Vec::new();

    let song = snap
        .current_track()
        .map(|t| t.name.as_str())
        .unwrap_or("None");
    parts.push(format!("Song: {song}"));

    let state = match snap.transport {
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
        TransportState::Stopped => "Stopped",
    };
    parts.push(state.to_string());

    if snap.current_index.is_some() {
        parts.push(format!(
            "{} / {}",
            format_mmss(snap.position),
            format_mmss(snap.total)
        ));
    }

    parts.push(format!("Loop: {}", on_off(snap.loop_enabled)));
    parts.push(format!("Autoplay: {}", on_off(snap.autoplay_enabled)));
    parts.push(format!("Volume: {}%", snap.volume_percent));

    if let Some(src) = &app.source_label {
        parts.push(format!("Dir: {src}"));
    }

    if let Some(err) = &snap.last_error {
        parts.push(format!("Error: {err}"));
    }

    parts.join(" • ")
}

/// Text of the song-details popup.
fn details_text(snap: &PlayerSnapshot) -> String {
    let Some(track) = snap.current_track() else {
        return "No song is playing".to_string();
    };
    let duration = track
        .duration
        .or((!snap.total.is_zero()).then_some(snap.total))
        .map(format_mmss)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Name: {}\nTitle: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPath: {}",
        track.name,
        track.title.as_deref().unwrap_or("-"),
        track.artist.as_deref().unwrap_or("-"),
        track.album.as_deref().unwrap_or("-"),
        duration,
        track.path.display()
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
///
/// Prefers a 10x5 minimum, but never grows past `r` on tiny terminals.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width.saturating_sub(2)).max(10).min(r.width);
    let height = height.min(r.height.saturating_sub(2)).max(5).min(r.height);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Visible window `[start, end)` of `total` rows that keeps `selected` centered
/// when possible, plus the selected row's offset inside the window.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Render a windowed list of `rows`, highlighting `selected`.
fn render_list(frame: &mut Frame, area: Rect, title: &str, rows: &[String], selected: Option<usize>) {
    // Only build ListItems for the visible window.
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, sel_in_view) = visible_window(rows.len(), height, selected.unwrap_or(0));

    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|r| ListItem::new(r.as_str()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if selected.is_some() && !rows.is_empty() {
        state.select(Some(sel_in_view));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_picker(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<String> = app
        .picker_entries()
        .into_iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i + 1, e))
        .collect();
    render_list(
        frame,
        area,
        " choose a music folder (enter) ",
        &rows,
        Some(app.picker_selected),
    );
}

fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_sized(70, 14, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(popup);

    let input = Paragraph::new(format!("{}_", app.search_query)).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(LEFT_PAD)
            .title(" search (enter plays, esc cancels) "),
    );
    frame.render_widget(input, chunks[0]);

    let rows: Vec<String> = if app.search_results.is_empty() && !app.search_query.trim().is_empty()
    {
        vec!["No matching songs found.".to_string()]
    } else {
        app.search_results
            .iter()
            .enumerate()
            .map(|(i, (name, _))| format!("{}. {}", i + 1, name))
            .collect()
    };
    let selected = (!app.search_results.is_empty()).then_some(app.search_selected);
    render_list(frame, chunks[1], " matches ", &rows, selected);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    snap: &PlayerSnapshot,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let bar_height = if app.show_progress_bar { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(bar_height),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box; the advisory message rides along on its second line.
    let mut status = status_text(app, snap);
    if let Some(msg) = &app.message {
        status.push('\n');
        status.push_str(msg);
    }
    let status_par = Paragraph::new(status)
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    if app.show_progress_bar {
        let label = format!(
            "{} / {}",
            format_mmss(snap.position),
            format_mmss(snap.total)
        );
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" progress "))
            .ratio(snap.progress())
            .label(label);
        frame.render_widget(gauge, chunks[2]);
    }

    // Main area
    if app.mode == Mode::FolderPicker {
        draw_picker(frame, app, chunks[3]);
    } else {
        let rows: Vec<String> = snap
            .playlist
            .tracks()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        render_list(frame, chunks[3], " songs ", &rows, snap.current_index);

        if app.show_details {
            let popup_area = centered_rect_sized(72, 9, chunks[3]);
            frame.render_widget(Clear, popup_area);
            let details = Paragraph::new(details_text(snap))
                .block(
                    Block::default()
                        .padding(LEFT_PAD)
                        .borders(Borders::ALL)
                        .title(" song details (d closes) "),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(details, popup_area);
        }

        if app.mode == Mode::Search {
            draw_search(frame, app, chunks[3]);
        }
    }

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}
