//! UI rendering for the terminal player.
//!
//! This module draws the [`App`] view model with `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::{PlayerSettings, UiSettings};
use crate::player::{Transport, format_time};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space", "play/pause"),
    ("n/p", "next/prev"),
    ("m", "mode"),
    ("+/-", "volume"),
    ("0", "mute"),
    ("f", "favorite"),
    ("/", "filter"),
    ("v", "favorites view"),
    ("?", "help"),
    ("q", "quit"),
];

fn controls_text(seek_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS.iter().map(|(k, v)| format!("[{k}] {v}")).collect();
    parts.insert(4, format!("[H/L] seek -/+{seek_seconds}s"));
    parts.join(" | ")
}

/// One-line transport summary: state, track, time, mode and volume.
pub fn now_playing_text(app: &App) -> String {
    let engine = &app.engine;
    let mut parts: Vec<String> = Vec::new();

    let state = match engine.transport() {
        Transport::Idle => "Stopped",
        Transport::Paused => "Paused",
        Transport::Playing => "Playing",
    };
    parts.push(state.to_string());

    if let Some(track) = engine.current_track() {
        let heart = if app.current_is_favorite() { " ♥" } else { "" };
        parts.push(format!("{}{heart}", track.display()));
        let st = engine.state();
        parts.push(format!("{} / {}", format_time(st.progress), format_time(st.duration)));
    }

    parts.push(format!("Mode: {}", engine.playback_mode()));
    let volume = (engine.volume() * 100.0).round() as u32;
    if volume == 0 {
        parts.push("Vol: muted".to_string());
    } else {
        parts.push(format!("Vol: {volume}%"));
    }
    parts.join(" • ")
}

fn status_text(app: &App) -> String {
    let mut parts = vec![now_playing_text(app)];

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        parts.push(format!("FILTER: {q}"));
    }
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }
    parts.join(" • ")
}

/// Upper-case the characters the filter matched so they stand out.
fn highlight_matches(title: &str, query: &str) -> String {
    let Some(positions) = App::fuzzy_match_positions(title, query) else {
        return title.to_string();
    };
    let mut rendered = String::with_capacity(title.len());
    let mut pos_iter = positions.into_iter().peekable();
    for (ci, ch) in title.chars().enumerate() {
        if pos_iter.peek() == Some(&ci) {
            rendered.extend(ch.to_uppercase());
            pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui: &UiSettings, player: &PlayerSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" musicflow ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Only build items for the visible window, centred on the cursor.
    let visible = app.visible_tracks();
    let total = visible.len();
    let list_height = chunks[2].height.saturating_sub(2) as usize;
    let sel = app.selected.min(total.saturating_sub(1));
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let start = sel.saturating_sub(half).min(total - list_height);
        (start, start + list_height)
    };

    let query = app.filter_query.trim();
    let current_id = app.engine.current_track().map(|t| t.id.as_str());
    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .map(|track| {
            let mut line = if query.is_empty() {
                track.display()
            } else {
                highlight_matches(&track.display(), query)
            };
            if track.is_favorite {
                line.push_str(" ♥");
            }
            let item = ListItem::new(format!("{line}  {}", format_time(f64::from(track.duration))));
            if Some(track.id.as_str()) == current_id {
                item.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();

    let list_title = format!(" {} ({total}) ", app.view.title());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel - start));
    }
    frame.render_stateful_widget(list, chunks[2], &mut state);

    if app.show_help {
        let popup = centered_rect_sized(60, 12, chunks[2]);
        frame.render_widget(Clear, popup);
        let track = app.selected_track();
        let text = match track {
            Some(t) => format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPlays: {}\nSource: {}",
                t.title,
                t.artist,
                t.album.as_deref().unwrap_or("-"),
                format_time(f64::from(t.duration)),
                t.play_count,
                t.file_url
            ),
            None => "No track selected".to_string(),
        };
        let details = Paragraph::new(text)
            .block(left_padded(" details (? closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(details, popup);
    }

    let footer = Paragraph::new(controls_text(player.seek_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
