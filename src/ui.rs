//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Browse, Focus, InputMode};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::lyrics::{Lyrics, LyricsState, SyncedLyricLine, active_line, scroll_target};
use crate::playlist::{QueuedTrack, RepeatMode};
use crate::progress::{Sample, format_time, is_muted};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("a".to_string(), "add to queue".to_string());
    map.insert("A".to_string(), "queue album".to_string());
    map.insert("v".to_string(), "tracks/albums/artists".to_string());
    map.insert("esc".to_string(), "close album".to_string());
    map.insert("c".to_string(), "cover url".to_string());
    map.insert("X".to_string(), "log out".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "back/next".to_string());
    // H/L is filled dynamically from config.
    map.insert("+/-".to_string(), "volume".to_string());
    map.insert("/".to_string(), "search".to_string());
    map.insert("tab".to_string(), "lyrics".to_string());
    map.insert("f".to_string(), "love".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("r".to_string(), "repeat".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Everything about playback the views need for one frame.
pub struct PlayerView<'a> {
    pub track: Option<&'a QueuedTrack>,
    /// `(current index, queue length)`.
    pub queue_position: (Option<usize>, usize),
    pub sample: Sample,
    pub playing: bool,
    pub volume: f32,
    pub repeat: RepeatMode,
    pub shuffle: bool,
    pub lyrics: &'a LyricsState,
    pub logged_in: bool,
}

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "enter", "a", "A", "v", "esc", "space/p", "h/l", "H/L", "+/-", "/", "tab", "f", "s", "r",
        "c", "X", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the player-bar time text (elapsed/total/remaining) per `UiSettings`.
fn time_text(sample: Sample, ui: &UiSettings) -> Option<String> {
    if ui.time_fields.is_empty() {
        return None;
    }

    let parts: Vec<String> = ui
        .time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_time(sample.position),
            TimeField::Total => format_time(sample.duration),
            TimeField::Remaining => {
                format!("-{}", format_time((sample.duration - sample.position).max(0.0)))
            }
        })
        .collect();

    Some(parts.join(&ui.time_separator))
}

fn track_text(track: &QueuedTrack) -> String {
    [track.title.as_str(), track.artist.as_str(), track.album.as_str()]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

fn padded_block(title: &str) -> Block<'_> {
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

/// Render the entire UI into the provided `frame`.
///
/// Records the progress and volume bar areas in `app.hit_areas` for
/// pointer handling, and applies lyric auto-scroll.
pub fn draw(
    frame: &mut Frame,
    app: &mut App,
    player: &PlayerView,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" astral ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_status(frame, app, player, chunks[1]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[2]);
    draw_results(frame, app, main[0]);
    draw_lyrics(frame, app, player, main[1]);

    draw_player_bar(frame, app, player, ui_settings, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_status(frame: &mut Frame, app: &App, player: &PlayerView, area: Rect) {
    let mut parts: Vec<String> = Vec::new();

    parts.push(if player.logged_in {
        "Session: OK".to_string()
    } else {
        "Session: logged out".to_string()
    });

    match player.queue_position {
        (Some(i), len) => parts.push(format!("Queue: {}/{}", i + 1, len)),
        (None, 0) => parts.push("Queue: empty".to_string()),
        (None, len) => parts.push(format!("Queue: {len} (stopped)")),
    }

    parts.push(player.repeat.label().to_string());
    parts.push(if player.shuffle {
        "Shuffle: ON".to_string()
    } else {
        "Shuffle: OFF".to_string()
    });

    if app.searching {
        parts.push("Searching...".to_string());
    }
    if app.is_opening_album() {
        parts.push("Loading album...".to_string());
    }
    if let Some(status) = &app.status {
        parts.push(status.clone());
    }

    let status = Paragraph::new(parts.join(" • "))
        .block(padded_block(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.browse.label();
    let title = match (&app.input_mode, &app.shown_query, &app.album) {
        (InputMode::Search, _, _) => format!(" search: {}_ ", app.search_query),
        (InputMode::Normal, _, Some(album)) if app.browse == Browse::Album => {
            let year = album.year.as_deref().map(|y| format!(" ({y})")).unwrap_or_default();
            format!(" {} · {}{year} ", album.name, album.artist)
        }
        (InputMode::Normal, Some(q), _) if !q.is_empty() => format!(" {view}: {q} "),
        _ => format!(" {view} "),
    };
    let border_style = if app.focus == Focus::Results {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);

    let total = app.visible_len();
    if total == 0 {
        let hint = if app.searching {
            "Searching...".to_string()
        } else {
            format!("No {view}. Press / to search, v to switch lists.")
        };
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    // Center the selected item when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total - 1);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let query = app.shown_query.as_deref().unwrap_or("").trim();
    let visible_items: Vec<ListItem> = match (app.browse, &app.album) {
        (Browse::Tracks, _) => app.results[start..end]
            .iter()
            .map(|track| {
                let mut spans = vec![loved_marker(track.loved)];
                spans.extend(highlighted(&track.name, query));
                spans.push(detail(format!(
                    "  {} · {}  {} [{}]",
                    track.artist_names(),
                    track.album_name,
                    format_time(track.duration as f64),
                    track.format
                )));
                ListItem::new(Line::from(spans))
            })
            .collect(),
        (Browse::Albums, _) => app.albums[start..end]
            .iter()
            .map(|album| {
                let mut spans = vec![loved_marker(album.loved)];
                spans.extend(highlighted(&album.name, query));
                let year = album.year().map(|y| format!(" ({y})")).unwrap_or_default();
                let mut info = format!("  {}{year}  {} tracks", album.artist_names(), album.tracks.len());
                if !album.genres.is_empty() {
                    info.push_str(&format!(" · {}", album.genres.join(", ")));
                }
                spans.push(detail(info));
                ListItem::new(Line::from(spans))
            })
            .collect(),
        (Browse::Artists, _) => app.artists[start..end]
            .iter()
            .map(|artist| ListItem::new(Line::from(highlighted(&artist.name, query))))
            .collect(),
        (Browse::Album, Some(album)) => (start..end)
            .filter_map(|i| {
                let track = album.tracks.get(i)?;
                let length = album.lengths.get(i).copied().unwrap_or(0);
                Some(ListItem::new(Line::from(vec![
                    Span::raw(format!("{:>2}. {}", i + 1, track.title)),
                    detail(format!("  {}  {}", track.artist, format_time(length as f64))),
                ])))
            })
            .collect(),
        (Browse::Album, None) => Vec::new(),
    };

    let list = List::new(visible_items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, area, &mut state);
}

fn loved_marker(loved: bool) -> Span<'static> {
    Span::raw(if loved { "♥ " } else { "  " })
}

fn detail(text: String) -> Span<'static> {
    Span::styled(text, Style::default().dim())
}

/// `name` with the characters matching the query in bold.
fn highlighted(name: &str, query: &str) -> Vec<Span<'static>> {
    let mut pos_iter = App::match_positions(name, query).into_iter().peekable();
    name.chars()
        .enumerate()
        .map(|(ci, ch)| {
            if pos_iter.peek() == Some(&ci) {
                pos_iter.next();
                Span::styled(ch.to_string(), Style::default().bold())
            } else {
                Span::raw(ch.to_string())
            }
        })
        .collect()
}

fn draw_lyrics(frame: &mut Frame, app: &mut App, player: &PlayerView, area: Rect) {
    let border_style = if app.focus == Focus::Lyrics {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = match player.lyrics {
        LyricsState::Ready(lyrics) if lyrics.is_synced() => " lyrics · synced ",
        _ => " lyrics ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);
    let inner_height = block.inner(area).height as usize;

    match player.lyrics {
        LyricsState::Idle => frame.render_widget(placeholder("Nothing playing", block), area),
        LyricsState::Loading => {
            frame.render_widget(placeholder("Fetching lyrics...", block), area)
        }
        LyricsState::Ready(Lyrics::None) => {
            frame.render_widget(placeholder("No lyrics for this song!", block), area)
        }
        LyricsState::Ready(Lyrics::Unsynced(lines)) => {
            let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        LyricsState::Ready(Lyrics::Synced(lines)) => {
            let position_ms = (player.sample.position * 1000.0) as i64;
            let active = active_line(lines, position_ms);
            let row = app.lyrics_selected.or(active).unwrap_or(0);
            app.lyrics_scroll
                .update(scroll_target(row, 1, inner_height));
            let offset = app.lyrics_scroll.current();

            let text = synced_lines(lines, position_ms, active, app.lyrics_selected);
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block)
                .scroll((offset.min(u16::MAX as usize) as u16, 0));
            frame.render_widget(paragraph, area);
        }
    }
}

fn placeholder<'a>(text: &str, block: Block<'a>) -> Paragraph<'a> {
    Paragraph::new(format!("\n{text}"))
        .alignment(Alignment::Center)
        .block(block)
}

fn synced_lines(
    lines: &[SyncedLyricLine],
    position_ms: i64,
    active: Option<usize>,
    selected: Option<usize>,
) -> Vec<Line<'_>> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let mut style = if Some(idx) == active {
                Style::default().fg(Color::Yellow).bold()
            } else if (line.start_time_ms as i64) <= position_ms {
                Style::default().dim()
            } else {
                Style::default()
            };
            if Some(idx) == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::styled(line.line.as_str(), style)
        })
        .collect()
}

fn draw_player_bar(
    frame: &mut Frame,
    app: &mut App,
    player: &PlayerView,
    ui_settings: &UiSettings,
    area: Rect,
) {
    let block = padded_block(" player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    // Drag position wins over the live position while scrubbing.
    let ratio = app.scrubber.displayed(player.sample.progress).clamp(0.0, 1.0);
    frame.render_widget(
        Paragraph::new(bar_line(ratio, rows[0].width, Color::Cyan)),
        rows[0],
    );
    app.hit_areas.progress = Some(rows[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(22)])
        .split(rows[1]);

    let state = match (player.track, player.playing) {
        (None, _) => "■",
        (Some(_), true) => "▶",
        (Some(_), false) => "⏸",
    };
    let mut now_playing = match player.track {
        Some(track) => format!("{state} {}", track_text(track)),
        None => format!("{state} Stopped"),
    };
    if player.track.is_some() {
        if let Some(time) = time_text(
            Sample {
                position: if app.scrubber.is_dragging() {
                    ratio * player.sample.duration
                } else {
                    player.sample.position
                },
                ..player.sample
            },
            ui_settings,
        ) {
            now_playing.push_str(&format!(" [{time}]"));
        }
    }
    frame.render_widget(Paragraph::new(now_playing), bottom[0]);

    let volume_parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(bottom[1]);
    let volume_label = if is_muted(player.volume) {
        "mute".to_string()
    } else {
        format!("{:>3}%", (player.volume * 100.0).round() as u32)
    };
    frame.render_widget(Paragraph::new(volume_label), volume_parts[0]);
    let volume_ratio = f64::from(player.volume).clamp(0.0, 1.0);
    frame.render_widget(
        Paragraph::new(bar_line(volume_ratio, volume_parts[1].width, Color::Green)),
        volume_parts[1],
    );
    app.hit_areas.volume = Some(volume_parts[1]);
}

/// A one-row bar whose columns map 1:1 onto pointer positions.
fn bar_line(ratio: f64, width: u16, color: Color) -> Line<'static> {
    let width = width as usize;
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(color)),
        Span::styled("─".repeat(width - filled), Style::default().dim()),
    ])
}
