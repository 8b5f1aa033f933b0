use std::io::Stdout;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{info, warn};
use ratatui::layout::{Position, Rect};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Browse, Focus, InputMode};
use crate::backend::BackendClient;
use crate::config;
use crate::lyrics::{Lyrics, LyricsFetcher, active_line};
use crate::progress::{ProgressSampler, pointer_fraction};
use crate::runtime::jobs::Jobs;
use crate::runtime::startup::Controller;
use crate::ui::{self, PlayerView};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    pub sampler: ProgressSampler,
    pub lyrics: LyricsFetcher<BackendClient>,
    pub jobs: Jobs,
    client: Arc<BackendClient>,
    /// Index and id of the track the views were last prepared for.
    last_track: (Option<usize>, Option<String>),
}

impl EventLoopState {
    pub fn new(settings: &config::Settings, client: Arc<BackendClient>) -> Self {
        Self {
            lyrics: LyricsFetcher::new(Arc::clone(&client)),
            jobs: Jobs::new(Arc::clone(&client), settings.ui.search_page_size),
            client,
            sampler: ProgressSampler::new(settings.frame_interval()),
            last_track: (None, None),
        }
    }
}

/// Main terminal event loop: advances playback, collects background
/// results, draws and handles input. Returns `Ok(())` on quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    state: &mut EventLoopState,
) -> Result<()> {
    loop {
        controller.tick();
        sync_current_track(app, controller, state);
        state.lyrics.poll();
        drain_jobs(app, state);

        let sample = state.sampler.sample(controller);
        let player = PlayerView {
            track: controller.current_track(),
            queue_position: (controller.current_index(), controller.queue().len()),
            sample,
            playing: controller.is_playing(),
            volume: controller.volume(),
            repeat: controller.repeat(),
            shuffle: controller.is_shuffle(),
            lyrics: state.lyrics.state(),
            logged_in: state.client.is_logged_in(),
        };
        terminal.draw(|f| ui::draw(f, app, &player, &settings.ui, &settings.controls))?;

        if !event::poll(settings.frame_interval())? {
            continue;
        }
        let quit = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                handle_key_event(key, settings, app, controller, state)
            }
            Event::Mouse(mouse) => {
                handle_mouse_event(mouse, app, controller);
                false
            }
            _ => false,
        };
        if quit {
            break;
        }
    }

    controller.shutdown();
    state.sampler.cancel();
    Ok(())
}

/// Point the lyrics pane at the current track when it changed.
fn sync_current_track(app: &mut App, controller: &Controller, state: &mut EventLoopState) {
    let id = controller.current_track().and_then(|t| t.id.clone());
    let key = (controller.current_index(), id);
    if key == state.last_track {
        return;
    }

    app.track_changed();
    state.lyrics.track_changed(key.1.as_deref());
    state.last_track = key;
}

fn drain_jobs(app: &mut App, state: &mut EventLoopState) {
    while let Ok(outcome) = state.jobs.search_rx.try_recv() {
        match outcome.result {
            Ok(results) => {
                if app.apply_search(outcome.generation, outcome.query, results) {
                    app.set_status(app.result_summary());
                }
            }
            Err(err) => {
                warn!("search {:?} failed: {err}", outcome.query);
                app.search_failed(outcome.generation);
                app.set_status(format!("Search failed: {err}"));
            }
        }
    }

    while let Ok(outcome) = state.jobs.album_rx.try_recv() {
        match outcome.result {
            Ok(metadata) => {
                let listing = metadata.listing();
                let skipped = listing.skipped;
                if app.open_album(listing) && skipped > 0 {
                    app.set_status(format!("{skipped} tracks of this album cannot be played"));
                }
            }
            Err(err) => {
                warn!("opening album {} failed: {err}", outcome.id);
                app.album_failed(&outcome.id);
                app.set_status(format!("Could not open album: {err}"));
            }
        }
    }

    while let Ok(outcome) = state.jobs.love_rx.try_recv() {
        match outcome.result {
            Ok(()) => app.set_loved(&outcome.id, outcome.loved),
            Err(err) => {
                warn!("updating loved flag of {} failed: {err}", outcome.id);
                app.set_status(format!("Could not update loved tracks: {err}"));
            }
        }
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    state: &mut EventLoopState,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if app.input_mode == InputMode::Search {
        match key.code {
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Enter => {
                let (generation, query) = app.submit_search();
                state.jobs.search(generation, query);
            }
            KeyCode::Char(c) if !c.is_control() => app.push_search_char(c),
            _ => {}
        }
        return false;
    }

    if app.focus == Focus::Lyrics && handle_lyrics_key(key.code, app, controller, state) {
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('v') => app.cycle_browse(),
        KeyCode::Esc | KeyCode::Backspace => {
            if !app.close_album() {
                app.clear_status();
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => activate_selected(app, controller, state),
        KeyCode::Char('a') => {
            queue_selected(app, controller);
        }
        KeyCode::Char('A') => queue_album(app, controller),
        KeyCode::Char('p') | KeyCode::Char(' ') => controller.toggle(),
        KeyCode::Char('l') => controller.next(),
        KeyCode::Char('h') => controller.back(),
        KeyCode::Char('L') => {
            let target = state.sampler.last().position + settings.controls.scrub_seconds as f64;
            controller.goto(target);
        }
        KeyCode::Char('H') => {
            let target = state.sampler.last().position - settings.controls.scrub_seconds as f64;
            controller.goto(target.max(0.0));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            controller.set_volume(controller.volume() + settings.controls.volume_step);
        }
        KeyCode::Char('-') => {
            controller.set_volume(controller.volume() - settings.controls.volume_step);
        }
        KeyCode::Char('r') => {
            let mode = controller.repeat().cycle();
            controller.set_repeat(mode);
            app.set_status(mode.label());
        }
        KeyCode::Char('s') => {
            controller.set_shuffle(!controller.is_shuffle());
        }
        KeyCode::Char('f') => {
            if let Some(track) = app.selected_track() {
                state.jobs.set_loved(track.id.clone(), !track.loved);
            }
        }
        KeyCode::Char('c') => match controller.current_track() {
            Some(track) => {
                let url = state.client.endpoints().cover_url(track.id.as_deref());
                app.set_status(url);
            }
            None => app.set_status("Nothing is playing"),
        },
        KeyCode::Char('X') => {
            state.client.logout();
            app.set_status("Logged out");
        }
        _ => {}
    }

    false
}

/// Keys that mean something else while the lyrics pane has focus.
/// Returns whether the key was consumed.
fn handle_lyrics_key(code: KeyCode, app: &mut App, controller: &mut Controller, state: &EventLoopState) -> bool {
    let lines = match state.lyrics.lyrics() {
        Some(Lyrics::Synced(lines)) => lines.as_slice(),
        _ => &[],
    };
    let position_ms = (state.sampler.last().position * 1000.0) as i64;

    match code {
        KeyCode::Esc => app.release_lyrics_focus(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_lyrics_selection(1, lines.len(), active_line(lines, position_ms));
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_lyrics_selection(-1, lines.len(), active_line(lines, position_ms));
        }
        KeyCode::Enter => {
            if let Some(line) = app.lyrics_selected.and_then(|i| lines.get(i)) {
                controller.goto(line.start_seconds());
                app.lyrics_selected = None;
            }
        }
        _ => return false,
    }
    true
}

/// Enter on the result list: play a track, open an album, or search for
/// an artist.
fn activate_selected(app: &mut App, controller: &mut Controller, state: &EventLoopState) {
    match app.browse {
        Browse::Tracks | Browse::Album => {
            if queue_selected(app, controller) {
                controller.next();
            }
        }
        Browse::Albums => {
            if let Some(album) = app.selected_album() {
                let id = album.id.clone();
                app.begin_open_album(&id);
                state.jobs.open_album(id);
            }
        }
        Browse::Artists => {
            if let Some(artist) = app.selected_artist() {
                info!("browsing artist {} ({})", artist.name, artist.id);
                let name = artist.name.clone();
                let (generation, query) = app.begin_search(name);
                state.jobs.search(generation, query);
            }
        }
    }
}

/// Append the selected track row. Returns false when nothing was queued.
fn queue_selected(app: &mut App, controller: &mut Controller) -> bool {
    if let Some(track) = app.selected_album_track() {
        info!("queued {} ({})", track.title, track.format);
        controller.append(track.clone());
        return true;
    }
    let Some(track) = app.selected_track() else {
        return false;
    };
    match track.to_queued() {
        Some(queued) => {
            info!("queued {} ({})", queued.title, queued.format);
            controller.append(queued);
            true
        }
        None => {
            let status = format!("{}: {} files cannot be played", track.name, track.format);
            app.set_status(status);
            false
        }
    }
}

/// Append every playable track of the opened album.
fn queue_album(app: &mut App, controller: &mut Controller) {
    let Some(album) = app.album.as_ref().filter(|_| app.browse == Browse::Album) else {
        return;
    };
    for track in &album.tracks {
        controller.append(track.clone());
    }
    info!("queued album {} ({} tracks)", album.name, album.tracks.len());
    let status = format!("Queued {} tracks from {}", album.tracks.len(), album.name);
    app.set_status(status);
}

fn handle_mouse_event(mouse: MouseEvent, app: &mut App, controller: &mut Controller) {
    let at = Position::new(mouse.column, mouse.row);
    let progress = app.hit_areas.progress;
    let volume = app.hit_areas.volume;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(area) = progress.filter(|a| a.contains(at)) {
                app.scrubber.press(fraction_in(area, at));
            } else if let Some(area) = volume.filter(|a| a.contains(at)) {
                app.volume_slider.press(fraction_in(area, at), controller);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(area) = progress.filter(|_| app.scrubber.is_dragging()) {
                app.scrubber.drag(fraction_in(area, at));
            } else if let Some(area) = volume.filter(|_| app.volume_slider.is_dragging()) {
                app.volume_slider.drag(fraction_in(area, at), controller);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.scrubber.is_dragging() {
                app.scrubber.release(controller);
            }
            app.volume_slider.release();
        }
        _ => {}
    }
}

fn fraction_in(area: Rect, at: Position) -> f64 {
    pointer_fraction(at.x as f64, area.x as f64, area.width as f64)
}
