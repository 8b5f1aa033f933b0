use std::env;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::logger;

mod event_loop;
mod jobs;
mod settings;
mod startup;

pub fn run() -> Result<()> {
    let settings::StartupSettings { settings, fallback } = settings::load_settings();
    logger::init(&settings);
    if let Some(problem) = fallback {
        eprintln!("astral: {problem}");
        warn!("config ignored: {problem}");
    }

    let client = startup::build_client(&settings);
    info!("starting against {}", client.endpoints().base());
    startup::login_from_env(&client);
    let mut controller = startup::build_controller(&client, &settings);

    let mut app = App::new();
    let mut state = event_loop::EventLoopState::new(&settings, client);

    // The first argument, if any, is searched right away.
    if let Some(query) = env::args().nth(1) {
        let (generation, query) = app.begin_search(query.trim().to_string());
        state.jobs.search(generation, query);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut controller, &mut state);
    if run_result.is_err() {
        controller.shutdown();
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutting down");
    run_result
}
