mod app;
mod audio;
mod backend;
mod config;
mod logger;
mod lyrics;
mod playlist;
mod progress;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
