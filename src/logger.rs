//! Logging setup.
//!
//! The terminal belongs to the TUI, so records go to a log file that is
//! truncated at the start of every session. `RUST_LOG` overrides the
//! configured filter.

use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};

use crate::config::Settings;

pub fn init(settings: &Settings) {
    let filters = env::var("RUST_LOG").unwrap_or_else(|_| settings.logging.level.clone());

    let target = match settings.log_path() {
        Some(path) => match open_log_file(&path) {
            Ok(file) => Target::Pipe(Box::new(file)),
            Err(_) => Target::Pipe(Box::new(io::sink())),
        },
        None => Target::Pipe(Box::new(io::sink())),
    };

    let mut builder = Builder::new();
    builder
        .parse_filters(&filters)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}][{}][{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(target);

    // A second init (tests) keeps the first logger.
    let _ = builder.try_init();
}

/// Create parent directories and truncate `path`.
pub(crate) fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}
