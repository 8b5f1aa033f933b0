use std::path::PathBuf;

use serde::Deserialize;

use crate::playlist::RepeatMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/astral/config.toml` or `~/.config/astral/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ASTRAL__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Root URL of the Astral server, e.g. `http://localhost:8080`.
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Also used as the write timeout.
    pub read_timeout_secs: u64,
    /// How often the access token is re-verified with the server.
    pub token_check_secs: u64,
    /// Where session tokens are saved. Defaults to the state directory.
    pub credentials_path: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout_secs: 5,
            read_timeout_secs: 30,
            token_check_secs: 60,
            credentials_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Repeat mode at startup.
    pub repeat: RepeatSetting,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Initial volume in `[0, 1]`.
    pub volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            repeat: RepeatSetting::Disabled,
            shuffle: false,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatSetting {
    #[serde(alias = "off", alias = "none", alias = "no-loop", alias = "no_loop")]
    Disabled,
    #[serde(
        alias = "one",
        alias = "repeat-one",
        alias = "loop-one",
        alias = "loop_one"
    )]
    Single,
    #[serde(
        alias = "all",
        alias = "repeat-all",
        alias = "loop-all",
        alias = "loop_all"
    )]
    Collection,
}

impl From<RepeatSetting> for RepeatMode {
    fn from(setting: RepeatSetting) -> Self {
        match setting {
            RepeatSetting::Disabled => RepeatMode::Disabled,
            RepeatSetting::Single => RepeatMode::Single,
            RepeatSetting::Collection => RepeatMode::Collection,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Number of results requested per search.
    pub search_page_size: u32,

    /// Redraw and progress sampling cadence (milliseconds).
    pub frame_ms: u64,

    /// Which time fields to show in the player bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ astral ~ ".to_string(),
            search_page_size: 50,
            frame_ms: 33,
            time_fields: vec![TimeField::Elapsed, TimeField::Total],
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter, e.g. `info` or `astral=debug`. `RUST_LOG` wins.
    pub level: String,
    /// Log file; defaults to `astral.log` in the state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
