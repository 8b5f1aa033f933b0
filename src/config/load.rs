use std::{env, path::PathBuf, time::Duration};

use crate::backend::ClientOptions;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ASTRAL__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ASTRAL")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.base_url.trim().is_empty() {
            return Err("server.base_url must not be empty".to_string());
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err("controls.volume_step must be in (0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err("playback.volume must be in [0, 1]".to_string());
        }
        if self.ui.frame_ms == 0 {
            return Err("ui.frame_ms must be >= 1".to_string());
        }
        if self.ui.search_page_size == 0 {
            return Err("ui.search_page_size must be >= 1".to_string());
        }
        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.server.read_timeout_secs),
            token_check: Duration::from_secs(self.server.token_check_secs),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.ui.frame_ms.max(1))
    }

    /// `server.credentials_path`, else `credentials.toml` in the state directory.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.server
            .credentials_path
            .clone()
            .or_else(|| default_state_dir().map(|d| d.join("credentials.toml")))
    }

    /// `logging.file`, else `astral.log` in the state directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| default_state_dir().map(|d| d.join("astral.log")))
    }
}

/// Resolve the config path from `ASTRAL_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ASTRAL_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/astral/config.toml`
/// or `~/.config/astral/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("astral").join("config.toml"))
}

/// `$XDG_STATE_HOME/astral` or `~/.local/state/astral`.
pub fn default_state_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("astral"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
