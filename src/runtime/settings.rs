use crate::config::Settings;

/// Settings the client starts with, and why the configured ones were
/// replaced by defaults when they were.
pub struct StartupSettings {
    pub settings: Settings,
    pub fallback: Option<String>,
}

/// A missing or broken config never keeps the client from reaching the
/// server: the defaults point at a local Astral instance.
pub fn load_settings() -> StartupSettings {
    settings_or_defaults(Settings::load().map_err(|e| e.to_string()))
}

fn settings_or_defaults(loaded: Result<Settings, String>) -> StartupSettings {
    match loaded.and_then(|s| s.validate().map(|()| s)) {
        Ok(settings) => StartupSettings {
            settings,
            fallback: None,
        },
        Err(problem) => {
            let settings = Settings::default();
            let fallback = format!("{problem}; connecting to {} instead", settings.server.base_url);
            StartupSettings {
                settings,
                fallback: Some(fallback),
            }
        }
    }
}
