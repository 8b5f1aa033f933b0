use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use crate::playlist::RepeatMode;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_astral_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ASTRAL_CONFIG_PATH", "/tmp/astral-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/astral-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home/astral/config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.config/astral/config.toml")
    );
}

#[test]
fn state_dir_follows_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(default_state_dir().unwrap(), PathBuf::from("/tmp/xdg-state/astral"));

    let settings = Settings::default();
    assert_eq!(
        settings.credentials_path().unwrap(),
        PathBuf::from("/tmp/xdg-state/astral/credentials.toml")
    );
    assert_eq!(
        settings.log_path().unwrap(),
        PathBuf::from("/tmp/xdg-state/astral/astral.log")
    );
}

#[test]
fn state_dir_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_state_dir().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/state/astral")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.server.base_url, "http://localhost:8080");
    assert_eq!(s.server.token_check_secs, 60);
    assert_eq!(s.playback.repeat, RepeatSetting::Disabled);
    assert_eq!(s.playback.volume, 1.0);
    assert_eq!(s.controls.scrub_seconds, 5);
    assert_eq!(s.ui.search_page_size, 50);
    assert_eq!(s.logging.level, "info");
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[server]
base_url = "https://music.example.org/api/"
token_check_secs = 15
credentials_path = "/tmp/creds.toml"

[playback]
shuffle = true
repeat = "repeat-one"
volume = 0.4

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
search_page_size = 20
frame_ms = 50
time_fields = ["elapsed", "remaining"]
time_separator = " | "

[logging]
level = "astral=debug"
file = "/tmp/astral-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ASTRAL_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ASTRAL__PLAYBACK__VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.validate().is_ok());
    assert_eq!(s.server.base_url, "https://music.example.org/api/");
    assert_eq!(s.server.token_check_secs, 15);
    assert_eq!(s.credentials_path().unwrap(), PathBuf::from("/tmp/creds.toml"));
    assert!(s.playback.shuffle);
    assert_eq!(RepeatMode::from(s.playback.repeat), RepeatMode::Single);
    assert_eq!(s.playback.volume, 0.4);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.search_page_size, 20);
    assert_eq!(s.frame_interval(), std::time::Duration::from_millis(50));
    assert_eq!(s.ui.time_fields, vec![TimeField::Elapsed, TimeField::Remaining]);
    assert_eq!(s.ui.time_separator, " | ");
    assert_eq!(s.logging.level, "astral=debug");
    assert_eq!(s.log_path().unwrap(), PathBuf::from("/tmp/astral-test.log"));
}

#[test]
fn repeat_aliases_map_to_modes() {
    for (alias, mode) in [
        ("off", RepeatMode::Disabled),
        ("disabled", RepeatMode::Disabled),
        ("loop-all", RepeatMode::Collection),
        ("collection", RepeatMode::Collection),
        ("one", RepeatMode::Single),
    ] {
        let parsed: PlaybackSettings = toml::from_str(&format!("repeat = \"{alias}\"")).unwrap();
        assert_eq!(RepeatMode::from(parsed.repeat), mode, "alias {alias}");
    }
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[server]
base_url = "http://from-file:8080"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ASTRAL_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ASTRAL__SERVER__BASE_URL", "http://from-env:9090");

    let s = Settings::load().unwrap();
    assert_eq!(s.server.base_url, "http://from-env:9090");
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.frame_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.search_page_size = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.server.base_url = "  ".to_string();
    assert!(s.validate().is_err());
}
