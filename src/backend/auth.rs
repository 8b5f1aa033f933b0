//! On-disk persistence of the session tokens.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::error::BackendError;

/// Saved tokens stay valid for three days.
pub const TOKEN_LIFETIME_SECS: u64 = 3 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub refresh_token: String,
    #[serde(default)]
    pub access_token: Option<String>,
    /// Unix seconds.
    pub expires_at: u64,
}

impl StoredTokens {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// TOML credential file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored tokens. A missing or expired file yields `None`.
    pub fn load(&self) -> Result<Option<StoredTokens>, BackendError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(credentials_error(&self.path, err)),
        };

        let tokens: StoredTokens =
            toml::from_str(&text).map_err(|err| credentials_error(&self.path, err))?;
        if tokens.is_expired(unix_now()) {
            return Ok(None);
        }
        Ok(Some(tokens))
    }

    pub fn save(&self, refresh_token: &str, access_token: Option<&str>) -> Result<(), BackendError> {
        let tokens = StoredTokens {
            refresh_token: refresh_token.to_string(),
            access_token: access_token.map(str::to_string),
            expires_at: unix_now() + TOKEN_LIFETIME_SECS,
        };
        let text = toml::to_string(&tokens).map_err(|err| credentials_error(&self.path, err))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| credentials_error(&self.path, err))?;
        }
        fs::write(&self.path, text).map_err(|err| credentials_error(&self.path, err))
    }

    pub fn clear(&self) -> Result<(), BackendError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(credentials_error(&self.path, err)),
        }
    }
}

pub(super) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn credentials_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Credentials(format!("{}: {err}", path.display()))
}
