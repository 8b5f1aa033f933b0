use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncedLyricLine {
    pub start_time_ms: u64,
    pub line: String,
}

impl SyncedLyricLine {
    pub fn start_seconds(&self) -> f64 {
        self.start_time_ms as f64 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Lyrics {
    Synced(Vec<SyncedLyricLine>),
    /// Plain lines; rendered without highlighting.
    Unsynced(Vec<String>),
    #[default]
    None,
}

impl Lyrics {
    /// Interpret a `GET /lyrics/{id}` body: `{"lines": [...]}` holding
    /// either timestamped objects or plain strings. A bare array is
    /// accepted too. Anything else means there are no lyrics.
    pub fn from_value(value: &Value) -> Self {
        let lines = match value {
            Value::Object(map) => map.get("lines"),
            Value::Array(_) => Some(value),
            _ => None,
        };
        let Some(Value::Array(items)) = lines else {
            return Self::None;
        };
        if items.is_empty() {
            return Self::None;
        }

        if items.iter().all(Value::is_string) {
            let lines = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            return Self::Unsynced(lines);
        }

        match serde_json::from_value::<Vec<SyncedLyricLine>>(Value::Array(items.clone())) {
            Ok(lines) => Self::Synced(lines),
            Err(_) => Self::None,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Synced(lines) => lines.is_empty(),
            Self::Unsynced(lines) => lines.is_empty(),
            Self::None => true,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Synced(lines) => lines.len(),
            Self::Unsynced(lines) => lines.len(),
            Self::None => 0,
        }
    }
}
