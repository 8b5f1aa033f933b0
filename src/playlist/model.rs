//! Queue model types: `QueuedTrack`, `TrackFormat`, `RepeatMode` and `Queue`.

use std::fmt;

use serde::Deserialize;

/// Codecs the server can stream to us.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackFormat {
    Mp3,
    Flac,
}

impl TrackFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
        }
    }

    /// Parse a format hint (`"mp3"`, `"FLAC"`, ...). Unknown codecs yield `None`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }
}

impl fmt::Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the play queue. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedTrack {
    /// Server-side track id; ad-hoc entries may not have one.
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub format: TrackFormat,
}

/// What `next`/`back` do at queue boundaries and within a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop once the last track ends.
    #[default]
    Disabled,
    /// Restart the current track.
    Single,
    /// Wrap around to the first track.
    Collection,
}

impl RepeatMode {
    /// Cycle `Disabled -> Collection -> Single -> Disabled`.
    pub fn cycle(self) -> Self {
        match self {
            Self::Disabled => Self::Collection,
            Self::Collection => Self::Single,
            Self::Single => Self::Disabled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Disabled => "Repeat: Off",
            Self::Single => "Repeat: One",
            Self::Collection => "Repeat: All",
        }
    }
}

/// Ordered, append-only track storage. Duplicates are allowed.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<QueuedTrack>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, track: QueuedTrack) {
        self.tracks.push(track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueuedTrack> {
        self.tracks.get(index)
    }

    pub fn as_slice(&self) -> &[QueuedTrack] {
        &self.tracks
    }
}
