use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{debug, warn};

use crate::backend::{BackendClient, BackendError};

use super::model::Lyrics;

/// Where lyrics come from. Implemented by `BackendClient`.
pub trait LyricsSource: Send + Sync + 'static {
    fn fetch_lyrics(&self, id: &str) -> Result<Lyrics, BackendError>;
}

impl LyricsSource for BackendClient {
    fn fetch_lyrics(&self, id: &str) -> Result<Lyrics, BackendError> {
        Ok(Lyrics::from_value(&self.lyrics(id)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LyricsState {
    /// No track, or a track without an id.
    #[default]
    Idle,
    Loading,
    Ready(Lyrics),
}

struct Fetched {
    id: String,
    result: Result<Lyrics, BackendError>,
}

/// Fetches lyrics for the current track off the UI thread.
///
/// Results are cached per track id for the session. A result that
/// arrives after the current track changed is cached but not shown.
pub struct LyricsFetcher<S: LyricsSource> {
    source: Arc<S>,
    cache: HashMap<String, Lyrics>,
    current: Option<String>,
    state: LyricsState,
    tx: Sender<Fetched>,
    rx: Receiver<Fetched>,
}

impl<S: LyricsSource> LyricsFetcher<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            cache: HashMap::new(),
            current: None,
            state: LyricsState::Idle,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &LyricsState {
        &self.state
    }

    /// Point the fetcher at the track now playing. A no-op when the id is
    /// unchanged.
    pub fn track_changed(&mut self, id: Option<&str>) {
        if self.current.as_deref() == id {
            return;
        }
        self.current = id.map(str::to_string);

        let Some(id) = id else {
            self.state = LyricsState::Idle;
            return;
        };
        if let Some(cached) = self.cache.get(id) {
            self.state = LyricsState::Ready(cached.clone());
            return;
        }

        self.state = LyricsState::Loading;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let id = id.to_string();
        debug!("lyrics: fetching {id}");
        thread::spawn(move || {
            let result = source.fetch_lyrics(&id);
            let _ = tx.send(Fetched { id, result });
        });
    }

    /// Apply finished fetches. Returns true when the visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(Fetched { id, result }) = self.rx.try_recv() {
            let lyrics = match result {
                Ok(lyrics) => {
                    self.cache.insert(id.clone(), lyrics.clone());
                    lyrics
                }
                Err(err) => {
                    warn!("lyrics for {id} unavailable: {err}");
                    Lyrics::None
                }
            };
            if self.current.as_deref() == Some(id.as_str()) {
                self.state = LyricsState::Ready(lyrics);
                changed = true;
            } else {
                debug!("lyrics: dropping stale result for {id}");
            }
        }
        changed
    }

    pub fn lyrics(&self) -> Option<&Lyrics> {
        match &self.state {
            LyricsState::Ready(lyrics) => Some(lyrics),
            _ => None,
        }
    }
}
