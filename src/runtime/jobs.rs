//! Backend requests that run off the UI thread.
//!
//! Each job sends exactly one outcome back over its channel. The event
//! loop drains the channels once per frame.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{debug, warn};

use crate::app::SearchResults;
use crate::backend::{AlbumMetadata, BackendClient, BackendError};

pub struct SearchOutcome {
    pub generation: u64,
    pub query: String,
    pub result: Result<SearchResults, BackendError>,
}

pub struct LoveOutcome {
    pub id: String,
    pub loved: bool,
    pub result: Result<(), BackendError>,
}

pub struct AlbumOutcome {
    pub id: String,
    pub result: Result<AlbumMetadata, BackendError>,
}

pub struct Jobs {
    client: Arc<BackendClient>,
    page_size: u32,
    search_tx: Sender<SearchOutcome>,
    pub search_rx: Receiver<SearchOutcome>,
    love_tx: Sender<LoveOutcome>,
    pub love_rx: Receiver<LoveOutcome>,
    album_tx: Sender<AlbumOutcome>,
    pub album_rx: Receiver<AlbumOutcome>,
}

impl Jobs {
    pub fn new(client: Arc<BackendClient>, page_size: u32) -> Self {
        let (search_tx, search_rx) = mpsc::channel();
        let (love_tx, love_rx) = mpsc::channel();
        let (album_tx, album_rx) = mpsc::channel();
        Self {
            client,
            page_size,
            search_tx,
            search_rx,
            love_tx,
            love_rx,
            album_tx,
            album_rx,
        }
    }

    /// First page of the track, album and artist indexes; an empty query
    /// lists everything. Only a failed track lookup fails the search.
    pub fn search(&self, generation: u64, query: String) {
        let client = Arc::clone(&self.client);
        let tx = self.search_tx.clone();
        let count = self.page_size;
        thread::spawn(move || {
            debug!("search #{generation}: {query:?}");
            let search = (!query.is_empty()).then_some(query.as_str());
            let result = client.index_tracks(0, count, search).map(|tracks| SearchResults {
                tracks,
                albums: client.index_albums(0, count, search).unwrap_or_else(|err| {
                    warn!("album search #{generation} failed: {err}");
                    Vec::new()
                }),
                artists: client.index_artists(0, count, search).unwrap_or_else(|err| {
                    warn!("artist search #{generation} failed: {err}");
                    Vec::new()
                }),
            });
            let _ = tx.send(SearchOutcome {
                generation,
                query,
                result,
            });
        });
    }

    pub fn set_loved(&self, id: String, loved: bool) {
        let client = Arc::clone(&self.client);
        let tx = self.love_tx.clone();
        thread::spawn(move || {
            let result = client.set_track_loved(&id, loved);
            let _ = tx.send(LoveOutcome { id, loved, result });
        });
    }

    pub fn open_album(&self, id: String) {
        let client = Arc::clone(&self.client);
        let tx = self.album_tx.clone();
        thread::spawn(move || {
            let result = client.album(&id);
            let _ = tx.send(AlbumOutcome { id, result });
        });
    }
}
