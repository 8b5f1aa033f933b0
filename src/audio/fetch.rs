//! Background stream downloads and the bookkeeping that lets a newer
//! `load`/`stop` supersede one still in flight.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use log::debug;

use crate::backend::{BackendClient, BackendError};

use super::types::LoadOptions;

/// Result of one download, tagged with the load it belongs to.
pub(super) struct Fetched {
    pub generation: u64,
    pub result: Result<Vec<u8>, BackendError>,
}

pub(super) fn spawn_fetch(
    client: Arc<BackendClient>,
    url: String,
    generation: u64,
    tx: Sender<Fetched>,
) {
    thread::spawn(move || {
        debug!("fetch #{generation}: {url}");
        let result = client.download(&url);
        // The receiver is gone once the transport is dropped.
        let _ = tx.send(Fetched { generation, result });
    });
}

/// Tracks which load is current. Only the newest generation is accepted,
/// and only once.
#[derive(Debug, Default)]
pub(super) struct LoadTracker {
    generation: u64,
    pending: Option<LoadOptions>,
}

impl LoadTracker {
    /// Start a new load, superseding any pending one.
    pub fn begin(&mut self, options: LoadOptions) -> u64 {
        self.generation += 1;
        self.pending = Some(options);
        self.generation
    }

    /// Forget the pending load (stop).
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// Options for `generation` if it is still the pending load.
    pub fn accept(&mut self, generation: u64) -> Option<LoadOptions> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn pending_mut(&mut self) -> Option<&mut LoadOptions> {
        self.pending.as_mut()
    }

    /// A load is in flight and will start playing when it lands.
    pub fn will_autoplay(&self) -> bool {
        self.pending.is_some_and(|options| options.autoplay)
    }
}
