//! Lyrics for the current track.
//!
//! - `model`: the wire payload and the synced/unsynced split.
//! - `sync`: active-line search and auto-scroll throttling.
//! - `fetch`: background fetching with a per-track cache.

mod fetch;
mod model;
mod sync;

pub use fetch::{LyricsFetcher, LyricsSource, LyricsState};
pub use model::{Lyrics, SyncedLyricLine};
pub use sync::{AutoScroll, active_line, scroll_target};
