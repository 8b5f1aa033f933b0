//! Transport contract and the small types shared by its implementations.
//!
//! The controller only ever talks to a `Transport`; `RodioTransport` is
//! the real engine and tests substitute a recording fake.

use thiserror::Error;

use crate::backend::BackendError;
use crate::playlist::TrackFormat;

/// Options attached to a single `Transport::load` call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadOptions {
    /// Start playing as soon as the source is ready.
    pub autoplay: bool,
    pub format: TrackFormat,
    /// Volume applied to the new source before it starts.
    pub initial_volume: f32,
    /// Report the natural end of this source through `Transport::poll_ended`.
    pub advance_on_end: bool,
}

/// The single shared audio engine.
///
/// Only one source is decodable at a time; loading a new one stops the
/// previous one. Positions and durations are in seconds.
pub trait Transport {
    fn load(&mut self, stream_url: &str, options: LoadOptions);
    fn stop(&mut self);
    fn seek(&mut self, seconds: f64);
    fn position(&self) -> f64;
    /// Duration of the loaded source, 0 when unknown or nothing is loaded.
    fn duration(&self) -> f64;
    fn toggle_play_pause(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn playing(&self) -> bool;
    /// Drive pending work (finished downloads, end detection).
    ///
    /// Returns `true` exactly once when a source loaded with
    /// `advance_on_end` reached its natural end.
    fn poll_ended(&mut self) -> bool;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no audio output device available: {0}")]
    NoOutputDevice(String),
    #[error("failed to decode {format} stream: {reason}")]
    Decode {
        format: TrackFormat,
        reason: String,
    },
    #[error("failed to fetch stream: {0}")]
    Fetch(#[from] BackendError),
}
