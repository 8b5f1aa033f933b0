//! Turning downloaded stream bytes into a ready `rodio` sink.

use std::io::Cursor;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::playlist::TrackFormat;

use super::types::TransportError;

pub(super) type StreamSource = Decoder<Cursor<Vec<u8>>>;

/// Decode an in-memory stream, using `format` as the container hint.
pub(super) fn decode(bytes: Vec<u8>, format: TrackFormat) -> Result<StreamSource, TransportError> {
    let len = bytes.len() as u64;
    Decoder::builder()
        .with_data(Cursor::new(bytes))
        .with_byte_len(len)
        .with_hint(format.as_str())
        .with_seekable(true)
        .build()
        .map_err(|err| TransportError::Decode {
            format,
            reason: err.to_string(),
        })
}

/// Seconds, or 0 when the container does not report a length.
pub(super) fn source_duration(source: &StreamSource) -> f64 {
    source
        .total_duration()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Create a paused `Sink` holding `source` at `volume`.
pub(super) fn create_sink(stream: &OutputStream, source: StreamSource, volume: f32) -> Sink {
    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    sink
}
