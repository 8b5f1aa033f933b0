use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::backend::BackendClient;

use super::fetch::{Fetched, LoadTracker, spawn_fetch};
use super::sink::{create_sink, decode, source_duration};
use super::types::{LoadOptions, Transport, TransportError};

/// `Transport` backed by the default `rodio` output device.
///
/// Without an output device every call is accepted and ignored, so the
/// rest of the client keeps working.
pub struct RodioTransport {
    stream: Option<OutputStream>,
    client: Arc<BackendClient>,
    sink: Option<Sink>,
    duration: f64,
    volume: f32,
    loads: LoadTracker,
    advance_on_end: bool,
    tx: Sender<Fetched>,
    rx: Receiver<Fetched>,
}

impl RodioTransport {
    pub fn new(client: Arc<BackendClient>) -> Self {
        let stream = match open_stream() {
            Ok(stream) => Some(stream),
            Err(err) => {
                warn!("{err}; playback disabled");
                None
            }
        };
        let (tx, rx) = mpsc::channel();

        Self {
            stream,
            client,
            sink: None,
            duration: 0.0,
            volume: 1.0,
            loads: LoadTracker::default(),
            advance_on_end: false,
            tx,
            rx,
        }
    }

    fn drop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = 0.0;
        self.advance_on_end = false;
    }

    fn finish_load(&mut self, fetched: Fetched) {
        let Some(options) = self.loads.accept(fetched.generation) else {
            debug!("dropping superseded fetch #{}", fetched.generation);
            return;
        };

        let bytes = match fetched.result {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("{}", TransportError::from(err));
                return;
            }
        };
        let source = match decode(bytes, options.format) {
            Ok(source) => source,
            Err(err) => {
                warn!("{err}");
                return;
            }
        };
        let Some(stream) = &self.stream else {
            return;
        };

        self.duration = source_duration(&source);
        let sink = create_sink(stream, source, self.volume);
        if options.autoplay {
            sink.play();
        }
        self.sink = Some(sink);
        self.advance_on_end = options.advance_on_end;
        debug!("load #{} ready ({:.1}s)", fetched.generation, self.duration);
    }
}

impl Transport for RodioTransport {
    fn load(&mut self, stream_url: &str, options: LoadOptions) {
        self.drop_sink();
        self.volume = options.initial_volume;
        let generation = self.loads.begin(options);
        spawn_fetch(
            Arc::clone(&self.client),
            stream_url.to_string(),
            generation,
            self.tx.clone(),
        );
    }

    fn stop(&mut self) {
        self.loads.cancel();
        self.drop_sink();
    }

    fn seek(&mut self, seconds: f64) {
        let Some(sink) = &self.sink else {
            return;
        };
        let mut target = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if self.duration > 0.0 {
            target = target.min(self.duration);
        }
        if let Err(err) = sink.try_seek(Duration::from_secs_f64(target)) {
            warn!("seek to {target:.2}s failed: {err}");
        }
    }

    fn position(&self) -> f64 {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn toggle_play_pause(&mut self) {
        match &self.sink {
            Some(sink) if sink.is_paused() => sink.play(),
            Some(sink) => sink.pause(),
            None => {
                if let Some(pending) = self.loads.pending_mut() {
                    pending.autoplay = !pending.autoplay;
                }
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn playing(&self) -> bool {
        match &self.sink {
            Some(sink) => !sink.is_paused() && !sink.empty(),
            None => self.loads.will_autoplay(),
        }
    }

    fn poll_ended(&mut self) -> bool {
        while let Ok(fetched) = self.rx.try_recv() {
            self.finish_load(fetched);
        }

        let finished = self
            .sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && sink.empty());
        if finished && self.advance_on_end {
            self.advance_on_end = false;
            return true;
        }
        false
    }
}

fn open_stream() -> Result<OutputStream, TransportError> {
    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|err| TransportError::NoOutputDevice(err.to_string()))?;
    // rodio logs to stderr when the stream is dropped, which would land
    // on top of the TUI.
    stream.log_on_drop(false);
    Ok(stream)
}
