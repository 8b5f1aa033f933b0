//! `PlaylistController`: the one playback session shared by every view.
//!
//! The controller owns the queue, the current index, repeat/shuffle state
//! and the volume, and is the only code that mutates them. It never
//! fails: empty queues and out-of-range indices fall back to the stopped
//! state instead of erroring.

use log::debug;

use crate::audio::{LoadOptions, Transport};
use crate::backend::Endpoints;

use super::model::{Queue, QueuedTrack, RepeatMode};

/// Up to this position (seconds) `back` moves to the previous track;
/// past it, `back` restarts the current one.
pub const BACK_RESTART_THRESHOLD_SECS: f64 = 6.0;

pub struct PlaylistController<T: Transport> {
    transport: T,
    endpoints: Endpoints,
    queue: Queue,
    current: Option<usize>,
    repeat: RepeatMode,
    shuffle: bool,
    volume: f32,
}

impl<T: Transport> PlaylistController<T> {
    /// Create an empty, stopped session on top of `transport`.
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            queue: Queue::new(),
            current: None,
            repeat: RepeatMode::default(),
            shuffle: false,
            volume: 1.0,
        }
    }

    /// Push `track` to the end of the queue. Does not start playback.
    pub fn append(&mut self, track: QueuedTrack) {
        debug!("queue: append {:?} ({})", track.title, self.queue.len());
        self.queue.append(track);
    }

    /// Advance according to the repeat mode.
    pub fn next(&mut self) {
        let len = self.queue.len();
        if len == 0 {
            self.stop_at_end();
            return;
        }

        let target = match self.repeat {
            RepeatMode::Single => Some(self.current.unwrap_or(0)),
            RepeatMode::Collection => Some(self.current.map_or(0, |i| (i + 1) % len)),
            RepeatMode::Disabled => {
                let candidate = self.current.map_or(0, |i| i + 1);
                (candidate < len).then_some(candidate)
            }
        };

        match target {
            Some(index) => {
                self.current = Some(index);
                self.load_current();
            }
            None => self.stop_at_end(),
        }
    }

    /// Go back: previous track within the first few seconds, otherwise
    /// restart the current one.
    pub fn back(&mut self) {
        if self.transport.position() > BACK_RESTART_THRESHOLD_SECS {
            self.transport.seek(0.0);
            return;
        }

        if self.repeat == RepeatMode::Single {
            self.transport.seek(0.0);
            return;
        }

        if self.queue.is_empty() {
            self.current = None;
            self.transport.stop();
            return;
        }

        match self.current {
            None | Some(0) => {
                self.transport.seek(0.0);
                self.transport.stop();
            }
            Some(i) => {
                self.current = Some(i - 1);
                self.transport.stop();
                self.load_current();
            }
        }
    }

    /// Toggle play/pause; queue and index are untouched.
    pub fn toggle(&mut self) {
        self.transport.toggle_play_pause();
    }

    /// Seek the loaded track to `position` seconds.
    pub fn goto(&mut self, position: f64) {
        if self.current.is_none() {
            debug!("goto({position:.2}) ignored: nothing loaded");
            return;
        }
        self.transport.seek(position);
    }

    /// Set the volume, clamped to `[0, 1]`, and mirror it into the transport.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume = volume;
        self.transport.set_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Carried for the UI only; traversal order does not depend on it.
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn current_track(&self) -> Option<&QueuedTrack> {
        self.current.and_then(|i| self.queue.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn queue(&self) -> &[QueuedTrack] {
        self.queue.as_slice()
    }

    pub fn position(&self) -> f64 {
        self.transport.position()
    }

    pub fn duration(&self) -> f64 {
        self.transport.duration()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.playing()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Per-frame hook: lets the transport make progress and chains to
    /// `next` when a track ends on its own.
    pub fn tick(&mut self) {
        if self.transport.poll_ended() {
            debug!("track ended naturally, advancing");
            self.next();
        }
    }

    /// Stop playback for good (application exit).
    pub fn shutdown(&mut self) {
        self.transport.stop();
    }

    fn stop_at_end(&mut self) {
        debug!("queue: end reached, stopping");
        self.transport.stop();
        self.current = None;
    }

    fn load_current(&mut self) {
        let Some(index) = self.current else {
            return;
        };
        let Some(track) = self.queue.get(index) else {
            self.stop_at_end();
            return;
        };

        let url = self.endpoints.stream_url(track.id.as_deref());
        debug!("queue: loading #{index} {:?} from {url}", track.title);
        let options = LoadOptions {
            autoplay: true,
            format: track.format,
            initial_volume: self.volume,
            advance_on_end: true,
        };
        self.transport.load(&url, options);
    }
}
