use std::time::{Duration, Instant};

use crate::audio::Transport;
use crate::playlist::PlaylistController;

use super::time::relative_progress;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: f64,
    pub duration: f64,
    pub progress: f64,
}

/// Per-frame reader of position and duration.
///
/// The view owns its sampler. Once cancelled (or dropped with the view)
/// it never reads the transport again and keeps returning its last
/// sample.
#[derive(Debug)]
pub struct ProgressSampler {
    interval: Duration,
    last_at: Option<Instant>,
    last: Sample,
    cancelled: bool,
}

impl ProgressSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_at: None,
            last: Sample::default(),
            cancelled: false,
        }
    }

    pub fn sample<T: Transport>(&mut self, controller: &PlaylistController<T>) -> Sample {
        self.sample_at(Instant::now(), controller)
    }

    /// Re-read the controller when a frame interval has passed since the
    /// previous read.
    pub fn sample_at<T: Transport>(&mut self, now: Instant, controller: &PlaylistController<T>) -> Sample {
        if self.cancelled {
            return self.last;
        }
        let due = self
            .last_at
            .is_none_or(|at| now.saturating_duration_since(at) >= self.interval);
        if due {
            let position = finite_or_zero(controller.position());
            let duration = finite_or_zero(controller.duration());
            self.last = Sample {
                position,
                duration,
                progress: relative_progress(position, duration),
            };
            self.last_at = Some(now);
        }
        self.last
    }

    pub fn last(&self) -> Sample {
        self.last
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
