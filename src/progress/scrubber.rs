use crate::audio::Transport;
use crate::playlist::PlaylistController;

/// Drag-to-seek state for the progress bar.
///
/// While the pointer is held the displayed progress follows the pointer
/// and the live position is ignored; the seek is committed on release.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Scrubber {
    dragging: Option<f64>,
}

impl Scrubber {
    pub fn press(&mut self, fraction: f64) {
        self.dragging = Some(fraction.clamp(0.0, 1.0));
    }

    /// Pointer moved; ignored unless a press is in progress.
    pub fn drag(&mut self, fraction: f64) {
        if self.dragging.is_some() {
            self.dragging = Some(fraction.clamp(0.0, 1.0));
        }
    }

    /// Commit the drag with `goto(fraction * duration)`.
    pub fn release<T: Transport>(&mut self, controller: &mut PlaylistController<T>) {
        if let Some(fraction) = self.dragging.take() {
            controller.goto(fraction * controller.duration());
        }
    }

    pub fn cancel(&mut self) {
        self.dragging = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Progress to draw: the pointer while dragging, else `live`.
    pub fn displayed(&self, live: f64) -> f64 {
        self.dragging.unwrap_or(live)
    }
}
