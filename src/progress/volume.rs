use crate::audio::Transport;
use crate::playlist::PlaylistController;

/// Below this the volume icon shows as muted.
const MUTE_THRESHOLD: f32 = 0.01;

pub fn is_muted(volume: f32) -> bool {
    volume < MUTE_THRESHOLD
}

/// Volume bar interaction. Unlike the progress bar there is no deferred
/// commit: every press and drag sets the volume immediately.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSlider {
    dragging: bool,
}

impl VolumeSlider {
    pub fn press<T: Transport>(&mut self, fraction: f64, controller: &mut PlaylistController<T>) {
        self.dragging = true;
        controller.set_volume(fraction as f32);
    }

    pub fn drag<T: Transport>(&mut self, fraction: f64, controller: &mut PlaylistController<T>) {
        if self.dragging {
            controller.set_volume(fraction as f32);
        }
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
