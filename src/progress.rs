//! Progress bar, elapsed/total time and volume slider state.
//!
//! Nothing here owns playback; these types read from and write to the
//! `PlaylistController` on behalf of the player bar.

mod sampler;
mod scrubber;
mod time;
mod volume;

pub use sampler::{ProgressSampler, Sample};
pub use scrubber::Scrubber;
pub use time::{format_time, pointer_fraction, relative_progress};
pub use volume::{VolumeSlider, is_muted};
