//! Recording `Transport` used by unit tests across the crate.

use super::{LoadOptions, Transport};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String, LoadOptions),
    Stop,
    Seek(f64),
    Toggle,
    Volume(f32),
}

#[derive(Default)]
pub struct FakeTransport {
    pub calls: Vec<Call>,
    pub position: f64,
    pub duration: f64,
    pub playing: bool,
    pub ended: bool,
}

impl Transport for FakeTransport {
    fn load(&mut self, stream_url: &str, options: LoadOptions) {
        self.calls.push(Call::Load(stream_url.to_string(), options));
        self.playing = options.autoplay;
        self.position = 0.0;
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.push(Call::Seek(seconds));
        self.position = seconds;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn toggle_play_pause(&mut self) {
        self.calls.push(Call::Toggle);
        self.playing = !self.playing;
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::Volume(volume));
    }

    fn playing(&self) -> bool {
        self.playing
    }

    fn poll_ended(&mut self) -> bool {
        std::mem::take(&mut self.ended)
    }
}
