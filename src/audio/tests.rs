use crate::playlist::TrackFormat;

use super::fetch::LoadTracker;
use super::sink::decode;
use super::{LoadOptions, TransportError};

fn options(autoplay: bool) -> LoadOptions {
    LoadOptions {
        autoplay,
        format: TrackFormat::Mp3,
        initial_volume: 0.5,
        advance_on_end: true,
    }
}

#[test]
fn newer_load_supersedes_pending_one() {
    let mut loads = LoadTracker::default();
    let first = loads.begin(options(true));
    let second = loads.begin(options(false));

    assert_eq!(loads.accept(first), None);
    assert_eq!(loads.accept(second), Some(options(false)));
    // Accepted once only.
    assert_eq!(loads.accept(second), None);
}

#[test]
fn stop_cancels_pending_load() {
    let mut loads = LoadTracker::default();
    let generation = loads.begin(options(true));
    assert!(loads.will_autoplay());

    loads.cancel();
    assert!(!loads.will_autoplay());
    assert_eq!(loads.accept(generation), None);
}

#[test]
fn toggling_before_ready_flips_autoplay() {
    let mut loads = LoadTracker::default();
    let generation = loads.begin(options(true));
    if let Some(pending) = loads.pending_mut() {
        pending.autoplay = !pending.autoplay;
    }
    assert!(!loads.will_autoplay());
    assert_eq!(loads.accept(generation).map(|o| o.autoplay), Some(false));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let result = decode(b"definitely not audio".to_vec(), TrackFormat::Flac);
    match result {
        Err(TransportError::Decode { format, .. }) => assert_eq!(format, TrackFormat::Flac),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("garbage decoded"),
    }
}
