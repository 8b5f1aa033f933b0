//! Play queue and the controller that drives the shared transport.
//!
//! The queue itself lives in `playlist::model`; `playlist::controller`
//! owns the current index, repeat/shuffle state and volume, and turns
//! next/back/toggle/goto requests into transport calls.

mod controller;
mod model;

pub use controller::*;
pub use model::*;
