//! Audio transport.
//!
//! `types` defines the `Transport` contract the playlist controller drives.
//! `RodioTransport` implements it on a `rodio` output stream: stream bytes
//! are downloaded on a worker thread (`fetch`), decoded into a sink
//! (`sink`) and polled for completion once per frame.

mod fetch;
mod player;
mod sink;
mod types;

pub use player::RodioTransport;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(test)]
mod tests;
