//! REST collaborator for the Astral music server.
//!
//! `BackendClient` handles the token dance (login, periodic verification,
//! refresh-on-401) and exposes a handful of typed helpers on top of plain
//! `get`/`post` calls. It is shared between the UI thread and the worker
//! threads as an `Arc<BackendClient>`.

mod auth;
mod client;
mod endpoints;
mod error;
mod model;

pub use auth::TokenStore;
pub use client::{BackendClient, ClientOptions};
pub use endpoints::Endpoints;
pub use error::BackendError;
pub use model::{AlbumListing, AlbumMetadata, IndexedAlbum, IndexedArtist, IndexedTrack};
