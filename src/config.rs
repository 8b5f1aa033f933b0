//! Layered settings: environment, optional TOML file, struct defaults.
//!
//! `schema` holds the serde types; `load` resolves paths and merges the
//! sources with the `config` crate.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
