//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds search results,
//! selection, prompt and pane focus state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
