//! Application module: exposes the UI-layer model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds view state only: which
//! screen is shown, the folder picker and search cursors, presentation
//! toggles and the last advisory message. Playback state belongs to the
//! controller.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
