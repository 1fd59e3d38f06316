//! Audio output.
//!
//! The controller only talks to the `AudioBackend` trait; `RodioBackend` is the
//! production implementation on top of `rodio`.

mod backend;
mod rodio_backend;
mod sink;
mod types;

pub use backend::{AudioBackend, AudioError};
pub use rodio_backend::RodioBackend;
pub use types::{BackendEvent, TransportState};

#[cfg(test)]
mod tests;
