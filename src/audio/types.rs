//! Small types shared between the audio backend and its consumers.

/// What the output is doing with the current session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportState {
    /// No session, or the session drained / was stopped.
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Notifications emitted by a backend from its own execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The active session ended on its own. `error` is set when it ended
    /// because output or decoding failed mid-track.
    Finished { error: Option<String> },
}
