use thiserror::Error;

/// Errors surfaced by the synthesis core and the platform collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Precondition violation: empty palette, non-positive rate/duration/channels,
    /// malformed interval pattern. Nothing is produced.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Window/terminal or audio device failure. Fatal for the run.
    #[error("platform failure: {0}")]
    PlatformFailure(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn platform(context: &str, err: impl std::fmt::Display) -> Self {
        Self::PlatformFailure(format!("{context}: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
