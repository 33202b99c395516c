/// Convenience result type used across Segue.
pub type SegueResult<T> = Result<T, SegueError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`SegueError::Input`] is expected during normal batch work: it fails a single shot and
/// the sequence pipeline records it instead of aborting. Empty inputs and "nothing detected"
/// outcomes are not errors and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum SegueError {
    /// Unreadable, missing or corrupt shot input.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid user-provided configuration or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised while running an analyzer (thread pool setup, internal invariants).
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SegueError {
    /// Build a [`SegueError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`SegueError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SegueError::Analysis`] value.
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Build a [`SegueError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error only invalidates one shot or pair of a batch.
    pub fn is_per_unit(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Fresh copy with the same variant and message. `Other` keeps the rendered source chain.
    pub(crate) fn replay(&self) -> Self {
        match self {
            Self::Input(m) => Self::Input(m.clone()),
            Self::Validation(m) => Self::Validation(m.clone()),
            Self::Analysis(m) => Self::Analysis(m.clone()),
            Self::Serde(m) => Self::Serde(m.clone()),
            Self::Other(e) => Self::Other(anyhow::anyhow!("{e:#}")),
        }
    }
}

impl From<serde_json::Error> for SegueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
