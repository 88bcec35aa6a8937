/// Convenience result type used across the engine.
pub type ConstellationResult<T> = Result<T, ConstellationError>;

/// Top-level error taxonomy for fallible loading and planning paths.
///
/// Transition entry points never surface these to their caller; they log and carry on.
#[derive(thiserror::Error, Debug)]
pub enum ConstellationError {
    /// Invalid snapshot or chapter data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while ordering or building a transition timeline.
    #[error("schedule error: {0}")]
    Schedule(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConstellationError {
    /// Build a [`ConstellationError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ConstellationError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ConstellationError::Schedule`] value.
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::Schedule(msg.into())
    }

    /// Build a [`ConstellationError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ConstellationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
