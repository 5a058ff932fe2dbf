/// Result alias used across the shadow pipeline.
pub type ShadowResult<T> = Result<T, ShadowError>;

/// Errors raised by the shadow pipeline.
///
/// None of these are fatal to a [`crate::ShadowRenderer`]: the renderer logs them and skips the
/// current draw. They surface directly only from the lower-level building blocks
/// ([`crate::BufferCache`], [`crate::BlurBackend`], [`crate::ShadowConfig`]).
#[derive(thiserror::Error, Debug)]
pub enum ShadowError {
    /// The blur capability cannot be created for the current device.
    #[error("blur backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A pixel buffer could not be (re)allocated.
    #[error("allocation failure: {0}")]
    AllocationFailure(String),

    /// The source view or the bounds have an empty extent.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// The blur backend rejected its input.
    #[error("blur error: {0}")]
    Blur(String),

    /// Configuration could not be parsed or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShadowError {
    /// Build a [`ShadowError::BackendUnavailable`].
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Build a [`ShadowError::AllocationFailure`].
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::AllocationFailure(msg.into())
    }

    /// Build a [`ShadowError::InvalidBounds`].
    pub fn invalid_bounds(msg: impl Into<String>) -> Self {
        Self::InvalidBounds(msg.into())
    }

    /// Build a [`ShadowError::Blur`].
    pub fn blur(msg: impl Into<String>) -> Self {
        Self::Blur(msg.into())
    }

    /// Build a [`ShadowError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
