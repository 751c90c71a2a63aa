/// Convenience result alias used throughout Tickreel.
pub type TickreelResult<T> = Result<T, TickreelError>;

/// Top-level error type for scheduling, rendering, and encoding.
#[derive(thiserror::Error, Debug)]
pub enum TickreelError {
    /// Invalid configuration or user-provided parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed animation script (unknown property, zero base dimension, non-finite value).
    #[error("animation error: {0}")]
    Animation(String),

    /// Missing or undecodable external asset.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// Frame persistence or encoder assembly failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Serialization/deserialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TickreelError {
    /// Build a [`TickreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TickreelError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`TickreelError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`TickreelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TickreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TickreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
