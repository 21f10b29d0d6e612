/// Convenience result type used across sketchmask.
pub type SketchResult<T> = Result<T, SketchError>;

/// Top-level error taxonomy used by the analysis, codec and request APIs.
#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    /// Invalid caller-provided data (dimensions, buffers, options, data URLs, prompts).
    #[error("validation error: {0}")]
    Validation(String),

    /// A scratch drawing surface could not be allocated.
    #[error("context unavailable: {0}")]
    ContextUnavailable(String),

    /// Lossless serialization produced no payload.
    #[error("encoding failure: {0}")]
    Encoding(String),

    /// An attached image is over the transport ceiling.
    #[error("size limit exceeded: {label} is ~{bytes} bytes (limit {limit} bytes)")]
    SizeLimitExceeded {
        /// Which attachment tripped the limit (`"base image"`, `"mask"`).
        label: String,
        /// Estimated decoded payload size.
        bytes: u64,
        /// The ceiling that was exceeded.
        limit: u64,
    },

    /// An edit request was prepared without any selected pixels.
    #[error("empty selection: {0}")]
    EmptySelection(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SketchError {
    /// Build a [`SketchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SketchError::ContextUnavailable`] value.
    pub fn context_unavailable(msg: impl Into<String>) -> Self {
        Self::ContextUnavailable(msg.into())
    }

    /// Build a [`SketchError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`SketchError::EmptySelection`] value.
    pub fn empty_selection(msg: impl Into<String>) -> Self {
        Self::EmptySelection(msg.into())
    }

    /// Build a [`SketchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
