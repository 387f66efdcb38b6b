//! Error types for tensor-codec

use tensor_codec_wire::WireError;
use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised while decoding records or checking their layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Malformed or truncated wire bytes
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Input exceeds the configured `max_message_bytes`
    #[error("message of {len} bytes exceeds configured limit of {max} bytes")]
    MessageTooLarge { len: usize, max: usize },

    /// Shape/strides/mask relationship does not hold
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

impl CodecError {
    /// Create an invalid layout error
    pub fn invalid_layout(msg: impl Into<String>) -> Self {
        Self::InvalidLayout(msg.into())
    }

    /// The underlying wire error, if any
    pub fn as_wire(&self) -> Option<&WireError> {
        match self {
            Self::Wire(e) => Some(e),
            _ => None,
        }
    }
}
