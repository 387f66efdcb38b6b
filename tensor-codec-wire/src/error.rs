//! Error types for the tensor wire format.

use thiserror::Error;

/// Result type for wire-level operations
pub type Result<T> = std::result::Result<T, WireError>;

/// Failures raised while decoding wire bytes.
///
/// Every variant is fatal to the decode call that produced it. There is no
/// partial record recovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Input ended mid-field: an unterminated varint, or a length-delimited
    /// body (or fixed-width value) longer than the remaining bytes.
    #[error("wire: truncated input at offset {offset}")]
    Truncated { offset: usize },

    /// A varint ran past ten groups.
    #[error("wire: varint overflow at offset {offset}")]
    Overflow { offset: usize },

    /// Reserved wire kind, zero or out-of-range field number, or an end-group
    /// marker that does not close the open group.
    #[error("wire: malformed tag 0x{key:x} at offset {offset}")]
    MalformedTag { offset: usize, key: u64 },

    /// A known field arrived with a wire kind its handler cannot interpret.
    #[error("wire: unsupported wire kind {wire_kind} for field {field_number}")]
    UnsupportedWireKind { field_number: u32, wire_kind: u8 },

    /// Unknown groups nested deeper than the configured limit.
    #[error("wire: group nesting exceeds {max_depth} levels")]
    GroupDepthExceeded { max_depth: u32 },

    /// A string field did not hold valid UTF-8.
    #[error("wire: invalid UTF-8 in field {field_number}")]
    InvalidUtf8 { field_number: u32 },
}

impl WireError {
    /// Create a truncation error at `offset`
    pub fn truncated(offset: usize) -> Self {
        Self::Truncated { offset }
    }

    /// Create an unsupported-wire-kind error
    pub fn unsupported(field_number: u32, wire_kind: u8) -> Self {
        Self::UnsupportedWireKind {
            field_number,
            wire_kind,
        }
    }

    /// Whether the input simply ran out, as opposed to being corrupt.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
