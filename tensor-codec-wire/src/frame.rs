//! Field framing: tags, wire kinds and the writer-side helpers.
//!
//! Every field on the wire is
//!
//! ```text
//! entry := tag value
//! tag   := varint((field_number << 3) | wire_kind)
//! value := varint                      (wire kind 0)
//!        | varint(len) + len raw bytes (wire kind 2)
//! ```
//!
//! Fixed-width kinds (1, 5) and groups (3, 4) are never written by this
//! format but are recognized so that fields produced by other encoders can be
//! skipped.

use crate::varint::{encode_varint, encoded_len_varint};

/// Largest legal field number (29 bits).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// How a field's value is framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireKind {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireKind {
    /// Parse the low three bits of a tag. Values 6 and 7 are not wire kinds.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            3 => Some(Self::StartGroup),
            4 => Some(Self::EndGroup),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        self as u8
    }
}

/// A decoded or to-be-encoded field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub field_number: u32,
    pub wire_kind: WireKind,
}

impl Tag {
    pub const fn new(field_number: u32, wire_kind: WireKind) -> Self {
        Self {
            field_number,
            wire_kind,
        }
    }

    /// The combined varint value `(field_number << 3) | wire_kind`.
    #[inline]
    pub fn key(self) -> u64 {
        (u64::from(self.field_number) << 3) | u64::from(self.wire_kind.as_raw())
    }

    /// Split a raw key. Returns `None` for anything that is not a legal tag:
    /// a key wider than 32 bits, field number zero or above
    /// [`MAX_FIELD_NUMBER`], or wire kind 6/7.
    pub fn from_key(key: u64) -> Option<Self> {
        let key = u32::try_from(key).ok()?;
        let field_number = key >> 3;
        if field_number == 0 || field_number > MAX_FIELD_NUMBER {
            return None;
        }
        let wire_kind = WireKind::from_raw((key & 0x7) as u8)?;
        Some(Self::new(field_number, wire_kind))
    }

    #[inline]
    pub fn encode(self, buf: &mut Vec<u8>) {
        encode_varint(self.key(), buf);
    }

    #[inline]
    pub fn encoded_len(self) -> usize {
        encoded_len_varint(self.key())
    }
}

// =============================================================================
// Writer helpers
// =============================================================================

/// Write a varint-kind field.
#[inline]
pub fn encode_varint_field(field_number: u32, value: u64, buf: &mut Vec<u8>) {
    Tag::new(field_number, WireKind::Varint).encode(buf);
    encode_varint(value, buf);
}

/// Encoded size of a varint-kind field.
#[inline]
pub fn varint_field_len(field_number: u32, value: u64) -> usize {
    Tag::new(field_number, WireKind::Varint).encoded_len() + encoded_len_varint(value)
}

/// Write a length-delimited field holding `body`.
#[inline]
pub fn encode_length_delimited_field(field_number: u32, body: &[u8], buf: &mut Vec<u8>) {
    encode_length_delimited_header(field_number, body.len(), buf);
    buf.extend_from_slice(body);
}

/// Write the tag and length prefix of a length-delimited field whose body the
/// caller appends next.
#[inline]
pub fn encode_length_delimited_header(field_number: u32, body_len: usize, buf: &mut Vec<u8>) {
    Tag::new(field_number, WireKind::LengthDelimited).encode(buf);
    encode_varint(body_len as u64, buf);
}

/// Encoded size of a length-delimited field with a `body_len`-byte body.
#[inline]
pub fn length_delimited_field_len(field_number: u32, body_len: usize) -> usize {
    Tag::new(field_number, WireKind::LengthDelimited).encoded_len()
        + encoded_len_varint(body_len as u64)
        + body_len
}

// =============================================================================
// Tests
// =============================================================================
