//! Data-driven record codecs.
//!
//! A record schema is an ordered table of [`Field`] rows, each a field number
//! plus the three functions that size, write and merge that field. Marshal,
//! SizeOf and Unmarshal are generic over the table, so the three record kinds
//! share the framing code without sharing a type hierarchy.
//!
//! Decoding zero-initializes the record, then scans tag by tag until the input
//! is exhausted: known field numbers dispatch to their row, unknown ones are
//! skipped. Fields absent from the wire keep their zero value.

use crate::config::{DecodeConfig, EncodeConfig};
use crate::error::{CodecError, Result};
use tensor_codec_wire::{Tag, WireError, WireKind, WireReader};

/// Stable field numbers. Never renumber; only append.
pub mod field_number {
    pub const SHAPE: u32 = 1;
    pub const STRIDES: u32 = 2;
    pub const ORDER: u32 = 3;
    pub const TRIANGLE: u32 = 4;
    pub const TYPE_TAG: u32 = 5;
    pub const DATA: u32 = 6;
    pub const MASK: u32 = 7;
    pub const MASK_IS_SOFT: u32 = 8;
}

/// Sizes one field of `M`; zero when the field is omitted.
pub type LenFn<M> = fn(&M, &EncodeConfig) -> usize;
/// Writes one field of `M`; writes nothing when the field is omitted.
pub type EncodeFn<M> = fn(&M, &EncodeConfig, &mut Vec<u8>);
/// Folds one occurrence of a field (its tag already read) into `M`.
pub type MergeFn<M> = fn(&mut M, Tag, &mut WireReader<'_>) -> tensor_codec_wire::Result<()>;

/// One row of a record's field table.
pub struct Field<M> {
    pub number: u32,
    pub name: &'static str,
    pub encoded_len: LenFn<M>,
    pub encode: EncodeFn<M>,
    pub merge: MergeFn<M>,
}

impl<M> std::fmt::Debug for Field<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("number", &self.number)
            .field("name", &self.name)
            .finish()
    }
}

/// A record with a field table.
///
/// `FIELDS` must be sorted by ascending field number with no duplicates;
/// that order is the write order.
pub trait Message: Default + Sized + 'static {
    /// Record name used in logs.
    const NAME: &'static str;
    /// The schema.
    const FIELDS: &'static [Field<Self>];

    /// SizeOf with default settings.
    fn encoded_len(&self) -> usize {
        encoded_len_with(self, &EncodeConfig::default())
    }

    /// Marshal with default settings.
    fn encode(&self) -> Vec<u8> {
        encode_with(self, &EncodeConfig::default())
    }

    /// Append the encoding to `buf`.
    fn encode_to(&self, buf: &mut Vec<u8>) {
        let config = EncodeConfig::default();
        buf.reserve(encoded_len_with(self, &config));
        encode_to_with(self, &config, buf);
    }

    /// Unmarshal with default limits.
    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_with(bytes, &DecodeConfig::default())
    }

    /// Fold `bytes` into `self`: repeated fields append, everything else is
    /// overwritten by the last occurrence.
    fn merge(&mut self, bytes: &[u8]) -> Result<()> {
        merge_with(self, bytes, &DecodeConfig::default())
    }
}

// =============================================================================
// Generic drivers
// =============================================================================

/// Sum of every present field's encoded size.
pub fn encoded_len_with<M: Message>(msg: &M, config: &EncodeConfig) -> usize {
    M::FIELDS
        .iter()
        .map(|field| (field.encoded_len)(msg, config))
        .sum()
}

/// Append every present field to `buf` in ascending field-number order.
pub fn encode_to_with<M: Message>(msg: &M, config: &EncodeConfig, buf: &mut Vec<u8>) {
    for field in M::FIELDS {
        (field.encode)(msg, config, buf);
    }
}

/// Encode into a buffer allocated to exactly the computed size.
pub fn encode_with<M: Message>(msg: &M, config: &EncodeConfig) -> Vec<u8> {
    let size = encoded_len_with(msg, config);
    let mut buf = Vec::with_capacity(size);
    encode_to_with(msg, config, &mut buf);
    debug_assert_eq!(buf.len(), size, "{} size mismatch", M::NAME);
    buf
}

/// Reset-then-merge.
pub fn decode_with<M: Message>(bytes: &[u8], config: &DecodeConfig) -> Result<M> {
    let mut msg = M::default();
    merge_with(&mut msg, bytes, config)?;
    Ok(msg)
}

/// Scan `bytes` tag by tag, folding known fields into `msg`.
pub fn merge_with<M: Message>(msg: &mut M, bytes: &[u8], config: &DecodeConfig) -> Result<()> {
    if let Some(max) = config.max_message_bytes {
        if bytes.len() > max {
            return Err(CodecError::MessageTooLarge {
                len: bytes.len(),
                max,
            });
        }
    }

    let mut reader = WireReader::new(bytes).with_max_group_depth(config.max_group_depth);
    while reader.has_remaining() {
        let offset = reader.position();
        let tag = reader.read_tag()?;
        if tag.wire_kind == WireKind::EndGroup {
            return Err(WireError::MalformedTag {
                offset,
                key: tag.key(),
            }
            .into());
        }
        match find_field(M::FIELDS, tag.field_number) {
            Some(field) => (field.merge)(msg, tag, &mut reader)?,
            None => {
                reader.skip_field(tag)?;
            }
        }
    }
    Ok(())
}

fn find_field<M>(fields: &'static [Field<M>], number: u32) -> Option<&'static Field<M>> {
    fields
        .binary_search_by_key(&number, |field| field.number)
        .ok()
        .map(|idx| &fields[idx])
}

// =============================================================================
// Field handler helpers
// =============================================================================

/// Fail unless `tag` carries the wire kind a handler expects.
pub(crate) fn expect_kind(tag: Tag, kind: WireKind) -> tensor_codec_wire::Result<()> {
    if tag.wire_kind == kind {
        Ok(())
    } else {
        Err(WireError::unsupported(
            tag.field_number,
            tag.wire_kind.as_raw(),
        ))
    }
}

#[cfg(test)]
pub(crate) fn assert_table_sorted<M: Message>() {
    let numbers: Vec<u32> = M::FIELDS.iter().map(|f| f.number).collect();
    assert!(
        numbers.windows(2).all(|w| w[0] < w[1]),
        "{} field table out of order: {:?}",
        M::NAME,
        numbers
    );
}
