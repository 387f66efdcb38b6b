//! Bounds-checked cursor over encoded bytes.
//!
//! All reads borrow from the input slice; length-delimited bodies are returned
//! as sub-slices without copying. The cursor only moves forward.

use crate::error::{Result, WireError};
use crate::frame::{Tag, WireKind};
use crate::varint::decode_varint;

/// Default limit on nested unknown groups while skipping.
pub const DEFAULT_MAX_GROUP_DEPTH: u32 = 32;

/// Hard ceiling on group nesting. Skipping recurses once per level, so larger
/// limits are clamped to this.
pub const MAX_GROUP_DEPTH_LIMIT: u32 = 100;

/// Forward-only reader over a wire buffer.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Absolute offset of `buf[0]` in the outermost input, for error offsets.
    base: usize,
    max_group_depth: u32,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            base: 0,
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
        }
    }

    /// Set the nesting limit applied by [`skip_field`](Self::skip_field),
    /// clamped to [`MAX_GROUP_DEPTH_LIMIT`].
    pub fn with_max_group_depth(mut self, depth: u32) -> Self {
        self.max_group_depth = depth.min(MAX_GROUP_DEPTH_LIMIT);
        self
    }

    /// A reader over a length-delimited body. Offsets in errors stay absolute.
    pub fn sub_reader(&self, body: &'a [u8], body_start: usize) -> WireReader<'a> {
        WireReader {
            buf: body,
            pos: 0,
            base: body_start,
            max_group_depth: self.max_group_depth,
        }
    }

    /// Absolute offset of the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        decode_varint(self.buf, &mut self.pos).map_err(|e| self.rebase(e))
    }

    /// Read and validate a tag.
    ///
    /// End-group tags are returned as-is: rejecting them where no group is
    /// open is the caller's decision.
    pub fn read_tag(&mut self) -> Result<Tag> {
        let offset = self.position();
        let key = self.read_varint()?;
        Tag::from_key(key).ok_or(WireError::MalformedTag { offset, key })
    }

    /// Read a varint length prefix and borrow that many bytes.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        let start = self.pos;
        let len = usize::try_from(len).map_err(|_| WireError::truncated(self.base + start))?;
        if len > self.remaining() {
            return Err(WireError::truncated(self.base + start));
        }
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    /// Like [`read_length_delimited`](Self::read_length_delimited), returning
    /// the body's absolute start offset as well.
    pub fn read_length_delimited_at(&mut self) -> Result<(&'a [u8], usize)> {
        let len_offset = self.position();
        let body = self.read_length_delimited()?;
        let body_start = self.position() - body.len();
        debug_assert!(body_start > len_offset);
        Ok((body, body_start))
    }

    /// Borrow exactly `n` raw bytes.
    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(WireError::truncated(self.position()));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..self.pos])
    }

    /// Discard the value of a field whose tag was just read.
    ///
    /// Groups are skipped by scanning their nested fields up to the matching
    /// end marker. Returns the number of value bytes skipped.
    pub fn skip_field(&mut self, tag: Tag) -> Result<usize> {
        let start = self.pos;
        self.skip_value(tag, 0)?;
        let skipped = self.pos - start;
        tracing::trace!(
            field_number = tag.field_number,
            wire_kind = tag.wire_kind.as_raw(),
            skipped,
            offset = self.base + start,
            "unknown field skipped"
        );
        Ok(skipped)
    }

    fn skip_value(&mut self, tag: Tag, depth: u32) -> Result<()> {
        match tag.wire_kind {
            WireKind::Varint => {
                self.read_varint()?;
            }
            WireKind::Fixed64 => {
                self.read_fixed(8)?;
            }
            WireKind::LengthDelimited => {
                self.read_length_delimited()?;
            }
            WireKind::Fixed32 => {
                self.read_fixed(4)?;
            }
            WireKind::StartGroup => {
                if depth >= self.max_group_depth {
                    return Err(WireError::GroupDepthExceeded {
                        max_depth: self.max_group_depth,
                    });
                }
                loop {
                    let offset = self.position();
                    let inner = self.read_tag()?;
                    if inner.wire_kind == WireKind::EndGroup {
                        if inner.field_number != tag.field_number {
                            return Err(WireError::MalformedTag {
                                offset,
                                key: inner.key(),
                            });
                        }
                        break;
                    }
                    self.skip_value(inner, depth + 1)?;
                }
            }
            WireKind::EndGroup => {
                return Err(WireError::MalformedTag {
                    offset: self.position(),
                    key: tag.key(),
                });
            }
        }
        Ok(())
    }

    fn rebase(&self, err: WireError) -> WireError {
        match err {
            WireError::Truncated { offset } => WireError::Truncated {
                offset: self.base + offset,
            },
            WireError::Overflow { offset } => WireError::Overflow {
                offset: self.base + offset,
            },
            other => other,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
