//! Base-128 variable-length integers.
//!
//! Seven payload bits per byte, least-significant group first; the high bit
//! of each byte is set when another byte follows.

use crate::error::{Result, WireError};

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Encode `value` as a minimal varint into `buf`.
#[inline]
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Number of bytes [`encode_varint`] writes for `value`.
#[inline]
pub fn encoded_len_varint(value: u64) -> usize {
    // bits needed, rounded up to whole 7-bit groups; zero still takes a byte
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint from `buf` starting at `*pos`.
/// Advances `*pos` past the consumed bytes.
///
/// Bits of the tenth group above bit 63 are dropped; an eleventh group is an
/// [`WireError::Overflow`].
pub fn decode_varint(buf: &[u8], pos: &mut usize) -> Result<u64> {
    let start = *pos;
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        if shift >= 64 {
            return Err(WireError::Overflow { offset: start });
        }
        let Some(&byte) = buf.get(*pos) else {
            return Err(WireError::truncated(*pos));
        };
        *pos += 1;
        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

/// Wire form of a signed 32-bit value: sign-extended to 64 bits, so negative
/// values always take ten bytes.
#[inline]
pub fn int32_to_wire(value: i32) -> u64 {
    i64::from(value) as u64
}

/// Recover a signed 32-bit value from its wire form (low 32 bits).
#[inline]
pub fn int32_from_wire(value: u64) -> i32 {
    value as i32
}

// =============================================================================
// Tests
// =============================================================================
