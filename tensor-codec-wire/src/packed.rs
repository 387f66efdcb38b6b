//! Repeated scalar fields: packed and expanded forms.
//!
//! A repeated field may arrive as N `(tag, varint)` pairs sharing a field
//! number, as one length-delimited body of back-to-back varints, or as any mix
//! of the two. Readers accept all of these and append in wire order; the
//! writer form is chosen by [`RepeatedEncoding`].

use crate::error::{Result, WireError};
use crate::frame::{
    encode_length_delimited_header, encode_varint_field, length_delimited_field_len,
    varint_field_len, Tag, WireKind,
};
use crate::reader::WireReader;
use crate::varint::{encode_varint, encoded_len_varint, int32_from_wire, int32_to_wire};
use serde::{Deserialize, Serialize};

/// Writer policy for repeated scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatedEncoding {
    /// One length-delimited body per field.
    #[default]
    Packed,
    /// One tagged varint per element.
    Expanded,
}

// =============================================================================
// int32
// =============================================================================

/// Body length of a packed int32 run.
pub fn packed_int32_body_len(values: &[i32]) -> usize {
    values
        .iter()
        .map(|&v| encoded_len_varint(int32_to_wire(v)))
        .sum()
}

/// Encoded size of a repeated int32 field; zero when `values` is empty.
pub fn repeated_int32_len(field_number: u32, values: &[i32], encoding: RepeatedEncoding) -> usize {
    if values.is_empty() {
        return 0;
    }
    match encoding {
        RepeatedEncoding::Packed => {
            length_delimited_field_len(field_number, packed_int32_body_len(values))
        }
        RepeatedEncoding::Expanded => values
            .iter()
            .map(|&v| varint_field_len(field_number, int32_to_wire(v)))
            .sum(),
    }
}

/// Write a repeated int32 field. Nothing is written for an empty slice.
pub fn encode_repeated_int32(
    field_number: u32,
    values: &[i32],
    encoding: RepeatedEncoding,
    buf: &mut Vec<u8>,
) {
    if values.is_empty() {
        return;
    }
    match encoding {
        RepeatedEncoding::Packed => {
            encode_length_delimited_header(field_number, packed_int32_body_len(values), buf);
            for &v in values {
                encode_varint(int32_to_wire(v), buf);
            }
        }
        RepeatedEncoding::Expanded => {
            for &v in values {
                encode_varint_field(field_number, int32_to_wire(v), buf);
            }
        }
    }
}

/// Append the value(s) of one occurrence of a repeated int32 field.
pub fn merge_repeated_int32(tag: Tag, reader: &mut WireReader<'_>, out: &mut Vec<i32>) -> Result<()> {
    merge_repeated(tag, reader, |v| out.push(int32_from_wire(v)))
}

// =============================================================================
// bool
// =============================================================================

/// Encoded size of a repeated bool field; zero when `values` is empty.
pub fn repeated_bool_len(field_number: u32, values: &[bool], encoding: RepeatedEncoding) -> usize {
    if values.is_empty() {
        return 0;
    }
    match encoding {
        // every element is a one-byte varint
        RepeatedEncoding::Packed => length_delimited_field_len(field_number, values.len()),
        RepeatedEncoding::Expanded => values.len() * varint_field_len(field_number, 0),
    }
}

/// Write a repeated bool field, one byte (0x00 / 0x01) per element.
pub fn encode_repeated_bool(
    field_number: u32,
    values: &[bool],
    encoding: RepeatedEncoding,
    buf: &mut Vec<u8>,
) {
    if values.is_empty() {
        return;
    }
    match encoding {
        RepeatedEncoding::Packed => {
            encode_length_delimited_header(field_number, values.len(), buf);
            buf.extend(values.iter().map(|&b| u8::from(b)));
        }
        RepeatedEncoding::Expanded => {
            for &b in values {
                encode_varint_field(field_number, u64::from(b), buf);
            }
        }
    }
}

/// Append the value(s) of one occurrence of a repeated bool field. Any
/// non-zero varint reads as `true`.
pub fn merge_repeated_bool(tag: Tag, reader: &mut WireReader<'_>, out: &mut Vec<bool>) -> Result<()> {
    merge_repeated(tag, reader, |v| out.push(v != 0))
}

fn merge_repeated(
    tag: Tag,
    reader: &mut WireReader<'_>,
    mut push: impl FnMut(u64),
) -> Result<()> {
    match tag.wire_kind {
        WireKind::Varint => {
            push(reader.read_varint()?);
            Ok(())
        }
        WireKind::LengthDelimited => {
            let (body, body_start) = reader.read_length_delimited_at()?;
            let mut packed = reader.sub_reader(body, body_start);
            while packed.has_remaining() {
                push(packed.read_varint()?);
            }
            Ok(())
        }
        other => Err(WireError::unsupported(tag.field_number, other.as_raw())),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all_int32(buf: &[u8]) -> Result<Vec<i32>> {
        let mut r = WireReader::new(buf);
        let mut out = Vec::new();
        while r.has_remaining() {
            let tag = r.read_tag()?;
            merge_repeated_int32(tag, &mut r, &mut out)?;
        }
        Ok(out)
    }

    #[test]
    fn test_packed_int32_bytes() {
        let mut buf = Vec::new();
        encode_repeated_int32(1, &[2, 3], RepeatedEncoding::Packed, &mut buf);
        assert_eq!(buf, [0x0A, 0x02, 0x02, 0x03]);
        assert_eq!(buf.len(), repeated_int32_len(1, &[2, 3], RepeatedEncoding::Packed));
    }

    #[test]
    fn test_expanded_int32_bytes() {
        let mut buf = Vec::new();
        encode_repeated_int32(1, &[2, 3], RepeatedEncoding::Expanded, &mut buf);
        assert_eq!(buf, [0x08, 0x02, 0x08, 0x03]);
        assert_eq!(buf.len(), repeated_int32_len(1, &[2, 3], RepeatedEncoding::Expanded));
    }

    #[test]
    fn test_both_forms_decode_identically() {
        let packed = [0x0A, 0x02, 0x02, 0x03];
        let expanded = [0x08, 0x02, 0x08, 0x03];
        assert_eq!(decode_all_int32(&packed).unwrap(), vec![2, 3]);
        assert_eq!(decode_all_int32(&expanded).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_mixed_forms_append_in_order() {
        let buf = [0x08, 0x07, 0x0A, 0x02, 0x02, 0x03, 0x08, 0x09];
        assert_eq!(decode_all_int32(&buf).unwrap(), vec![7, 2, 3, 9]);
    }

    #[test]
    fn test_negative_int32_takes_ten_bytes() {
        let mut buf = Vec::new();
        encode_repeated_int32(2, &[-1], RepeatedEncoding::Packed, &mut buf);
        assert_eq!(buf.len(), 1 + 1 + 10);
        assert_eq!(decode_all_int32(&buf).unwrap(), vec![-1]);
    }

    #[test]
    fn test_packed_body_overrun_is_truncated() {
        // declared body of 1 byte holds the start of a two-byte varint
        let buf = [0x0A, 0x01, 0x80, 0x01];
        assert_eq!(
            decode_all_int32(&buf),
            Err(WireError::Truncated { offset: 3 })
        );
    }

    #[test]
    fn test_wrong_wire_kind_rejected() {
        let mut buf = Vec::new();
        Tag::new(1, WireKind::Fixed32).encode(&mut buf);
        buf.extend_from_slice(&[0; 4]);
        assert_eq!(
            decode_all_int32(&buf),
            Err(WireError::UnsupportedWireKind {
                field_number: 1,
                wire_kind: 5
            })
        );
    }

    #[test]
    fn test_empty_writes_nothing() {
        let mut buf = Vec::new();
        encode_repeated_int32(1, &[], RepeatedEncoding::Packed, &mut buf);
        encode_repeated_bool(7, &[], RepeatedEncoding::Expanded, &mut buf);
        assert!(buf.is_empty());
        assert_eq!(repeated_bool_len(7, &[], RepeatedEncoding::Packed), 0);
    }

    #[test]
    fn test_bool_packed_one_byte_each() {
        let values = [true, false, true];
        let mut buf = Vec::new();
        encode_repeated_bool(7, &values, RepeatedEncoding::Packed, &mut buf);
        assert_eq!(buf, [0x3A, 0x03, 0x01, 0x00, 0x01]);
        assert_eq!(buf.len(), repeated_bool_len(7, &values, RepeatedEncoding::Packed));
    }

    #[test]
    fn test_bool_expanded_and_nonzero_is_true() {
        let values = [true, false];
        let mut buf = Vec::new();
        encode_repeated_bool(8, &values, RepeatedEncoding::Expanded, &mut buf);
        assert_eq!(buf, [0x40, 0x01, 0x40, 0x00]);
        assert_eq!(buf.len(), repeated_bool_len(8, &values, RepeatedEncoding::Expanded));

        // a packed body carrying a multi-byte varint still yields one element
        let odd = [0x42, 0x02, 0x81, 0x01];
        let mut r = WireReader::new(&odd);
        let tag = r.read_tag().unwrap();
        let mut out = Vec::new();
        merge_repeated_bool(tag, &mut r, &mut out).unwrap();
        assert_eq!(out, vec![true]);
    }
}
