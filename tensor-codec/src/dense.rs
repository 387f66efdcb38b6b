//! Dense tensors: array parameters plus an element-type tag and raw bytes.
//!
//! ```text
//! 1..=4  (ArrayParams rows)
//! 5      type_tag  length-delimited UTF-8
//! 6      data      length-delimited bytes
//! ```
//!
//! Neither `type_tag` nor the element width implied by `data` is interpreted
//! here; they belong to the owning tensor type.

use crate::config::EncodeConfig;
use crate::params::{self, ArrayParams, HasArrayParams};
use crate::schema::{expect_kind, field_number, Field, Message};
use serde::{Deserialize, Serialize};
use tensor_codec_wire::frame::{encode_length_delimited_field, length_delimited_field_len};
use tensor_codec_wire::{Tag, WireError, WireKind, WireReader};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DenseTensor {
    pub params: ArrayParams,
    /// Opaque element-type name, e.g. `"float64"`.
    pub type_tag: String,
    /// Element bytes in the layout described by `params`.
    pub data: Vec<u8>,
}

impl DenseTensor {
    pub fn new(params: ArrayParams, type_tag: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            params,
            type_tag: type_tag.into(),
            data,
        }
    }
}

/// Records that embed a [`DenseTensor`].
pub trait HasDense: HasArrayParams {
    fn dense(&self) -> &DenseTensor;
    fn dense_mut(&mut self) -> &mut DenseTensor;
}

impl HasArrayParams for DenseTensor {
    fn params(&self) -> &ArrayParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ArrayParams {
        &mut self.params
    }
}

impl HasDense for DenseTensor {
    fn dense(&self) -> &DenseTensor {
        self
    }

    fn dense_mut(&mut self) -> &mut DenseTensor {
        self
    }
}

impl Message for DenseTensor {
    const NAME: &'static str = "DenseTensor";
    const FIELDS: &'static [Field<Self>] = &[
        params::shape(),
        params::strides(),
        params::order(),
        params::triangle(),
        type_tag(),
        data(),
    ];
}

pub(crate) const fn type_tag<M: HasDense>() -> Field<M> {
    Field {
        number: field_number::TYPE_TAG,
        name: "type_tag",
        encoded_len: type_tag_len::<M>,
        encode: encode_type_tag::<M>,
        merge: merge_type_tag::<M>,
    }
}

pub(crate) const fn data<M: HasDense>() -> Field<M> {
    Field {
        number: field_number::DATA,
        name: "data",
        encoded_len: data_len::<M>,
        encode: encode_data::<M>,
        merge: merge_data::<M>,
    }
}

fn type_tag_len<M: HasDense>(m: &M, _: &EncodeConfig) -> usize {
    bytes_len(field_number::TYPE_TAG, m.dense().type_tag.as_bytes())
}

fn encode_type_tag<M: HasDense>(m: &M, _: &EncodeConfig, buf: &mut Vec<u8>) {
    encode_bytes(field_number::TYPE_TAG, m.dense().type_tag.as_bytes(), buf);
}

fn merge_type_tag<M: HasDense>(
    m: &mut M,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    expect_kind(tag, WireKind::LengthDelimited)?;
    let body = reader.read_length_delimited()?;
    let s = std::str::from_utf8(body).map_err(|_| WireError::InvalidUtf8 {
        field_number: tag.field_number,
    })?;
    m.dense_mut().type_tag = s.to_owned();
    Ok(())
}

fn data_len<M: HasDense>(m: &M, _: &EncodeConfig) -> usize {
    bytes_len(field_number::DATA, &m.dense().data)
}

fn encode_data<M: HasDense>(m: &M, _: &EncodeConfig, buf: &mut Vec<u8>) {
    encode_bytes(field_number::DATA, &m.dense().data, buf);
}

fn merge_data<M: HasDense>(
    m: &mut M,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    expect_kind(tag, WireKind::LengthDelimited)?;
    let body = reader.read_length_delimited()?;
    let data = &mut m.dense_mut().data;
    data.clear();
    data.extend_from_slice(body);
    Ok(())
}

// empty strings and blobs are omitted

fn bytes_len(field_number: u32, body: &[u8]) -> usize {
    if body.is_empty() {
        0
    } else {
        length_delimited_field_len(field_number, body.len())
    }
}

fn encode_bytes(field_number: u32, body: &[u8], buf: &mut Vec<u8>) {
    if !body.is_empty() {
        encode_length_delimited_field(field_number, body, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::schema::assert_table_sorted;

    fn sample() -> DenseTensor {
        DenseTensor::new(
            ArrayParams::new(vec![2], vec![1]),
            "uint8",
            vec![0xAB, 0xCD],
        )
    }

    #[test]
    fn test_table_sorted() {
        assert_table_sorted::<DenseTensor>();
    }

    #[test]
    fn test_encoding_layout() {
        let bytes = sample().encode();
        assert_eq!(
            bytes,
            [
                0x0A, 0x01, 0x02, // shape
                0x12, 0x01, 0x01, // strides
                0x2A, 0x05, b'u', b'i', b'n', b't', b'8', // type_tag
                0x32, 0x02, 0xAB, 0xCD, // data
            ]
        );
        assert_eq!(sample().encoded_len(), bytes.len());
        assert_eq!(DenseTensor::decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_empty_fields_omitted() {
        let t = DenseTensor::new(ArrayParams::default(), "", Vec::new());
        assert!(t.encode().is_empty());
    }

    #[test]
    fn test_invalid_utf8_type_tag() {
        let bytes = [0x2A, 0x02, 0xC3, 0x28];
        assert_eq!(
            DenseTensor::decode(&bytes),
            Err(CodecError::Wire(WireError::InvalidUtf8 { field_number: 5 }))
        );
    }

    #[test]
    fn test_data_last_wins_and_shape_appends() {
        let mut t = sample();
        t.merge(&[0x0A, 0x01, 0x03, 0x32, 0x01, 0xFF]).unwrap();
        assert_eq!(t.params.shape, vec![2, 3]);
        assert_eq!(t.data, vec![0xFF]);
        assert_eq!(t.type_tag, "uint8");
    }

    #[test]
    fn test_data_as_varint_rejected() {
        let err = DenseTensor::decode(&[0x30, 0x01]).unwrap_err();
        assert_eq!(
            err.as_wire(),
            Some(&WireError::UnsupportedWireKind {
                field_number: 6,
                wire_kind: 0
            })
        );
    }

    #[test]
    fn test_array_params_reader_skips_dense_fields() {
        // an ArrayParams reader sees fields 5 and 6 as unknown
        let ap = ArrayParams::decode(&sample().encode()).unwrap();
        assert_eq!(ap, sample().params);
    }
}
