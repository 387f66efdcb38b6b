//! Masked dense tensors: a dense tensor plus per-element validity bits.
//!
//! ```text
//! 1..=6  (DenseTensor rows)
//! 7      mask          repeated bool (packed or expanded)
//! 8      mask_is_soft  repeated bool (packed or expanded)
//! ```

use crate::config::EncodeConfig;
use crate::dense::{self, DenseTensor, HasDense};
use crate::error::{CodecError, Result};
use crate::params::{self, ArrayParams, HasArrayParams};
use crate::schema::{field_number, Field, Message};
use serde::{Deserialize, Serialize};
use tensor_codec_wire::packed::{encode_repeated_bool, merge_repeated_bool, repeated_bool_len};
use tensor_codec_wire::{Tag, WireReader};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaskedDenseTensor {
    pub tensor: DenseTensor,
    /// `true` marks an element as masked out.
    pub mask: Vec<bool>,
    /// `true` marks the mask entry at the same index as advisory.
    pub mask_is_soft: Vec<bool>,
}

impl MaskedDenseTensor {
    pub fn new(tensor: DenseTensor, mask: Vec<bool>, mask_is_soft: Vec<bool>) -> Self {
        Self {
            tensor,
            mask,
            mask_is_soft,
        }
    }

    /// A mask is only meaningful when present.
    pub fn is_masked(&self) -> bool {
        !self.mask.is_empty()
    }

    /// Check that non-empty masks cover every element, and that the layout
    /// itself is consistent.
    pub fn validate_mask(&self) -> Result<()> {
        let params = &self.tensor.params;
        params.validate()?;
        let count = params.element_count().ok_or_else(|| {
            CodecError::invalid_layout(format!("element count of {:?} overflows", params.shape))
        })?;
        for (name, bits) in [("mask", &self.mask), ("mask_is_soft", &self.mask_is_soft)] {
            if !bits.is_empty() && bits.len() != count {
                return Err(CodecError::invalid_layout(format!(
                    "{name} has {} entries for {count} elements",
                    bits.len()
                )));
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (DenseTensor, Vec<bool>, Vec<bool>) {
        (self.tensor, self.mask, self.mask_is_soft)
    }
}

impl HasArrayParams for MaskedDenseTensor {
    fn params(&self) -> &ArrayParams {
        &self.tensor.params
    }

    fn params_mut(&mut self) -> &mut ArrayParams {
        &mut self.tensor.params
    }
}

impl HasDense for MaskedDenseTensor {
    fn dense(&self) -> &DenseTensor {
        &self.tensor
    }

    fn dense_mut(&mut self) -> &mut DenseTensor {
        &mut self.tensor
    }
}

impl Message for MaskedDenseTensor {
    const NAME: &'static str = "MaskedDenseTensor";
    const FIELDS: &'static [Field<Self>] = &[
        params::shape(),
        params::strides(),
        params::order(),
        params::triangle(),
        dense::type_tag(),
        dense::data(),
        Field {
            number: field_number::MASK,
            name: "mask",
            encoded_len: mask_len,
            encode: encode_mask,
            merge: merge_mask,
        },
        Field {
            number: field_number::MASK_IS_SOFT,
            name: "mask_is_soft",
            encoded_len: soft_len,
            encode: encode_soft,
            merge: merge_soft,
        },
    ];
}

fn mask_len(m: &MaskedDenseTensor, config: &EncodeConfig) -> usize {
    repeated_bool_len(field_number::MASK, &m.mask, config.repeated)
}

fn encode_mask(m: &MaskedDenseTensor, config: &EncodeConfig, buf: &mut Vec<u8>) {
    encode_repeated_bool(field_number::MASK, &m.mask, config.repeated, buf);
}

fn merge_mask(
    m: &mut MaskedDenseTensor,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    merge_repeated_bool(tag, reader, &mut m.mask)
}

fn soft_len(m: &MaskedDenseTensor, config: &EncodeConfig) -> usize {
    repeated_bool_len(field_number::MASK_IS_SOFT, &m.mask_is_soft, config.repeated)
}

fn encode_soft(m: &MaskedDenseTensor, config: &EncodeConfig, buf: &mut Vec<u8>) {
    encode_repeated_bool(field_number::MASK_IS_SOFT, &m.mask_is_soft, config.repeated, buf);
}

fn merge_soft(
    m: &mut MaskedDenseTensor,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    merge_repeated_bool(tag, reader, &mut m.mask_is_soft)
}
