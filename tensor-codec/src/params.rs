//! Array parameters: shape, strides, storage order and triangularity.
//!
//! Usable standalone, and embedded by value in [`DenseTensor`](crate::DenseTensor)
//! and [`MaskedDenseTensor`](crate::MaskedDenseTensor), which reuse the rows
//! below through [`HasArrayParams`].
//!
//! ```text
//! 1  shape     repeated int32 (packed or expanded)
//! 2  strides   repeated int32 (packed or expanded)
//! 3  order     varint
//! 4  triangle  varint
//! ```

use crate::config::EncodeConfig;
use crate::error::{CodecError, Result};
use crate::order::DataOrder;
use crate::schema::{expect_kind, field_number, Field, Message};
use crate::triangle::Triangle;
use serde::{Deserialize, Serialize};
use tensor_codec_wire::frame::{encode_varint_field, varint_field_len};
use tensor_codec_wire::packed::{encode_repeated_int32, merge_repeated_int32, repeated_int32_len};
use tensor_codec_wire::{Tag, WireKind, WireReader};

/// Logical layout of a tensor, independent of its element data.
///
/// `shape` and `strides` have one entry per axis; both empty is a scalar.
/// Neither relationship is checked on decode, see [`validate`](Self::validate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayParams {
    pub shape: Vec<i32>,
    pub strides: Vec<i32>,
    pub order: DataOrder,
    pub triangle: Triangle,
}

impl ArrayParams {
    pub fn new(shape: Vec<i32>, strides: Vec<i32>) -> Self {
        Self {
            shape,
            strides,
            ..Self::default()
        }
    }

    /// Parameters of a freshly allocated contiguous array in `order`.
    pub fn contiguous(shape: &[i32], order: DataOrder) -> Result<Self> {
        let mut strides = vec![0i32; shape.len()];
        let mut acc: i32 = 1;
        // innermost axis first
        let mut axes: Vec<usize> = (0..shape.len()).collect();
        if order.is_row_major() {
            axes.reverse();
        }
        for axis in axes {
            let dim = shape[axis];
            if dim < 0 {
                return Err(CodecError::invalid_layout(format!(
                    "negative extent {dim} on axis {axis}"
                )));
            }
            strides[axis] = acc;
            acc = acc.checked_mul(dim.max(1)).ok_or_else(|| {
                CodecError::invalid_layout(format!("strides of {shape:?} overflow int32"))
            })?;
        }
        Ok(Self {
            shape: shape.to_vec(),
            strides,
            order,
            triangle: Triangle::NotTriangle,
        })
    }

    #[must_use]
    pub fn with_order(mut self, order: DataOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_triangle(mut self, triangle: Triangle) -> Self {
        self.triangle = triangle;
        self
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Product of the extents (1 for a scalar). `None` if an extent is
    /// negative or the product overflows.
    pub fn element_count(&self) -> Option<usize> {
        self.shape.iter().try_fold(1usize, |acc, &dim| {
            usize::try_from(dim).ok().and_then(|d| acc.checked_mul(d))
        })
    }

    /// Check the shape/strides invariants. Decoding never calls this.
    pub fn validate(&self) -> Result<()> {
        if self.strides.len() != self.shape.len() {
            return Err(CodecError::invalid_layout(format!(
                "{} strides for rank {}",
                self.strides.len(),
                self.shape.len()
            )));
        }
        if let Some((axis, dim)) = self.shape.iter().enumerate().find(|&(_, &d)| d < 0) {
            return Err(CodecError::invalid_layout(format!(
                "negative extent {dim} on axis {axis}"
            )));
        }
        Ok(())
    }
}

/// Records that embed an [`ArrayParams`].
pub trait HasArrayParams {
    fn params(&self) -> &ArrayParams;
    fn params_mut(&mut self) -> &mut ArrayParams;
}

impl HasArrayParams for ArrayParams {
    fn params(&self) -> &ArrayParams {
        self
    }

    fn params_mut(&mut self) -> &mut ArrayParams {
        self
    }
}

impl Message for ArrayParams {
    const NAME: &'static str = "ArrayParams";
    const FIELDS: &'static [Field<Self>] = &[shape(), strides(), order(), triangle()];
}

// =============================================================================
// Field rows (shared by every record embedding ArrayParams)
// =============================================================================

pub(crate) const fn shape<M: HasArrayParams>() -> Field<M> {
    Field {
        number: field_number::SHAPE,
        name: "shape",
        encoded_len: shape_len::<M>,
        encode: encode_shape::<M>,
        merge: merge_shape::<M>,
    }
}

pub(crate) const fn strides<M: HasArrayParams>() -> Field<M> {
    Field {
        number: field_number::STRIDES,
        name: "strides",
        encoded_len: strides_len::<M>,
        encode: encode_strides::<M>,
        merge: merge_strides::<M>,
    }
}

pub(crate) const fn order<M: HasArrayParams>() -> Field<M> {
    Field {
        number: field_number::ORDER,
        name: "order",
        encoded_len: order_len::<M>,
        encode: encode_order::<M>,
        merge: merge_order::<M>,
    }
}

pub(crate) const fn triangle<M: HasArrayParams>() -> Field<M> {
    Field {
        number: field_number::TRIANGLE,
        name: "triangle",
        encoded_len: triangle_len::<M>,
        encode: encode_triangle::<M>,
        merge: merge_triangle::<M>,
    }
}

fn shape_len<M: HasArrayParams>(m: &M, config: &EncodeConfig) -> usize {
    repeated_int32_len(field_number::SHAPE, &m.params().shape, config.repeated)
}

fn encode_shape<M: HasArrayParams>(m: &M, config: &EncodeConfig, buf: &mut Vec<u8>) {
    encode_repeated_int32(field_number::SHAPE, &m.params().shape, config.repeated, buf);
}

fn merge_shape<M: HasArrayParams>(
    m: &mut M,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    merge_repeated_int32(tag, reader, &mut m.params_mut().shape)
}

fn strides_len<M: HasArrayParams>(m: &M, config: &EncodeConfig) -> usize {
    repeated_int32_len(field_number::STRIDES, &m.params().strides, config.repeated)
}

fn encode_strides<M: HasArrayParams>(m: &M, config: &EncodeConfig, buf: &mut Vec<u8>) {
    encode_repeated_int32(field_number::STRIDES, &m.params().strides, config.repeated, buf);
}

fn merge_strides<M: HasArrayParams>(
    m: &mut M,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    merge_repeated_int32(tag, reader, &mut m.params_mut().strides)
}

// zero is the implicit default and never written

fn order_len<M: HasArrayParams>(m: &M, _: &EncodeConfig) -> usize {
    match m.params().order.to_wire() {
        0 => 0,
        v => varint_field_len(field_number::ORDER, v),
    }
}

fn encode_order<M: HasArrayParams>(m: &M, _: &EncodeConfig, buf: &mut Vec<u8>) {
    let v = m.params().order.to_wire();
    if v != 0 {
        encode_varint_field(field_number::ORDER, v, buf);
    }
}

fn merge_order<M: HasArrayParams>(
    m: &mut M,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    expect_kind(tag, WireKind::Varint)?;
    m.params_mut().order = DataOrder::from_wire(reader.read_varint()?);
    Ok(())
}

fn triangle_len<M: HasArrayParams>(m: &M, _: &EncodeConfig) -> usize {
    match m.params().triangle.to_wire() {
        0 => 0,
        v => varint_field_len(field_number::TRIANGLE, v),
    }
}

fn encode_triangle<M: HasArrayParams>(m: &M, _: &EncodeConfig, buf: &mut Vec<u8>) {
    let v = m.params().triangle.to_wire();
    if v != 0 {
        encode_varint_field(field_number::TRIANGLE, v, buf);
    }
}

fn merge_triangle<M: HasArrayParams>(
    m: &mut M,
    tag: Tag,
    reader: &mut WireReader<'_>,
) -> tensor_codec_wire::Result<()> {
    expect_kind(tag, WireKind::Varint)?;
    m.params_mut().triangle = Triangle::from_wire(reader.read_varint()?);
    Ok(())
}
