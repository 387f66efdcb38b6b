//! Binary encoding for tensors
//!
//! Three record kinds share one tagged-field wire format:
//!
//! - [`ArrayParams`]: shape, strides, storage order and triangularity
//! - [`DenseTensor`]: array parameters plus an element-type tag and raw bytes
//! - [`MaskedDenseTensor`]: a dense tensor plus validity and soft-mask bits
//!
//! # Design
//!
//! - **Field tables**: each record is a sorted table of [`Field`] rows. Sizing,
//!   writing and decoding are free functions over the table, not methods of a
//!   type hierarchy; the records embed each other by value and reuse rows
//!   through [`HasArrayParams`] and [`HasDense`]
//! - **Zero is absent**: zero scalars and empty sequences are never written, and
//!   decoding starts from `Default`
//! - **Forward compatible**: unknown fields of every wire kind are skipped
//! - **Borrowing reads**: decoding makes a single forward pass over the input
//!   and copies only what the record keeps
//!
//! # Example
//!
//! ```
//! use tensor_codec::{ArrayParams, DataOrder, Message};
//!
//! let ap = ArrayParams::contiguous(&[2, 2], DataOrder::ROW_MAJOR)?;
//! let bytes = ap.encode();
//! assert_eq!(bytes, [0x0A, 0x02, 0x02, 0x02, 0x12, 0x02, 0x02, 0x01]);
//! assert_eq!(ArrayParams::decode(&bytes)?, ap);
//! # Ok::<(), tensor_codec::CodecError>(())
//! ```

mod codec;
pub mod config;
mod dense;
mod error;
mod masked;
mod order;
mod params;
pub mod schema;
mod source;
mod triangle;

pub use codec::TensorCodec;
pub use config::{load_config, CodecConfig, ConfigError, DecodeConfig, EncodeConfig};
pub use dense::{DenseTensor, HasDense};
pub use error::{CodecError, Result};
pub use masked::MaskedDenseTensor;
pub use order::DataOrder;
pub use params::{ArrayParams, HasArrayParams};
pub use schema::{Field, Message};
pub use source::{FromTensor, MaskedTensorSource, TensorSource};
pub use triangle::Triangle;

pub use tensor_codec_wire::{RepeatedEncoding, WireError};
