//! # tensor-codec-wire
//!
//! Schema-independent wire primitives for the tensor encoding:
//!
//! - **Varints** ([`varint`]): base-128, least-significant group first
//! - **Field framing** ([`frame`]): `(field_number << 3) | wire_kind` tags and
//!   the writer helpers built on them
//! - **Reading** ([`reader`]): a bounds-checked forward cursor that can skip a
//!   field of any wire kind without interpreting it
//! - **Repeated fields** ([`packed`]): packed and expanded forms of repeated
//!   int32 and bool fields
//!
//! Nothing here knows about tensors; record schemas live in `tensor-codec`.
//! No fixed-width integers are written, so there is no byte-order handling.

mod error;
pub mod frame;
pub mod packed;
pub mod reader;
pub mod varint;

pub use error::{Result, WireError};
pub use frame::{Tag, WireKind, MAX_FIELD_NUMBER};
pub use packed::RepeatedEncoding;
pub use reader::{WireReader, DEFAULT_MAX_GROUP_DEPTH, MAX_GROUP_DEPTH_LIMIT};
pub use varint::{decode_varint, encode_varint, encoded_len_varint, MAX_VARINT_LEN};
