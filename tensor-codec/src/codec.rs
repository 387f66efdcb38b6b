//! Configured entry point for encoding and decoding records.

use crate::config::CodecConfig;
use crate::dense::DenseTensor;
use crate::error::Result;
use crate::masked::MaskedDenseTensor;
use crate::schema::{self, Message};
use crate::source::{FromTensor, MaskedTensorSource, TensorSource};

/// Encoder/decoder bound to one [`CodecConfig`].
///
/// Holds no state besides the configuration; share it freely across threads.
#[derive(Debug, Clone, Default)]
pub struct TensorCodec {
    config: CodecConfig,
}

impl TensorCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// SizeOf under this codec's encode settings.
    pub fn encoded_len<M: Message>(&self, msg: &M) -> usize {
        schema::encoded_len_with(msg, &self.config.encode)
    }

    /// Marshal into a buffer sized exactly by [`encoded_len`](Self::encoded_len).
    pub fn encode<M: Message>(&self, msg: &M) -> Vec<u8> {
        let _span = tracing::debug_span!("tensor_encode", record = M::NAME).entered();
        let bytes = schema::encode_with(msg, &self.config.encode);
        tracing::debug!(
            record = M::NAME,
            bytes = bytes.len(),
            repeated = ?self.config.encode.repeated,
            "record encoded"
        );
        bytes
    }

    /// Append the encoding of `msg` to `buf`.
    pub fn encode_to<M: Message>(&self, msg: &M, buf: &mut Vec<u8>) {
        let _span = tracing::debug_span!("tensor_encode", record = M::NAME).entered();
        let start = buf.len();
        buf.reserve(schema::encoded_len_with(msg, &self.config.encode));
        schema::encode_to_with(msg, &self.config.encode, buf);
        tracing::debug!(record = M::NAME, bytes = buf.len() - start, "record encoded");
    }

    /// Unmarshal: zero-initialize, then merge `bytes`.
    pub fn decode<M: Message>(&self, bytes: &[u8]) -> Result<M> {
        let _span =
            tracing::debug_span!("tensor_decode", record = M::NAME, input_bytes = bytes.len())
                .entered();
        let msg = schema::decode_with(bytes, &self.config.decode)?;
        tracing::debug!(record = M::NAME, input_bytes = bytes.len(), "record decoded");
        Ok(msg)
    }

    /// Fold `bytes` into an existing record.
    pub fn merge<M: Message>(&self, msg: &mut M, bytes: &[u8]) -> Result<()> {
        let _span =
            tracing::debug_span!("tensor_merge", record = M::NAME, input_bytes = bytes.len())
                .entered();
        schema::merge_with(msg, bytes, &self.config.decode)
    }

    /// Encode an owning tensor as a [`DenseTensor`].
    pub fn encode_source<S: TensorSource + ?Sized>(&self, source: &S) -> Vec<u8> {
        self.encode(&DenseTensor::from_source(source))
    }

    /// Encode an owning masked tensor as a [`MaskedDenseTensor`].
    pub fn encode_masked_source<S: MaskedTensorSource + ?Sized>(&self, source: &S) -> Vec<u8> {
        self.encode(&MaskedDenseTensor::from_source(source))
    }

    /// Decode a [`DenseTensor`] and hand it to `T`.
    pub fn decode_into<T: FromTensor>(&self, bytes: &[u8]) -> std::result::Result<T, T::Error> {
        let tensor: DenseTensor = self.decode(bytes)?;
        T::from_dense(tensor)
    }

    /// Decode a [`MaskedDenseTensor`] and hand it to `T`.
    pub fn decode_masked_into<T: FromTensor>(
        &self,
        bytes: &[u8],
    ) -> std::result::Result<T, T::Error> {
        let tensor: MaskedDenseTensor = self.decode(bytes)?;
        T::from_masked(tensor)
    }
}
