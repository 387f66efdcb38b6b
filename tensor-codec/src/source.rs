//! Collaborator traits for the tensor types that own the data.
//!
//! The codec never interprets a tensor's elements. An owning type hands over
//! its layout, type tag and raw bytes through [`TensorSource`], and rebuilds
//! itself from a decoded record through [`FromTensor`].

use crate::dense::DenseTensor;
use crate::error::CodecError;
use crate::masked::MaskedDenseTensor;
use crate::params::ArrayParams;

// ============================================================================
// Supplied
// ============================================================================

/// What an owning tensor supplies for encoding.
pub trait TensorSource {
    fn array_params(&self) -> ArrayParams;

    /// Opaque element-type name.
    fn type_tag(&self) -> &str;

    /// Element bytes in the layout described by [`array_params`](Self::array_params).
    fn raw_bytes(&self) -> &[u8];
}

/// What a masked tensor supplies in addition.
pub trait MaskedTensorSource: TensorSource {
    fn mask(&self) -> &[bool];

    /// Empty when no entry is soft.
    fn mask_is_soft(&self) -> &[bool];
}

// ============================================================================
// Accepted
// ============================================================================

/// How an owning tensor is rebuilt from a decoded record.
pub trait FromTensor: Sized {
    type Error: From<CodecError>;

    fn from_dense(tensor: DenseTensor) -> Result<Self, Self::Error>;

    /// Rebuild from a masked record.
    ///
    /// The default implementation accepts the record only when it carries no
    /// mask, and rejects it otherwise.
    fn from_masked(tensor: MaskedDenseTensor) -> Result<Self, Self::Error> {
        if tensor.is_masked() {
            return Err(CodecError::invalid_layout(format!(
                "{} does not support masks",
                std::any::type_name::<Self>()
            ))
            .into());
        }
        Self::from_dense(tensor.tensor)
    }
}

impl DenseTensor {
    pub fn from_source<S: TensorSource + ?Sized>(source: &S) -> Self {
        Self::new(
            source.array_params(),
            source.type_tag(),
            source.raw_bytes().to_vec(),
        )
    }
}

impl MaskedDenseTensor {
    pub fn from_source<S: MaskedTensorSource + ?Sized>(source: &S) -> Self {
        Self::new(
            DenseTensor::from_source(source),
            source.mask().to_vec(),
            source.mask_is_soft().to_vec(),
        )
    }
}

impl TensorSource for DenseTensor {
    fn array_params(&self) -> ArrayParams {
        self.params.clone()
    }

    fn type_tag(&self) -> &str {
        &self.type_tag
    }

    fn raw_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl TensorSource for MaskedDenseTensor {
    fn array_params(&self) -> ArrayParams {
        self.tensor.params.clone()
    }

    fn type_tag(&self) -> &str {
        &self.tensor.type_tag
    }

    fn raw_bytes(&self) -> &[u8] {
        &self.tensor.data
    }
}

impl MaskedTensorSource for MaskedDenseTensor {
    fn mask(&self) -> &[bool] {
        &self.mask
    }

    fn mask_is_soft(&self) -> &[bool] {
        &self.mask_is_soft
    }
}

impl FromTensor for DenseTensor {
    type Error = CodecError;

    fn from_dense(tensor: DenseTensor) -> Result<Self, CodecError> {
        Ok(tensor)
    }
}

impl FromTensor for MaskedDenseTensor {
    type Error = CodecError;

    fn from_dense(tensor: DenseTensor) -> Result<Self, CodecError> {
        Ok(Self::new(tensor, Vec::new(), Vec::new()))
    }

    fn from_masked(tensor: MaskedDenseTensor) -> Result<Self, CodecError> {
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_from_masked_rejects_mask() {
        let masked = MaskedDenseTensor::new(
            DenseTensor::new(ArrayParams::new(vec![1], vec![1]), "bool", vec![1]),
            vec![true],
            Vec::new(),
        );
        assert!(matches!(
            DenseTensor::from_masked(masked.clone()),
            Err(CodecError::InvalidLayout(_))
        ));

        let unmasked = MaskedDenseTensor::new(masked.tensor.clone(), Vec::new(), Vec::new());
        assert_eq!(DenseTensor::from_masked(unmasked).unwrap(), masked.tensor);
    }

    #[test]
    fn test_from_source_copies() {
        let t = DenseTensor::new(ArrayParams::new(vec![2], vec![1]), "int8", vec![7, 9]);
        assert_eq!(DenseTensor::from_source(&t), t);
    }
}
