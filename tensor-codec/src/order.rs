//! Storage order flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Linear-layout convention relating indices to offsets.
///
/// A small bit set rather than a plain enum: a view can be column-major and
/// transposed at once. The empty set is row-major, contiguous and not
/// transposed. Bits outside the known members are kept, so decoding and
/// re-encoding preserves them. The value is 32 bits wide: wire bits above
/// bit 31 are dropped on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataOrder(u32);

impl DataOrder {
    pub const ROW_MAJOR: Self = Self(0);
    pub const COL_MAJOR: Self = Self(1);
    pub const NON_CONTIGUOUS: Self = Self(1 << 1);
    pub const TRANSPOSED: Self = Self(1 << 2);

    const KNOWN_BITS: u32 = 0b111;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_row_major(self) -> bool {
        self.0 & Self::COL_MAJOR.0 == 0
    }

    pub const fn is_col_major(self) -> bool {
        !self.is_row_major()
    }

    pub const fn is_contiguous(self) -> bool {
        self.0 & Self::NON_CONTIGUOUS.0 == 0
    }

    pub const fn is_transposed(self) -> bool {
        self.0 & Self::TRANSPOSED.0 != 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Bits this version does not name.
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !Self::KNOWN_BITS
    }

    pub(crate) fn to_wire(self) -> u64 {
        u64::from(self.0)
    }

    /// Keeps the low 32 bits.
    pub(crate) fn from_wire(value: u64) -> Self {
        Self(value as u32)
    }
}

impl BitOr for DataOrder {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl fmt::Display for DataOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_col_major() {
            "ColMajor"
        } else {
            "RowMajor"
        })?;
        if !self.is_contiguous() {
            f.write_str("|NonContiguous")?;
        }
        if self.is_transposed() {
            f.write_str("|Transposed")?;
        }
        let unknown = self.unknown_bits();
        if unknown != 0 {
            write!(f, "|0x{unknown:x}")?;
        }
        Ok(())
    }
}
