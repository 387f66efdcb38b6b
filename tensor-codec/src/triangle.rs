//! Triangularity hint.

use serde::{Deserialize, Serialize};
use std::fmt;
use tensor_codec_wire::varint::{int32_from_wire, int32_to_wire};

/// Structural hint about a matrix. Not enforced by the codec.
///
/// Values outside the named members decode to [`Triangle::Unknown`] and are
/// written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Triangle {
    #[default]
    NotTriangle,
    Upper,
    Lower,
    Symmetric,
    /// Raw value from a newer encoder. Only produced by [`Triangle::from_i32`].
    Unknown(i32),
}

impl Triangle {
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::NotTriangle,
            1 => Self::Upper,
            2 => Self::Lower,
            3 => Self::Symmetric,
            other => Self::Unknown(other),
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Self::NotTriangle => 0,
            Self::Upper => 1,
            Self::Lower => 2,
            Self::Symmetric => 3,
            Self::Unknown(v) => v,
        }
    }

    /// Schema name of the member.
    pub fn as_str_name(self) -> &'static str {
        match self {
            Self::NotTriangle => "NOT_TRIANGLE",
            Self::Upper => "UPPER",
            Self::Lower => "LOWER",
            Self::Symmetric => "SYMMETRIC",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn from_str_name(name: &str) -> Option<Self> {
        match name {
            "NOT_TRIANGLE" => Some(Self::NotTriangle),
            "UPPER" => Some(Self::Upper),
            "LOWER" => Some(Self::Lower),
            "SYMMETRIC" => Some(Self::Symmetric),
            _ => None,
        }
    }

    pub(crate) fn to_wire(self) -> u64 {
        int32_to_wire(self.as_i32())
    }

    pub(crate) fn from_wire(value: u64) -> Self {
        Self::from_i32(int32_from_wire(value))
    }
}

impl From<i32> for Triangle {
    fn from(v: i32) -> Self {
        Self::from_i32(v)
    }
}

impl From<Triangle> for i32 {
    fn from(t: Triangle) -> Self {
        t.as_i32()
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(v) => write!(f, "UNKNOWN({v})"),
            known => f.write_str(known.as_str_name()),
        }
    }
}
