// Copyright 2024-2026, NVIDIA CORPORATION & AFFILIATES. All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
//  * Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
//  * Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//  * Neither the name of NVIDIA CORPORATION nor the names of its
//    contributors may be used to endorse or promote products derived
//    from this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS ``AS IS'' AND ANY
// EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR
// PURPOSE ARE DISCLAIMED.  IN NO EVENT SHALL THE COPYRIGHT OWNER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY
// OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! The wire datatype registry.
//!
//! [`DataType`] names every element encoding understood by the protocol and
//! knows its string tag and fixed element width. [`DataType::of`] maps a
//! native Rust element type onto its tag.

use std::any::TypeId;

/// Triton data types corresponding to the protocol's tensor data types.
///
/// These map to the string representations expected on the wire by both
/// transports (e.g. `"FP32"`, `"INT64"`, `"BYTES"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean values.
    Bool,
    /// Unsigned 8-bit integers.
    Uint8,
    /// Unsigned 16-bit integers.
    Uint16,
    /// Unsigned 32-bit integers.
    Uint32,
    /// Unsigned 64-bit integers.
    Uint64,
    /// Signed 8-bit integers.
    Int8,
    /// Signed 16-bit integers.
    Int16,
    /// Signed 32-bit integers.
    Int32,
    /// Signed 64-bit integers.
    Int64,
    /// IEEE 754 half-precision (16-bit) floating point.
    Fp16,
    /// IEEE 754 single-precision (32-bit) floating point.
    Fp32,
    /// IEEE 754 double-precision (64-bit) floating point.
    Fp64,
    /// Variable-length byte sequences (strings).
    Bytes,
    /// Brain floating point (16-bit).
    Bf16,
}

impl DataType {
    /// Every supported datatype, in protocol order.
    pub const ALL: [DataType; 14] = [
        Self::Bool,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Fp16,
        Self::Fp32,
        Self::Fp64,
        Self::Bytes,
        Self::Bf16,
    ];

    /// Returns the protocol string representation of this data type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triton_wire::datatype::DataType;
    /// assert_eq!(DataType::Fp32.as_str(), "FP32");
    /// assert_eq!(DataType::Int64.as_str(), "INT64");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Uint8 => "UINT8",
            Self::Uint16 => "UINT16",
            Self::Uint32 => "UINT32",
            Self::Uint64 => "UINT64",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Fp16 => "FP16",
            Self::Fp32 => "FP32",
            Self::Fp64 => "FP64",
            Self::Bytes => "BYTES",
            Self::Bf16 => "BF16",
        }
    }

    /// Parses a protocol data type string into a [`DataType`].
    ///
    /// Returns `None` if the string does not correspond to a known type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triton_wire::datatype::DataType;
    /// assert_eq!(DataType::parse("FP32"), Some(DataType::Fp32));
    /// assert_eq!(DataType::parse("UNKNOWN"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dt| dt.as_str() == s)
    }

    /// Returns the width in bytes of one encoded element.
    ///
    /// `BYTES` elements are length-prefixed and have no fixed width, so this
    /// returns `None` for [`DataType::Bytes`].
    #[must_use]
    pub const fn byte_size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Uint8 | Self::Int8 => Some(1),
            Self::Uint16 | Self::Int16 | Self::Fp16 | Self::Bf16 => Some(2),
            Self::Uint32 | Self::Int32 | Self::Fp32 => Some(4),
            Self::Uint64 | Self::Int64 | Self::Fp64 => Some(8),
            Self::Bytes => None,
        }
    }

    /// Infers the wire datatype for a native element type.
    ///
    /// The mapping is total: element types with no wire representation
    /// yield `None` instead of panicking, so callers can reject them before
    /// building a request.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triton_wire::datatype::DataType;
    /// assert_eq!(DataType::of::<i32>(), Some(DataType::Int32));
    /// assert_eq!(DataType::of::<String>(), Some(DataType::Bytes));
    /// assert_eq!(DataType::of::<char>(), None);
    /// ```
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Option<Self> {
        let id = TypeId::of::<T>();
        let table: [(TypeId, DataType); 17] = [
            (TypeId::of::<bool>(), Self::Bool),
            (TypeId::of::<u8>(), Self::Uint8),
            (TypeId::of::<u16>(), Self::Uint16),
            (TypeId::of::<u32>(), Self::Uint32),
            (TypeId::of::<u64>(), Self::Uint64),
            (TypeId::of::<i8>(), Self::Int8),
            (TypeId::of::<i16>(), Self::Int16),
            (TypeId::of::<i32>(), Self::Int32),
            (TypeId::of::<i64>(), Self::Int64),
            (TypeId::of::<half::f16>(), Self::Fp16),
            (TypeId::of::<f32>(), Self::Fp32),
            (TypeId::of::<f64>(), Self::Fp64),
            (TypeId::of::<half::bf16>(), Self::Bf16),
            (TypeId::of::<String>(), Self::Bytes),
            (TypeId::of::<str>(), Self::Bytes),
            (TypeId::of::<Vec<u8>>(), Self::Bytes),
            (TypeId::of::<[u8]>(), Self::Bytes),
        ];
        table
            .into_iter()
            .find_map(|(candidate, dt)| (candidate == id).then_some(dt))
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown data type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDataTypeError(String);

impl std::fmt::Display for ParseDataTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown data type: {}", self.0)
    }
}

impl std::error::Error for ParseDataTypeError {}

impl std::str::FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DataType::parse(s).ok_or_else(|| ParseDataTypeError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_round_trip() {
        for dt in DataType::ALL {
            let s = dt.as_str();
            let parsed = DataType::parse(s).unwrap();
            assert_eq!(dt, parsed, "Round-trip failed for {s}");
        }
    }

    #[test]
    fn data_type_display() {
        assert_eq!(format!("{}", DataType::Fp32), "FP32");
        assert_eq!(format!("{}", DataType::Int64), "INT64");
    }

    #[test]
    fn data_type_unknown_returns_none() {
        assert!(DataType::parse("UNKNOWN").is_none());
        assert!(DataType::parse("").is_none());
        assert!(DataType::parse("fp32").is_none());
        assert!("TYPE_FP32".parse::<DataType>().is_err());
    }

    #[test]
    fn byte_sizes() {
        assert_eq!(DataType::Bool.byte_size(), Some(1));
        assert_eq!(DataType::Int8.byte_size(), Some(1));
        assert_eq!(DataType::Fp16.byte_size(), Some(2));
        assert_eq!(DataType::Bf16.byte_size(), Some(2));
        assert_eq!(DataType::Uint32.byte_size(), Some(4));
        assert_eq!(DataType::Fp64.byte_size(), Some(8));
        assert_eq!(DataType::Bytes.byte_size(), None);
    }

    #[test]
    fn native_type_inference() {
        assert_eq!(DataType::of::<bool>(), Some(DataType::Bool));
        assert_eq!(DataType::of::<u16>(), Some(DataType::Uint16));
        assert_eq!(DataType::of::<i64>(), Some(DataType::Int64));
        assert_eq!(DataType::of::<f64>(), Some(DataType::Fp64));
        assert_eq!(DataType::of::<half::f16>(), Some(DataType::Fp16));
        assert_eq!(DataType::of::<half::bf16>(), Some(DataType::Bf16));
        assert_eq!(DataType::of::<Vec<u8>>(), Some(DataType::Bytes));
        assert_eq!(DataType::of::<str>(), Some(DataType::Bytes));
    }

    #[test]
    fn native_type_inference_is_total() {
        assert_eq!(DataType::of::<char>(), None);
        assert_eq!(DataType::of::<usize>(), None);
        assert_eq!(DataType::of::<(i32, i32)>(), None);
        assert_eq!(DataType::of::<Vec<f32>>(), None);
    }
}
