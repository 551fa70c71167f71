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

//! Conversion between native arrays and the binary tensor encoding.
//!
//! Every fixed-width datatype is stored as contiguous little-endian elements.
//! `BOOL` uses one byte per element (`0` or `1`) and `BYTES` stores each
//! element as a 4-byte little-endian length followed by the raw bytes, which
//! keeps a flat buffer of strings self-delimiting.
//!
//! # Example
//!
//! ```rust
//! use triton_wire::codec::{self, TensorData};
//! use triton_wire::datatype::DataType;
//!
//! let raw = codec::encode(&TensorData::Int32(vec![1, 2, 3])).unwrap();
//! assert_eq!(raw, [1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]);
//!
//! let decoded = codec::decode(&raw, DataType::Int32).unwrap();
//! assert_eq!(decoded, TensorData::Int32(vec![1, 2, 3]));
//!
//! assert!(codec::decode(&raw[..6], DataType::Int32).is_err());
//! ```

use crate::datatype::DataType;
use crate::error::{Error, Result};

/// Length prefix width of a `BYTES` element.
const BYTES_PREFIX_LEN: usize = 4;

/// A typed, flat (row-major) array of tensor elements.
///
/// Half-precision variants hold `f32` values: FP16 and BF16 are widened on
/// decode and narrowed on encode.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    /// `BOOL` elements.
    Bool(Vec<bool>),
    /// `UINT8` elements.
    Uint8(Vec<u8>),
    /// `UINT16` elements.
    Uint16(Vec<u16>),
    /// `UINT32` elements.
    Uint32(Vec<u32>),
    /// `UINT64` elements.
    Uint64(Vec<u64>),
    /// `INT8` elements.
    Int8(Vec<i8>),
    /// `INT16` elements.
    Int16(Vec<i16>),
    /// `INT32` elements.
    Int32(Vec<i32>),
    /// `INT64` elements.
    Int64(Vec<i64>),
    /// `FP16` elements, widened to `f32`.
    Fp16(Vec<f32>),
    /// `FP32` elements.
    Fp32(Vec<f32>),
    /// `FP64` elements.
    Fp64(Vec<f64>),
    /// `BF16` elements, widened to `f32`.
    Bf16(Vec<f32>),
    /// `BYTES` elements.
    Bytes(Vec<Vec<u8>>),
}

impl TensorData {
    /// Returns the wire datatype of these elements.
    #[must_use]
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Uint8(_) => DataType::Uint8,
            Self::Uint16(_) => DataType::Uint16,
            Self::Uint32(_) => DataType::Uint32,
            Self::Uint64(_) => DataType::Uint64,
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::Fp16(_) => DataType::Fp16,
            Self::Fp32(_) => DataType::Fp32,
            Self::Fp64(_) => DataType::Fp64,
            Self::Bf16(_) => DataType::Bf16,
            Self::Bytes(_) => DataType::Bytes,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Uint8(v) => v.len(),
            Self::Uint16(v) => v.len(),
            Self::Uint32(v) => v.len(),
            Self::Uint64(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Fp16(v) | Self::Fp32(v) | Self::Bf16(v) => v.len(),
            Self::Fp64(v) => v.len(),
            Self::Bytes(v) => v.len(),
        }
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a `BYTES` tensor from string-like elements.
    #[must_use]
    pub fn from_strings<S: AsRef<[u8]>>(items: &[S]) -> Self {
        Self::Bytes(items.iter().map(|s| s.as_ref().to_vec()).collect())
    }
}

/// A single untyped tensor element, used for inline (non-binary) data.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating-point number.
    Float(f64),
    /// A byte string.
    Bytes(Vec<u8>),
}

impl Scalar {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Bytes(_) => "byte string",
        }
    }
}

impl serde::Serialize for Scalar {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Uint(v) => serializer.serialize_u64(*v),
            Self::Float(v) if !v.is_finite() => Err(serde::ser::Error::custom(format!(
                "{v} has no JSON representation and cannot be sent inline"
            ))),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Bytes(v) => match std::str::from_utf8(v) {
                Ok(s) => serializer.serialize_str(s),
                Err(_) => Err(serde::ser::Error::custom(
                    "BYTES element is not valid UTF-8 and cannot be sent as inline JSON",
                )),
            },
        }
    }
}

/// Why typed elements could not be extracted from a [`TensorData`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementError {
    /// The data holds a different element type.
    WrongType(DataType),
    /// One element could not be converted.
    Invalid {
        /// Index of the element.
        index: usize,
        /// Description of the failure.
        reason: String,
    },
}

/// A native element type with a wire representation.
///
/// Implemented for `bool`, the fixed-width integers, `f32`, `f64`, and for
/// `Vec<u8>` and `String` as `BYTES` elements. `f32` also accepts FP16 and
/// BF16 data, which decode to `f32`.
pub trait Element: Sized {
    /// The datatype this element type is written as.
    const DATATYPE: DataType;

    /// Wraps native values in the matching [`TensorData`] variant.
    fn into_tensor_data(values: Vec<Self>) -> TensorData;

    /// Extracts native values from decoded data.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::WrongType`] if the decoded element type differs.
    fn from_tensor_data(data: TensorData) -> std::result::Result<Vec<Self>, ElementError>;

    /// Converts one inline element.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the value does not fit.
    fn from_scalar(value: &Scalar) -> std::result::Result<Self, String>;
}

macro_rules! impl_integer_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DATATYPE: DataType = DataType::$variant;

            fn into_tensor_data(values: Vec<Self>) -> TensorData {
                TensorData::$variant(values)
            }

            fn from_tensor_data(data: TensorData) -> std::result::Result<Vec<Self>, ElementError> {
                match data {
                    TensorData::$variant(values) => Ok(values),
                    other => Err(ElementError::WrongType(other.datatype())),
                }
            }

            fn from_scalar(value: &Scalar) -> std::result::Result<Self, String> {
                match value {
                    Scalar::Int(v) => <$t>::try_from(*v)
                        .map_err(|_| format!("{v} is out of range for {}", stringify!($t))),
                    Scalar::Uint(v) => <$t>::try_from(*v)
                        .map_err(|_| format!("{v} is out of range for {}", stringify!($t))),
                    other => Err(format!("expected an integer, found {}", other.kind())),
                }
            }
        }
    };
}

impl_integer_element!(u8, Uint8);
impl_integer_element!(u16, Uint16);
impl_integer_element!(u32, Uint32);
impl_integer_element!(u64, Uint64);
impl_integer_element!(i8, Int8);
impl_integer_element!(i16, Int16);
impl_integer_element!(i32, Int32);
impl_integer_element!(i64, Int64);

impl Element for bool {
    const DATATYPE: DataType = DataType::Bool;

    fn into_tensor_data(values: Vec<Self>) -> TensorData {
        TensorData::Bool(values)
    }

    fn from_tensor_data(data: TensorData) -> std::result::Result<Vec<Self>, ElementError> {
        match data {
            TensorData::Bool(values) => Ok(values),
            other => Err(ElementError::WrongType(other.datatype())),
        }
    }

    fn from_scalar(value: &Scalar) -> std::result::Result<Self, String> {
        match value {
            Scalar::Bool(v) => Ok(*v),
            other => Err(format!("expected a bool, found {}", other.kind())),
        }
    }
}

impl Element for f32 {
    const DATATYPE: DataType = DataType::Fp32;

    fn into_tensor_data(values: Vec<Self>) -> TensorData {
        TensorData::Fp32(values)
    }

    fn from_tensor_data(data: TensorData) -> std::result::Result<Vec<Self>, ElementError> {
        match data {
            TensorData::Fp32(values) | TensorData::Fp16(values) | TensorData::Bf16(values) => {
                Ok(values)
            }
            other => Err(ElementError::WrongType(other.datatype())),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn from_scalar(value: &Scalar) -> std::result::Result<Self, String> {
        match value {
            Scalar::Float(v) => Ok(*v as f32),
            Scalar::Int(v) => Ok(*v as f32),
            Scalar::Uint(v) => Ok(*v as f32),
            other => Err(format!("expected a number, found {}", other.kind())),
        }
    }
}

impl Element for f64 {
    const DATATYPE: DataType = DataType::Fp64;

    fn into_tensor_data(values: Vec<Self>) -> TensorData {
        TensorData::Fp64(values)
    }

    fn from_tensor_data(data: TensorData) -> std::result::Result<Vec<Self>, ElementError> {
        match data {
            TensorData::Fp64(values) => Ok(values),
            other => Err(ElementError::WrongType(other.datatype())),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_scalar(value: &Scalar) -> std::result::Result<Self, String> {
        match value {
            Scalar::Float(v) => Ok(*v),
            Scalar::Int(v) => Ok(*v as f64),
            Scalar::Uint(v) => Ok(*v as f64),
            other => Err(format!("expected a number, found {}", other.kind())),
        }
    }
}

impl Element for Vec<u8> {
    const DATATYPE: DataType = DataType::Bytes;

    fn into_tensor_data(values: Vec<Self>) -> TensorData {
        TensorData::Bytes(values)
    }

    fn from_tensor_data(data: TensorData) -> std::result::Result<Vec<Self>, ElementError> {
        match data {
            TensorData::Bytes(values) => Ok(values),
            other => Err(ElementError::WrongType(other.datatype())),
        }
    }

    fn from_scalar(value: &Scalar) -> std::result::Result<Self, String> {
        match value {
            Scalar::Bytes(v) => Ok(v.clone()),
            other => Err(format!("expected a byte string, found {}", other.kind())),
        }
    }
}

impl Element for String {
    const DATATYPE: DataType = DataType::Bytes;

    fn into_tensor_data(values: Vec<Self>) -> TensorData {
        TensorData::Bytes(values.into_iter().map(String::into_bytes).collect())
    }

    fn from_tensor_data(data: TensorData) -> std::result::Result<Vec<Self>, ElementError> {
        let values = match data {
            TensorData::Bytes(values) => values,
            other => return Err(ElementError::WrongType(other.datatype())),
        };
        values
            .into_iter()
            .enumerate()
            .map(|(index, bytes)| {
                String::from_utf8(bytes).map_err(|e| ElementError::Invalid {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    fn from_scalar(value: &Scalar) -> std::result::Result<Self, String> {
        match value {
            Scalar::Bytes(v) => String::from_utf8(v.clone()).map_err(|e| e.to_string()),
            other => Err(format!("expected a byte string, found {}", other.kind())),
        }
    }
}

macro_rules! impl_from_native {
    ($($t:ty),*) => {
        $(
            impl From<Vec<$t>> for TensorData {
                fn from(values: Vec<$t>) -> Self {
                    <$t as Element>::into_tensor_data(values)
                }
            }

            impl From<&[$t]> for TensorData {
                fn from(values: &[$t]) -> Self {
                    <$t as Element>::into_tensor_data(values.to_vec())
                }
            }
        )*
    };
}

impl_from_native!(bool, u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl From<Vec<Vec<u8>>> for TensorData {
    fn from(values: Vec<Vec<u8>>) -> Self {
        Self::Bytes(values)
    }
}

impl From<Vec<String>> for TensorData {
    fn from(values: Vec<String>) -> Self {
        String::into_tensor_data(values)
    }
}

impl From<Vec<&str>> for TensorData {
    fn from(values: Vec<&str>) -> Self {
        Self::from_strings(&values)
    }
}

impl From<Vec<half::f16>> for TensorData {
    fn from(values: Vec<half::f16>) -> Self {
        Self::Fp16(values.into_iter().map(half::f16::to_f32).collect())
    }
}

impl From<Vec<half::bf16>> for TensorData {
    fn from(values: Vec<half::bf16>) -> Self {
        Self::Bf16(values.into_iter().map(half::bf16::to_f32).collect())
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serializes tensor elements into the binary tensor encoding.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if a `BYTES` element is longer than
/// `u32::MAX` bytes and cannot be length-prefixed.
pub fn encode(data: &TensorData) -> Result<Vec<u8>> {
    let raw = match data {
        TensorData::Bool(v) => v.iter().map(|&b| u8::from(b)).collect(),
        TensorData::Uint8(v) => v.clone(),
        TensorData::Uint16(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Uint32(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Uint64(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Int8(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Int16(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Int32(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Int64(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Fp16(v) => encode_fixed(v, |&x| half::f16::from_f32(x).to_le_bytes()),
        TensorData::Fp32(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Fp64(v) => encode_fixed(v, |x| x.to_le_bytes()),
        TensorData::Bf16(v) => encode_fixed(v, |&x| half::bf16::from_f32(x).to_le_bytes()),
        TensorData::Bytes(v) => encode_bytes(v)?,
    };
    Ok(raw)
}

/// Returns the number of bytes [`encode`] produces for `data`.
#[must_use]
pub fn encoded_len(data: &TensorData) -> usize {
    match data {
        TensorData::Bytes(v) => v.iter().map(|item| BYTES_PREFIX_LEN + item.len()).sum(),
        other => other.len() * other.datatype().byte_size().unwrap_or(0),
    }
}

fn encode_fixed<T, const N: usize>(values: &[T], convert: impl Fn(&T) -> [u8; N]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(values.len() * N);
    for value in values {
        raw.extend_from_slice(&convert(value));
    }
    raw
}

fn encode_bytes(items: &[Vec<u8>]) -> Result<Vec<u8>> {
    let total = items.iter().map(|item| BYTES_PREFIX_LEN + item.len()).sum();
    let mut raw = Vec::with_capacity(total);
    for item in items {
        let len = u32::try_from(item.len()).map_err(|_| {
            Error::InvalidInput(format!(
                "BYTES element of {} bytes exceeds the 4-byte length prefix",
                item.len()
            ))
        })?;
        raw.extend_from_slice(&len.to_le_bytes());
        raw.extend_from_slice(item);
    }
    Ok(raw)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Deserializes a binary tensor buffer holding elements of `datatype`.
///
/// # Errors
///
/// Returns [`Error::Misaligned`] if a fixed-width buffer is not a whole
/// number of elements, and [`Error::Truncated`] if a `BYTES` record runs
/// past the end of the buffer.
pub fn decode(bytes: &[u8], datatype: DataType) -> Result<TensorData> {
    let data = match datatype {
        DataType::Bool => TensorData::Bool(decode_fixed(bytes, datatype, |[b]: [u8; 1]| b != 0)?),
        DataType::Uint8 => TensorData::Uint8(bytes.to_vec()),
        DataType::Uint16 => TensorData::Uint16(decode_fixed(bytes, datatype, u16::from_le_bytes)?),
        DataType::Uint32 => TensorData::Uint32(decode_fixed(bytes, datatype, u32::from_le_bytes)?),
        DataType::Uint64 => TensorData::Uint64(decode_fixed(bytes, datatype, u64::from_le_bytes)?),
        DataType::Int8 => TensorData::Int8(decode_fixed(bytes, datatype, i8::from_le_bytes)?),
        DataType::Int16 => TensorData::Int16(decode_fixed(bytes, datatype, i16::from_le_bytes)?),
        DataType::Int32 => TensorData::Int32(decode_fixed(bytes, datatype, i32::from_le_bytes)?),
        DataType::Int64 => TensorData::Int64(decode_fixed(bytes, datatype, i64::from_le_bytes)?),
        DataType::Fp16 => TensorData::Fp16(decode_fixed(bytes, datatype, |b: [u8; 2]| {
            half::f16::from_le_bytes(b).to_f32()
        })?),
        DataType::Fp32 => TensorData::Fp32(decode_fixed(bytes, datatype, f32::from_le_bytes)?),
        DataType::Fp64 => TensorData::Fp64(decode_fixed(bytes, datatype, f64::from_le_bytes)?),
        DataType::Bf16 => TensorData::Bf16(decode_fixed(bytes, datatype, |b: [u8; 2]| {
            f32::from_bits(u32::from(u16::from_le_bytes(b)) << 16)
        })?),
        DataType::Bytes => TensorData::Bytes(decode_bytes(bytes)?),
    };
    Ok(data)
}

/// Splits `bytes` into `N`-byte blocks and converts each one.
fn decode_fixed<T, const N: usize>(
    bytes: &[u8],
    datatype: DataType,
    convert: impl Fn([u8; N]) -> T,
) -> Result<Vec<T>> {
    if bytes.len() % N != 0 {
        return Err(Error::Misaligned {
            datatype,
            len: bytes.len(),
            width: N,
        });
    }
    Ok(bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut block = [0u8; N];
            block.copy_from_slice(chunk);
            convert(block)
        })
        .collect())
}

fn decode_bytes(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut items = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let prefix = bytes
            .get(offset..offset + BYTES_PREFIX_LEN)
            .ok_or(Error::Truncated {
                offset,
                needed: BYTES_PREFIX_LEN,
                available: bytes.len(),
            })?;
        let mut block = [0u8; BYTES_PREFIX_LEN];
        block.copy_from_slice(prefix);
        let len = u32::from_le_bytes(block) as usize;
        offset += BYTES_PREFIX_LEN;

        let item = bytes.get(offset..offset.saturating_add(len)).ok_or(Error::Truncated {
            offset,
            needed: len,
            available: bytes.len(),
        })?;
        items.push(item.to_vec());
        offset += len;
    }
    Ok(items)
}

/// Flattens tensor elements into an ordered sequence of inline scalars.
#[must_use]
pub fn flatten(data: &TensorData) -> Vec<Scalar> {
    match data {
        TensorData::Bool(v) => v.iter().map(|&x| Scalar::Bool(x)).collect(),
        TensorData::Uint8(v) => v.iter().map(|&x| Scalar::Uint(u64::from(x))).collect(),
        TensorData::Uint16(v) => v.iter().map(|&x| Scalar::Uint(u64::from(x))).collect(),
        TensorData::Uint32(v) => v.iter().map(|&x| Scalar::Uint(u64::from(x))).collect(),
        TensorData::Uint64(v) => v.iter().map(|&x| Scalar::Uint(x)).collect(),
        TensorData::Int8(v) => v.iter().map(|&x| Scalar::Int(i64::from(x))).collect(),
        TensorData::Int16(v) => v.iter().map(|&x| Scalar::Int(i64::from(x))).collect(),
        TensorData::Int32(v) => v.iter().map(|&x| Scalar::Int(i64::from(x))).collect(),
        TensorData::Int64(v) => v.iter().map(|&x| Scalar::Int(x)).collect(),
        TensorData::Fp16(v) | TensorData::Fp32(v) | TensorData::Bf16(v) => {
            v.iter().map(|&x| Scalar::Float(f64::from(x))).collect()
        }
        TensorData::Fp64(v) => v.iter().map(|&x| Scalar::Float(x)).collect(),
        TensorData::Bytes(v) => v.iter().cloned().map(Scalar::Bytes).collect(),
    }
}

/// Collects inline scalars into typed data of the given datatype.
///
/// # Errors
///
/// Returns [`ElementError::Invalid`] for the first element that does not fit
/// `datatype`.
pub fn from_scalars(
    values: &[Scalar],
    datatype: DataType,
) -> std::result::Result<TensorData, ElementError> {
    fn collect<T: Element>(values: &[Scalar]) -> std::result::Result<Vec<T>, ElementError> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                T::from_scalar(value).map_err(|reason| ElementError::Invalid { index, reason })
            })
            .collect()
    }

    let data = match datatype {
        DataType::Bool => TensorData::Bool(collect(values)?),
        DataType::Uint8 => TensorData::Uint8(collect(values)?),
        DataType::Uint16 => TensorData::Uint16(collect(values)?),
        DataType::Uint32 => TensorData::Uint32(collect(values)?),
        DataType::Uint64 => TensorData::Uint64(collect(values)?),
        DataType::Int8 => TensorData::Int8(collect(values)?),
        DataType::Int16 => TensorData::Int16(collect(values)?),
        DataType::Int32 => TensorData::Int32(collect(values)?),
        DataType::Int64 => TensorData::Int64(collect(values)?),
        DataType::Fp16 => TensorData::Fp16(collect(values)?),
        DataType::Fp32 => TensorData::Fp32(collect(values)?),
        DataType::Fp64 => TensorData::Fp64(collect(values)?),
        DataType::Bf16 => TensorData::Bf16(collect(values)?),
        DataType::Bytes => TensorData::Bytes(collect(values)?),
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int32_wire_layout() {
        let raw = encode(&TensorData::Int32(vec![1, 2, 3])).unwrap();
        assert_eq!(raw, [1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]);
        assert_eq!(
            decode(&raw, DataType::Int32).unwrap(),
            TensorData::Int32(vec![1, 2, 3])
        );
    }

    #[test]
    fn short_fixed_width_buffer_is_misaligned() {
        let raw = encode(&TensorData::Int32(vec![1, 2, 3])).unwrap();
        match decode(&raw[..6], DataType::Int32) {
            Err(Error::Misaligned {
                datatype,
                len,
                width,
            }) => {
                assert_eq!(datatype, DataType::Int32);
                assert_eq!(len, 6);
                assert_eq!(width, 4);
            }
            other => panic!("expected Misaligned, got: {other:?}"),
        }
    }

    #[test]
    fn bool_encoding() {
        let raw = encode(&TensorData::Bool(vec![true, false, true])).unwrap();
        assert_eq!(raw, [1, 0, 1]);
        assert_eq!(
            decode(&[0, 2, 1], DataType::Bool).unwrap(),
            TensorData::Bool(vec![false, true, true])
        );
    }

    #[test]
    fn bytes_encoding_is_length_prefixed() {
        let raw = encode(&TensorData::from_strings(&["hello", "world"])).unwrap();
        // "hello" = 4-byte length (5) + 5 bytes = 9 bytes
        assert_eq!(raw.len(), 18);
        assert_eq!(&raw[..4], &5u32.to_le_bytes());
        assert_eq!(&raw[4..9], b"hello");
    }

    #[test]
    fn bytes_with_empty_elements() {
        let data = TensorData::Bytes(vec![vec![], b"x".to_vec(), vec![]]);
        let raw = encode(&data).unwrap();
        assert_eq!(raw.len(), 13);
        assert_eq!(decode(&raw, DataType::Bytes).unwrap(), data);
    }

    #[test]
    fn bytes_truncated_payload() {
        let mut raw = encode(&TensorData::from_strings(&["hello"])).unwrap();
        raw.truncate(7);
        match decode(&raw, DataType::Bytes) {
            Err(Error::Truncated {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 4);
                assert_eq!(needed, 5);
                assert_eq!(available, 7);
            }
            other => panic!("expected Truncated, got: {other:?}"),
        }
    }

    #[test]
    fn bytes_partial_length_prefix() {
        match decode(&[5, 0], DataType::Bytes) {
            Err(Error::Truncated { offset, needed, .. }) => {
                assert_eq!(offset, 0);
                assert_eq!(needed, 4);
            }
            other => panic!("expected Truncated, got: {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_empty_array() {
        for dt in DataType::ALL {
            let data = decode(&[], dt).unwrap();
            assert!(data.is_empty(), "{dt} should decode to an empty array");
            assert_eq!(data.datatype(), dt);
        }
    }

    #[test]
    fn fp16_uses_ieee_half_layout() {
        // FP16: 1.0 = 0x3C00, 2.0 = 0x4000, -0.5 = 0xB800
        let raw = [0x00, 0x3C, 0x00, 0x40, 0x00, 0xB8];
        assert_eq!(
            decode(&raw, DataType::Fp16).unwrap(),
            TensorData::Fp16(vec![1.0, 2.0, -0.5])
        );
        assert_eq!(
            encode(&TensorData::Fp16(vec![1.0, 2.0, -0.5])).unwrap(),
            raw
        );
    }

    #[test]
    fn bf16_shifts_into_high_bits() {
        // BF16 1.0 is the top half of f32 1.0 (0x3F800000).
        let raw = [0x80, 0x3F, 0xC0, 0xBF];
        assert_eq!(
            decode(&raw, DataType::Bf16).unwrap(),
            TensorData::Bf16(vec![1.0, -1.5])
        );
        assert_eq!(encode(&TensorData::Bf16(vec![1.0, -1.5])).unwrap(), raw);
    }

    #[test]
    fn encoded_len_matches_encode() {
        let samples = [
            TensorData::Fp64(vec![1.0, 2.0]),
            TensorData::Int16(vec![1, 2, 3]),
            TensorData::from_strings(&["a", "bcd"]),
            TensorData::Bool(vec![]),
        ];
        for data in &samples {
            assert_eq!(encoded_len(data), encode(data).unwrap().len());
        }
    }

    #[test]
    fn flatten_preserves_order_and_kind() {
        assert_eq!(
            flatten(&TensorData::Int8(vec![-1, 2])),
            vec![Scalar::Int(-1), Scalar::Int(2)]
        );
        assert_eq!(
            flatten(&TensorData::Uint16(vec![7])),
            vec![Scalar::Uint(7)]
        );
        assert_eq!(
            flatten(&TensorData::Fp32(vec![0.5])),
            vec![Scalar::Float(0.5)]
        );
        assert_eq!(
            flatten(&TensorData::from_strings(&["a"])),
            vec![Scalar::Bytes(b"a".to_vec())]
        );
    }

    #[test]
    fn scalars_collect_into_declared_type() {
        let values = [Scalar::Int(3), Scalar::Uint(4)];
        assert_eq!(
            from_scalars(&values, DataType::Uint8).unwrap(),
            TensorData::Uint8(vec![3, 4])
        );
        assert_eq!(
            from_scalars(&values, DataType::Fp64).unwrap(),
            TensorData::Fp64(vec![3.0, 4.0])
        );
        match from_scalars(&[Scalar::Int(1), Scalar::Int(-1)], DataType::Uint32) {
            Err(ElementError::Invalid { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected invalid element, got: {other:?}"),
        }
    }

    #[test]
    fn element_extraction_checks_type() {
        assert_eq!(
            i32::from_tensor_data(TensorData::Int32(vec![4])).unwrap(),
            vec![4]
        );
        assert_eq!(
            i64::from_tensor_data(TensorData::Int32(vec![4])),
            Err(ElementError::WrongType(DataType::Int32))
        );
        assert_eq!(
            f32::from_tensor_data(TensorData::Fp16(vec![1.0])).unwrap(),
            vec![1.0]
        );
        assert!(String::from_tensor_data(TensorData::Bytes(vec![vec![0xFF]])).is_err());
    }

    #[test]
    fn scalar_conversion() {
        assert_eq!(u8::from_scalar(&Scalar::Int(200)), Ok(200));
        assert!(u8::from_scalar(&Scalar::Int(-1)).is_err());
        assert!(i8::from_scalar(&Scalar::Uint(300)).is_err());
        assert_eq!(f64::from_scalar(&Scalar::Int(3)), Ok(3.0));
        assert!(bool::from_scalar(&Scalar::Int(1)).is_err());
        assert_eq!(
            String::from_scalar(&Scalar::Bytes(b"hi".to_vec())),
            Ok("hi".to_owned())
        );
    }

    #[test]
    fn from_native_vectors() {
        assert_eq!(TensorData::from(vec![1u64]).datatype(), DataType::Uint64);
        assert_eq!(TensorData::from(vec!["a"]).datatype(), DataType::Bytes);
        assert_eq!(
            TensorData::from(vec![half::f16::from_f32(0.5)]),
            TensorData::Fp16(vec![0.5])
        );
        assert_eq!(
            TensorData::from(&[1.0f32, 2.0][..]),
            TensorData::Fp32(vec![1.0, 2.0])
        );
    }

    #[test]
    fn inline_bytes_must_be_utf8() {
        assert_eq!(
            serde_json::to_string(&Scalar::Bytes(b"ok".to_vec())).unwrap(),
            "\"ok\""
        );
        assert!(serde_json::to_string(&Scalar::Bytes(vec![0xFF, 0xFE])).is_err());
    }

    #[test]
    fn non_finite_floats_have_no_inline_form() {
        assert_eq!(serde_json::to_string(&Scalar::Float(0.5)).unwrap(), "0.5");
        assert!(serde_json::to_string(&Scalar::Float(f64::NAN)).is_err());
        assert!(serde_json::to_string(&Scalar::Float(f64::NEG_INFINITY)).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn round_trip(data: &TensorData) -> TensorData {
        let raw = encode(data).unwrap();
        assert_eq!(raw.len(), encoded_len(data));
        decode(&raw, data.datatype()).unwrap()
    }

    fn finite_f32() -> impl Strategy<Value = f32> {
        prop::num::f32::NORMAL | prop::num::f32::ZERO | prop::num::f32::SUBNORMAL
    }

    proptest! {
        #[test]
        fn integers_round_trip(
            a in proptest::collection::vec(any::<i8>(), 0..64),
            b in proptest::collection::vec(any::<i16>(), 0..64),
            c in proptest::collection::vec(any::<i32>(), 0..64),
            d in proptest::collection::vec(any::<i64>(), 0..64),
            e in proptest::collection::vec(any::<u16>(), 0..64),
            f in proptest::collection::vec(any::<u32>(), 0..64),
            g in proptest::collection::vec(any::<u64>(), 0..64),
            h in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            for data in [
                TensorData::Int8(a),
                TensorData::Int16(b),
                TensorData::Int32(c),
                TensorData::Int64(d),
                TensorData::Uint16(e),
                TensorData::Uint32(f),
                TensorData::Uint64(g),
                TensorData::Uint8(h),
            ] {
                prop_assert_eq!(round_trip(&data), data);
            }
        }

        #[test]
        fn floats_round_trip(
            a in proptest::collection::vec(finite_f32(), 0..64),
            b in proptest::collection::vec(prop::num::f64::NORMAL | prop::num::f64::ZERO, 0..64),
        ) {
            let fp32 = TensorData::Fp32(a);
            let fp64 = TensorData::Fp64(b);
            prop_assert_eq!(round_trip(&fp32), fp32);
            prop_assert_eq!(round_trip(&fp64), fp64);
        }

        #[test]
        fn half_precision_round_trip(bits in proptest::collection::vec(any::<u16>(), 0..64)) {
            let fp16: Vec<f32> = bits
                .iter()
                .map(|&b| half::f16::from_bits(b))
                .filter(|h| !h.is_nan())
                .map(half::f16::to_f32)
                .collect();
            let bf16: Vec<f32> = bits
                .iter()
                .map(|&b| half::bf16::from_bits(b))
                .filter(|h| !h.is_nan())
                .map(half::bf16::to_f32)
                .collect();
            let fp16 = TensorData::Fp16(fp16);
            let bf16 = TensorData::Bf16(bf16);
            prop_assert_eq!(round_trip(&fp16), fp16);
            prop_assert_eq!(round_trip(&bf16), bf16);
        }

        #[test]
        fn bools_round_trip(values in proptest::collection::vec(any::<bool>(), 0..64)) {
            let data = TensorData::Bool(values);
            prop_assert_eq!(round_trip(&data), data);
        }

        #[test]
        fn arbitrary_bytes_round_trip(
            items in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 0..16),
        ) {
            let data = TensorData::Bytes(items);
            prop_assert_eq!(round_trip(&data), data);
        }

        #[test]
        fn truncated_bytes_never_decode(
            items in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..16), 1..8),
            seed in any::<usize>(),
        ) {
            // Cut strictly inside the last record so no record boundary is hit.
            let last = 4 + items.last().map_or(0, Vec::len);
            let cut = 1 + seed % (last - 1);
            let raw = encode(&TensorData::Bytes(items)).unwrap();
            let keep = raw.len() - cut;
            prop_assert!(decode(&raw[..keep], DataType::Bytes).is_err());
        }
    }
}
