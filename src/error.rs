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

//! Error types for the tensor wire codec.
//!
//! This module defines [`Error`] -- the unified error type returned by all
//! fallible operations -- along with the [`Result`] type alias used throughout
//! the crate.
//!
//! Variants fall into four groups: construction errors raised while building
//! a request, framing errors raised while decoding bytes from the wire,
//! lookup errors for missing outputs, and type errors for outputs that exist
//! but cannot be read as the requested element type.

use crate::compression::CompressionAlgorithm;
use crate::datatype::DataType;

/// Convenience alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that may occur while encoding requests or decoding responses.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An inference input or request was constructed with invalid parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A custom request parameter used a key owned by the request options.
    #[error("parameter '{key}' is reserved and cannot be set as a custom parameter")]
    ReservedParameter {
        /// The colliding key.
        key: String,
    },

    /// A datatype string is unknown or has no encoding for the requested use.
    #[error("unsupported data type: {0}")]
    UnsupportedDataType(String),

    /// A wire envelope did not have the expected structure.
    #[error("malformed envelope: {0}")]
    Framing(String),

    /// A JSON header could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A protobuf message could not be decoded.
    #[error("protobuf decode error: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// A body could not be compressed or decompressed.
    #[error("{algorithm} stream error: {source}")]
    Compression {
        /// The algorithm in use.
        algorithm: CompressionAlgorithm,
        /// The underlying I/O error from the codec.
        #[source]
        source: std::io::Error,
    },

    /// A fixed-width buffer length is not a multiple of the element width.
    #[error("{len} bytes cannot hold {datatype} elements: not a multiple of {width}")]
    Misaligned {
        /// The datatype being decoded.
        datatype: DataType,
        /// The buffer length in bytes.
        len: usize,
        /// The element width in bytes.
        width: usize,
    },

    /// A read would run past the end of a buffer.
    #[error("read of {needed} bytes at offset {offset} exceeds buffer of {available} bytes")]
    Truncated {
        /// Offset at which the read starts.
        offset: usize,
        /// Number of bytes the read needs.
        needed: usize,
        /// Total bytes available.
        available: usize,
    },

    /// The requested output is not present in the response.
    #[error("output '{name}' not found in response")]
    OutputNotFound {
        /// The requested output name.
        name: String,
    },

    /// The output exists but its datatype does not match the requested type.
    #[error("output '{name}' has datatype {declared}, which cannot be read as {requested}")]
    TypeMismatch {
        /// The output name.
        name: String,
        /// The datatype of the requested element type.
        requested: DataType,
        /// The datatype declared by the server.
        declared: String,
    },

    /// An inline output element could not be converted to the requested type.
    #[error("output '{name}' element {index} cannot be converted: {reason}")]
    Conversion {
        /// The output name.
        name: String,
        /// Index of the offending element.
        index: usize,
        /// Description of the failure.
        reason: String,
    },

    /// The output carries neither inline nor binary data.
    #[error("output '{name}' has no inline or binary data")]
    MissingData {
        /// The output name.
        name: String,
    },

    /// Decoding the data of a named output failed.
    #[error("output '{name}': {source}")]
    Output {
        /// The output name.
        name: String,
        /// The codec error.
        #[source]
        source: Box<Error>,
    },

    /// The server reported an error in place of a result.
    #[error("server error: {0}")]
    Server(String),

    /// A streaming inference response contained an error message.
    #[error("stream inference error: {0}")]
    StreamInference(String),

    /// The server returned a response that could not be interpreted.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Attaches an output name to a codec error.
    pub(crate) fn for_output(self, name: &str) -> Self {
        Self::Output {
            name: name.to_owned(),
            source: Box::new(self),
        }
    }
}
