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

//! Envelope formats for carrying requests and responses over a transport.
//!
//! Request validation and the reserved-parameter policy live in
//! [`crate::infer`]; a [`WireFormat`] only builds and parses the envelope.
//! Two formats are provided:
//!
//! - [`GrpcFormat`] -- protobuf `ModelInferRequest`/`ModelInferResponse`
//!   messages with binary data in `raw_input_contents`/`raw_output_contents`.
//! - [`HttpFormat`] -- a JSON header followed by a binary region in one body,
//!   sized by the `Inference-Header-Content-Length` header.
//!
//! # Example
//!
//! ```rust
//! use triton_wire::datatype::DataType;
//! use triton_wire::infer::{InferInput, InferRequestBuilder};
//! use triton_wire::transport::{GrpcFormat, HttpFormat, WireFormat};
//!
//! let build = || {
//!     InferRequestBuilder::new("simple")
//!         .input(InferInput::new("INPUT0", vec![2], DataType::Int32).with_data(vec![1, 2]))
//!         .build()
//! };
//!
//! let grpc = GrpcFormat::encode_request(build()?)?;
//! assert_eq!(grpc.raw_input_contents.len(), 1);
//!
//! let http = HttpFormat::encode_request(build()?)?;
//! assert_eq!(http.header_length(), Some(http.json_size()));
//! # Ok::<(), triton_wire::error::Error>(())
//! ```

pub mod grpc;
pub mod http;

pub use grpc::GrpcFormat;
pub use http::{HttpFormat, HttpInferRequest, HttpInferResponse};

use crate::error::Result;
use crate::infer::InferRequest;
use crate::response::InferResult;

/// A request/response envelope format.
pub trait WireFormat {
    /// The encoded request envelope.
    type Request;
    /// The raw response envelope as received from the transport.
    type Response;

    /// Encodes a validated request into this format's envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be represented in this format.
    fn encode_request(request: InferRequest) -> Result<Self::Request>;

    /// Parses a response envelope into an [`InferResult`].
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope is malformed or reports a failure.
    fn decode_response(response: Self::Response) -> Result<InferResult>;
}
