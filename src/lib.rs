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

//! Tensor wire codec and request/response framing for NVIDIA Triton
//! Inference Server.
//!
//! This crate turns typed tensors into the bytes the Triton (KServe v2)
//! inference protocol expects, and turns response bytes back into typed
//! tensors. It builds and parses the envelopes of both transports, but does
//! not open connections: hand the encoded request to any gRPC or HTTP client
//! and feed the received response back in.
//!
//! # Quick Start
//!
//! ```rust
//! use triton_wire::datatype::DataType;
//! use triton_wire::infer::{InferInput, InferRequestBuilder};
//! use triton_wire::transport::{HttpFormat, HttpInferResponse, WireFormat};
//!
//! # fn example() -> triton_wire::error::Result<()> {
//! // Build and encode an inference request.
//! let input = InferInput::new("input0", vec![1, 4], DataType::Fp32)
//!     .with_data(vec![0.5_f32; 4]);
//!
//! let request = InferRequestBuilder::new("my_model")
//!     .model_version("1")
//!     .input(input)
//!     .output("output0")
//!     .build()?;
//! let encoded = HttpFormat::encode_request(request)?;
//! # let _ = encoded.headers();
//!
//! // ... send `encoded.body()` with `encoded.headers()`, then parse the reply.
//! let body = br#"{"model_name":"my_model","outputs":[{"name":"output0","datatype":"FP32","shape":[2],"data":[1.5,2.5]}]}"#;
//! let result = HttpFormat::decode_response(HttpInferResponse::new(body.to_vec()))?;
//! assert_eq!(result.output_as::<f32>("output0")?, vec![1.5, 2.5]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Modules
//!
//! - [`datatype`] -- The [`DataType`](datatype::DataType) registry.
//! - [`codec`] -- Binary tensor encoding and decoding.
//! - [`infer`] -- Builder types for inference requests.
//! - [`transport`] -- The gRPC and HTTP envelope formats.
//! - [`response`] -- The decoded [`InferResult`](response::InferResult).
//! - [`parameter`] -- Request, tensor, and response parameters.
//! - [`compression`] -- Body compression for the HTTP transport.
//! - [`error`] -- Error types and the [`Result`](error::Result) alias.
//! - [`generated`] -- Protobuf message types for the gRPC transport.

pub mod codec;
pub mod compression;
pub mod datatype;
pub mod error;
pub mod generated;
pub mod infer;
pub mod parameter;
pub mod response;
pub mod transport;

pub use codec::{Element, Scalar, TensorData};
pub use datatype::DataType;
pub use error::{Error, Result};
pub use infer::{InferInput, InferOptions, InferRequest, InferRequestBuilder, InferRequestedOutput};
pub use response::InferResult;
pub use transport::{GrpcFormat, HttpFormat, WireFormat};
