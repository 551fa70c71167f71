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

//! JSON-plus-binary envelope used by the HTTP transport.
//!
//! A body is a UTF-8 JSON header, optionally followed by a binary region.
//! When a binary region is present the `Inference-Header-Content-Length`
//! header gives the JSON length; each tensor sent as binary data declares
//! its size with a `binary_data_size` parameter, and the binary region holds
//! those tensors back to back in declaration order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::codec::{self, Scalar, TensorData};
use crate::compression::CompressionAlgorithm;
use crate::error::{Error, Result};
use crate::infer::{InferRequest, BINARY_DATA_SIZE};
use crate::parameter::{InferParameter, Parameters};
use crate::response::{BufferRegion, InferResult, OutputTensor};

use super::WireFormat;

/// Header carrying the JSON length of a body with a binary region.
pub const HEADER_CONTENT_LENGTH: &str = "Inference-Header-Content-Length";
/// Header naming the body compression.
pub const CONTENT_ENCODING: &str = "Content-Encoding";
/// Header asking the server to compress the response body.
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
/// Header describing the body media type.
pub const CONTENT_TYPE: &str = "Content-Type";

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// An encoded HTTP inference request body and its headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpInferRequest {
    body: Vec<u8>,
    json_size: usize,
    has_binary: bool,
    content_encoding: CompressionAlgorithm,
    accept_encoding: CompressionAlgorithm,
}

impl HttpInferRequest {
    /// Returns the (possibly compressed) request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the request and returns the body.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Returns the length of the JSON header before compression.
    #[must_use]
    pub fn json_size(&self) -> usize {
        self.json_size
    }

    /// Returns the value for `Inference-Header-Content-Length`, which is only
    /// sent when the body has a binary region.
    #[must_use]
    pub fn header_length(&self) -> Option<usize> {
        self.has_binary.then_some(self.json_size)
    }

    /// Returns the headers to send with the body.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(4);
        let content_type = if self.has_binary {
            "application/octet-stream"
        } else {
            "application/json"
        };
        headers.push((CONTENT_TYPE, content_type.to_owned()));
        if let Some(len) = self.header_length() {
            headers.push((HEADER_CONTENT_LENGTH, len.to_string()));
        }
        if let Some(value) = self.content_encoding.header_value() {
            headers.push((CONTENT_ENCODING, value.to_owned()));
        }
        if let Some(value) = self.accept_encoding.header_value() {
            headers.push((ACCEPT_ENCODING, value.to_owned()));
        }
        headers
    }
}

/// A received HTTP inference response: the raw body plus the headers that
/// shape its parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpInferResponse {
    body: Vec<u8>,
    header_length: Option<String>,
    content_encoding: Option<String>,
}

impl HttpInferResponse {
    /// Wraps a response body received without special headers.
    #[must_use]
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    /// Wraps a response body, picking the relevant headers out of `headers`.
    ///
    /// Header names are matched case-insensitively.
    #[must_use]
    pub fn from_headers<I, K, V>(body: Vec<u8>, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut response = Self::new(body);
        for (name, value) in headers {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case(HEADER_CONTENT_LENGTH) {
                response.header_length = Some(value.as_ref().to_owned());
            } else if name.eq_ignore_ascii_case(CONTENT_ENCODING) {
                response.content_encoding = Some(value.as_ref().to_owned());
            }
        }
        response
    }

    /// Sets the JSON header length of a body with a binary region.
    #[must_use]
    pub fn with_header_length(self, len: usize) -> Self {
        Self {
            header_length: Some(len.to_string()),
            ..self
        }
    }

    /// Sets the `Content-Encoding` of the body.
    #[must_use]
    pub fn with_content_encoding(self, encoding: impl Into<String>) -> Self {
        Self {
            content_encoding: Some(encoding.into()),
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// JSON documents
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RequestHeader {
    #[serde(skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    parameters: Parameters,
    inputs: Vec<InputHeader>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    outputs: Vec<RequestedOutputHeader>,
}

#[derive(Serialize)]
struct InputHeader {
    name: String,
    shape: Vec<i64>,
    datatype: &'static str,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Vec<Scalar>>,
}

#[derive(Serialize)]
struct RequestedOutputHeader {
    name: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    parameters: Parameters,
}

#[derive(Deserialize)]
struct ResponseHeader {
    #[serde(default)]
    model_name: String,
    #[serde(default)]
    model_version: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    parameters: Parameters,
    #[serde(default)]
    outputs: Vec<OutputHeader>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OutputHeader {
    name: String,
    datatype: String,
    #[serde(default)]
    shape: Vec<i64>,
    #[serde(default)]
    parameters: Parameters,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// HttpFormat
// ---------------------------------------------------------------------------

/// The HTTP/JSON envelope format.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFormat;

impl WireFormat for HttpFormat {
    type Request = HttpInferRequest;
    type Response = HttpInferResponse;

    fn encode_request(request: InferRequest) -> Result<Self::Request> {
        let mut binary = Vec::new();
        let mut has_binary = false;
        let mut inputs = Vec::with_capacity(request.inputs.len());

        for input in request.inputs {
            let (descriptor, payload, binary_flag) = input.into_parts();
            let mut parameters = descriptor.parameters;
            let data = match payload.binary_segment(binary_flag)? {
                Some(segment) => {
                    trace!(input = %descriptor.name, bytes = segment.len(), "binary input segment");
                    parameters.insert(
                        BINARY_DATA_SIZE.to_owned(),
                        InferParameter::Uint64(segment.len() as u64),
                    );
                    binary.extend_from_slice(&segment);
                    has_binary = true;
                    None
                }
                None => match payload.typed() {
                    Some(typed) => Some(inline_values(&descriptor.name, typed)?),
                    None => None,
                },
            };
            inputs.push(InputHeader {
                name: descriptor.name,
                shape: descriptor.shape,
                datatype: descriptor.datatype.as_str(),
                parameters,
                data,
            });
        }

        let outputs = request
            .outputs
            .iter()
            .map(|output| RequestedOutputHeader {
                name: output.name().to_owned(),
                parameters: output.wire_parameters(true),
            })
            .collect();

        let header = RequestHeader {
            id: request.id,
            parameters: request.parameters,
            inputs,
            outputs,
        };
        let mut body = serde_json::to_vec(&header)?;
        let json_size = body.len();
        body.extend_from_slice(&binary);
        let body = request.request_compression.compress(body)?;

        debug!(
            model = %request.model_name,
            json_size,
            binary_bytes = binary.len(),
            body_bytes = body.len(),
            "encoded HTTP infer request"
        );

        Ok(HttpInferRequest {
            body,
            json_size,
            has_binary,
            content_encoding: request.request_compression,
            accept_encoding: request.response_compression,
        })
    }

    fn decode_response(response: Self::Response) -> Result<InferResult> {
        let algorithm = response
            .content_encoding
            .as_deref()
            .map(CompressionAlgorithm::from_header)
            .transpose()?
            .unwrap_or_default();
        let body = algorithm.decompress(response.body)?;

        let json_len = match response.header_length.as_deref() {
            None => body.len(),
            Some(raw) => {
                let len = raw.trim().parse::<usize>().map_err(|_| {
                    Error::Framing(format!("invalid {HEADER_CONTENT_LENGTH} '{raw}'"))
                })?;
                if len > body.len() {
                    return Err(Error::Framing(format!(
                        "{HEADER_CONTENT_LENGTH} {len} exceeds body of {} bytes",
                        body.len()
                    )));
                }
                len
            }
        };

        let (json, binary) = body.split_at(json_len);
        let header: ResponseHeader = serde_json::from_slice(json)?;
        if let Some(message) = header.error {
            return Err(Error::Server(message));
        }

        let mut regions = HashMap::new();
        let mut outputs: Vec<OutputTensor> = Vec::with_capacity(header.outputs.len());
        let mut offset = 0usize;

        for output in header.outputs {
            if outputs.iter().any(|o| o.name == output.name) {
                return Err(Error::Framing(format!(
                    "output '{}' appears more than once",
                    output.name
                )));
            }
            let data = match output.parameters.get(BINARY_DATA_SIZE) {
                Some(size) => {
                    let len = size.as_usize().ok_or_else(|| {
                        Error::Framing(format!(
                            "output '{}' has invalid {BINARY_DATA_SIZE}",
                            output.name
                        ))
                    })?;
                    regions.insert(output.name.clone(), BufferRegion { offset, len });
                    offset = offset.checked_add(len).ok_or_else(|| {
                        Error::Framing("binary data sizes overflow".into())
                    })?;
                    None
                }
                None => match output.data {
                    Some(value) => {
                        let mut values = Vec::new();
                        flatten_json(value, &mut values)
                            .map_err(|e| e.for_output(&output.name))?;
                        Some(values)
                    }
                    None => None,
                },
            };
            outputs.push(OutputTensor {
                name: output.name,
                datatype: output.datatype,
                shape: output.shape,
                parameters: output.parameters,
                data,
            });
        }

        if offset != binary.len() {
            return Err(Error::Framing(format!(
                "outputs declare {offset} bytes of binary data but the body carries {}",
                binary.len()
            )));
        }

        debug!(
            model = %header.model_name,
            outputs = outputs.len(),
            json_len,
            buffer_bytes = binary.len(),
            "decoded HTTP infer response"
        );

        Ok(InferResult {
            model_name: header.model_name,
            model_version: header.model_version,
            id: header.id,
            parameters: header.parameters,
            outputs,
            buffer: binary.to_vec(),
            regions,
        })
    }
}

/// Flattens typed input data for the JSON header. JSON has no NaN or
/// infinity, so non-finite floats must travel as binary data.
fn inline_values(name: &str, data: &TensorData) -> Result<Vec<Scalar>> {
    let values = codec::flatten(data);
    if let Some(index) = values
        .iter()
        .position(|v| matches!(v, Scalar::Float(f) if !f.is_finite()))
    {
        return Err(Error::InvalidInput(format!(
            "input '{name}' element {index} is not finite and cannot be sent as inline JSON; send it as binary data"
        )));
    }
    Ok(values)
}

/// Flattens a (possibly nested) JSON `data` array in row-major order.
fn flatten_json(value: serde_json::Value, out: &mut Vec<Scalar>) -> Result<()> {
    use serde_json::Value;

    match value {
        Value::Array(items) => {
            for item in items {
                flatten_json(item, out)?;
            }
        }
        Value::Bool(b) => out.push(Scalar::Bool(b)),
        Value::String(s) => out.push(Scalar::Bytes(s.into_bytes())),
        Value::Number(n) => {
            let scalar = if let Some(v) = n.as_i64() {
                Scalar::Int(v)
            } else if let Some(v) = n.as_u64() {
                Scalar::Uint(v)
            } else {
                Scalar::Float(
                    n.as_f64()
                        .ok_or_else(|| Error::Framing(format!("unrepresentable number {n}")))?,
                )
            };
            out.push(scalar);
        }
        other => {
            return Err(Error::Framing(format!(
                "unexpected {other} in output data"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;
    use crate::infer::{InferInput, InferRequestBuilder, InferRequestedOutput};

    fn json(request: &HttpInferRequest) -> serde_json::Value {
        serde_json::from_slice(&request.body()[..request.json_size()]).unwrap()
    }

    #[test]
    fn binary_input_is_appended_after_json() {
        let request = InferRequestBuilder::new("m")
            .input(InferInput::new("x", vec![2], DataType::Int32).with_data(vec![1i32, 2]))
            .output("y")
            .build()
            .unwrap();
        let encoded = HttpFormat::encode_request(request).unwrap();

        let header = json(&encoded);
        assert_eq!(header["inputs"][0]["parameters"]["binary_data_size"], 8);
        assert!(header["inputs"][0].get("data").is_none());
        assert_eq!(header["outputs"][0]["parameters"]["binary_data"], true);
        assert!(header.get("id").is_none());
        assert_eq!(&encoded.body()[encoded.json_size()..], &[1, 0, 0, 0, 2, 0, 0, 0]);
        assert!(encoded
            .headers()
            .contains(&(HEADER_CONTENT_LENGTH, encoded.json_size().to_string())));
    }

    #[test]
    fn inline_input_goes_into_json() {
        let request = InferRequestBuilder::new("m")
            .request_id("r1")
            .input(
                InferInput::new("words", vec![2], DataType::Bytes)
                    .with_data(vec!["hi", "there"])
                    .binary_data(false),
            )
            .build()
            .unwrap();
        let encoded = HttpFormat::encode_request(request).unwrap();
        assert_eq!(encoded.header_length(), None);
        assert_eq!(encoded.json_size(), encoded.body().len());

        let header = json(&encoded);
        assert_eq!(header["id"], "r1");
        assert_eq!(header["inputs"][0]["data"], serde_json::json!(["hi", "there"]));
        assert_eq!(header["parameters"]["binary_data_output"], true);
        assert!(encoded
            .headers()
            .contains(&(CONTENT_TYPE, "application/json".to_owned())));
    }

    #[test]
    fn shared_memory_input_has_no_data() {
        let request = InferRequestBuilder::new("m")
            .input(InferInput::new("x", vec![4], DataType::Fp32).with_shared_memory("r", 16, 0))
            .output_with(InferRequestedOutput::new("y").binary_data(false))
            .build()
            .unwrap();
        let encoded = HttpFormat::encode_request(request).unwrap();
        let header = json(&encoded);
        assert_eq!(header["inputs"][0]["parameters"]["shared_memory_region"], "r");
        assert!(header["inputs"][0].get("data").is_none());
        assert_eq!(header["outputs"][0]["parameters"]["binary_data"], false);
    }

    #[test]
    fn compressed_request_advertises_encoding() {
        let request = InferRequestBuilder::new("m")
            .options(
                crate::infer::InferOptions::default()
                    .request_compression(CompressionAlgorithm::Gzip)
                    .response_compression(CompressionAlgorithm::Deflate),
            )
            .input(InferInput::new("x", vec![64], DataType::Uint8).with_data(vec![3u8; 64]))
            .build()
            .unwrap();
        let encoded = HttpFormat::encode_request(request).unwrap();
        let headers = encoded.headers();
        assert!(headers.contains(&(CONTENT_ENCODING, "gzip".to_owned())));
        assert!(headers.contains(&(ACCEPT_ENCODING, "deflate".to_owned())));

        let plain = CompressionAlgorithm::Gzip
            .decompress(encoded.into_body())
            .unwrap();
        assert_eq!(&plain[plain.len() - 64..], &[3u8; 64]);
    }

    #[test]
    fn nested_inline_data_is_flattened() {
        let body = br#"{"model_name":"m","outputs":[{"name":"o","datatype":"INT64","shape":[2,2],"data":[[1,2],[3,4]]}]}"#;
        let result = HttpFormat::decode_response(HttpInferResponse::new(body.to_vec())).unwrap();
        assert_eq!(result.output_as::<i64>("o").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(result.output("o").unwrap().shape(), &[2, 2]);
    }

    #[test]
    fn inline_output_between_binary_outputs() {
        let json = br#"{"outputs":[
            {"name":"a","datatype":"INT32","shape":[1],"parameters":{"binary_data_size":4}},
            {"name":"b","datatype":"INT32","shape":[1],"data":[5]},
            {"name":"c","datatype":"INT32","shape":[1],"parameters":{"binary_data_size":4}}]}"#;
        let mut body = json.to_vec();
        body.extend_from_slice(&1i32.to_le_bytes());
        body.extend_from_slice(&3i32.to_le_bytes());
        let result = HttpFormat::decode_response(
            HttpInferResponse::new(body).with_header_length(json.len()),
        )
        .unwrap();

        assert_eq!(result.binary_offset("a"), Some(0));
        assert_eq!(result.binary_offset("b"), None);
        assert_eq!(result.binary_offset("c"), Some(4));
        assert_eq!(result.output_as::<i32>("a").unwrap(), vec![1]);
        assert_eq!(result.output_as::<i32>("b").unwrap(), vec![5]);
        assert_eq!(result.output_as::<i32>("c").unwrap(), vec![3]);
    }

    #[test]
    fn non_finite_inline_floats_are_rejected() {
        let build = |binary| {
            InferRequestBuilder::new("m")
                .input(
                    InferInput::new("x", vec![2], DataType::Fp32)
                        .with_data(vec![f32::NAN, f32::INFINITY])
                        .binary_data(binary),
                )
                .build()
                .unwrap()
        };
        assert!(matches!(
            HttpFormat::encode_request(build(false)),
            Err(Error::InvalidInput(msg)) if msg.contains("'x'") && msg.contains("element 0")
        ));

        let encoded = HttpFormat::encode_request(build(true)).unwrap();
        assert_eq!(json(&encoded)["inputs"][0]["parameters"]["binary_data_size"], 8);
    }

    #[test]
    fn error_document_is_a_server_error() {
        let body = br#"{"error":"unknown model 'm'"}"#.to_vec();
        assert!(matches!(
            HttpFormat::decode_response(HttpInferResponse::new(body)),
            Err(Error::Server(msg)) if msg.contains("unknown model")
        ));
    }

    #[test]
    fn binary_sizes_must_cover_the_region() {
        let json = br#"{"outputs":[{"name":"o","datatype":"FP32","shape":[1],"parameters":{"binary_data_size":4}}]}"#;
        let mut body = json.to_vec();
        body.extend_from_slice(&[0; 8]);
        let response = HttpInferResponse::new(body).with_header_length(json.len());
        assert!(matches!(
            HttpFormat::decode_response(response),
            Err(Error::Framing(_))
        ));
    }

    #[test]
    fn header_length_beyond_body_is_rejected() {
        let response = HttpInferResponse::new(b"{}".to_vec()).with_header_length(3);
        assert!(matches!(
            HttpFormat::decode_response(response),
            Err(Error::Framing(_))
        ));
        let response = HttpInferResponse::from_headers(
            b"{}".to_vec(),
            [("inference-header-content-length", "two")],
        );
        assert!(matches!(
            HttpFormat::decode_response(response),
            Err(Error::Framing(_))
        ));
    }

    #[test]
    fn unknown_content_encoding_is_rejected() {
        let response = HttpInferResponse::from_headers(b"{}".to_vec(), [("content-encoding", "br")]);
        assert!(matches!(
            HttpFormat::decode_response(response),
            Err(Error::Framing(_))
        ));
        let response =
            HttpInferResponse::from_headers(b"{}".to_vec(), [("Content-Encoding", "identity")]);
        assert!(HttpFormat::decode_response(response).unwrap().outputs().is_empty());
    }

    #[test]
    fn malformed_json_is_reported() {
        let response = HttpInferResponse::new(b"{\"outputs\": [".to_vec());
        assert!(matches!(
            HttpFormat::decode_response(response),
            Err(Error::Json(_))
        ));
        let response = HttpInferResponse::new(
            br#"{"outputs":[{"name":"o","datatype":"FP32","data":[{"x":1}]}]}"#.to_vec(),
        );
        assert!(matches!(
            HttpFormat::decode_response(response),
            Err(Error::Output { .. })
        ));
    }
}
