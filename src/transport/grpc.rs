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

//! Protobuf envelope used by the gRPC transport.
//!
//! Binary input data travels in `raw_input_contents`, one segment per binary
//! input in declaration order. Inline inputs use the typed fields of
//! `InferTensorContents`, which have no slot for FP16 or BF16.
//!
//! On the response side every output gets its own segment in
//! `raw_output_contents` (or none at all). The segments are concatenated
//! into the result buffer in output order.

use std::collections::HashMap;

use prost::Message;
use tracing::{debug, trace};

use crate::codec::{self, Scalar, TensorData};
use crate::error::{Error, Result};
use crate::generated::inference::{
    self, model_infer_request, InferTensorContents,
};
use crate::infer::{InferInput, InferRequest, InferRequestedOutput, InputPayload};
use crate::parameter::{from_proto_map, to_proto_map};
use crate::response::{BufferRegion, InferResult, OutputTensor};

use super::WireFormat;

/// The gRPC envelope format.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrpcFormat;

impl WireFormat for GrpcFormat {
    type Request = inference::ModelInferRequest;
    type Response = inference::ModelInferResponse;

    fn encode_request(request: InferRequest) -> Result<Self::Request> {
        let mut inputs = Vec::with_capacity(request.inputs.len());
        let mut raw_input_contents = Vec::new();
        for input in request.inputs {
            let (tensor, segment) = input_tensor(input)?;
            if let Some(segment) = segment {
                trace!(input = %tensor.name, bytes = segment.len(), "raw input segment");
                raw_input_contents.push(segment);
            }
            inputs.push(tensor);
        }

        let outputs = request.outputs.iter().map(requested_output).collect();

        debug!(
            model = %request.model_name,
            inputs = inputs.len(),
            raw_segments = raw_input_contents.len(),
            "encoded gRPC infer request"
        );

        Ok(inference::ModelInferRequest {
            model_name: request.model_name,
            model_version: request.model_version,
            id: request.id,
            parameters: to_proto_map(&request.parameters),
            inputs,
            outputs,
            raw_input_contents,
        })
    }

    fn decode_response(response: Self::Response) -> Result<InferResult> {
        let raw = response.raw_output_contents;
        if !raw.is_empty() && raw.len() != response.outputs.len() {
            return Err(Error::Framing(format!(
                "response has {} outputs but {} raw output segments",
                response.outputs.len(),
                raw.len()
            )));
        }

        let mut buffer = Vec::with_capacity(raw.iter().map(Vec::len).sum());
        let mut regions = HashMap::new();
        let mut outputs = Vec::with_capacity(response.outputs.len());
        let mut segments = raw.into_iter();

        for tensor in response.outputs {
            if outputs.iter().any(|o: &OutputTensor| o.name == tensor.name) {
                return Err(Error::Framing(format!(
                    "output '{}' appears more than once",
                    tensor.name
                )));
            }
            let parameters = from_proto_map(&tensor.parameters)?;
            let data = match segments.next() {
                Some(segment) => {
                    let region = BufferRegion {
                        offset: buffer.len(),
                        len: segment.len(),
                    };
                    buffer.extend_from_slice(&segment);
                    regions.insert(tensor.name.clone(), region);
                    None
                }
                None => tensor
                    .contents
                    .as_ref()
                    .and_then(|contents| contents_to_scalars(&tensor.datatype, contents)),
            };
            outputs.push(OutputTensor {
                name: tensor.name,
                datatype: tensor.datatype,
                shape: tensor.shape,
                parameters,
                data,
            });
        }

        debug!(
            model = %response.model_name,
            outputs = outputs.len(),
            buffer_bytes = buffer.len(),
            "decoded gRPC infer response"
        );

        Ok(InferResult {
            model_name: response.model_name,
            model_version: response.model_version,
            id: response.id,
            parameters: from_proto_map(&response.parameters)?,
            outputs,
            buffer,
            regions,
        })
    }
}

impl GrpcFormat {
    /// Decodes a serialized `ModelInferResponse` message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protobuf`] if the bytes are not a valid message, or
    /// any error from [`decode_response`](WireFormat::decode_response).
    pub fn decode_response_bytes(bytes: &[u8]) -> Result<InferResult> {
        let response = inference::ModelInferResponse::decode(bytes)?;
        Self::decode_response(response)
    }

    /// Decodes one message of a streaming inference call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamInference`] if the message carries an error
    /// message and [`Error::UnexpectedResponse`] if it carries no response.
    pub fn decode_stream_response(response: inference::ModelStreamInferResponse) -> Result<InferResult> {
        if !response.error_message.is_empty() {
            return Err(Error::StreamInference(response.error_message));
        }
        match response.infer_response {
            Some(infer_response) => Self::decode_response(infer_response),
            None => Err(Error::UnexpectedResponse(
                "stream response has no infer_response".into(),
            )),
        }
    }
}

fn input_tensor(input: InferInput) -> Result<(model_infer_request::InferInputTensor, Option<Vec<u8>>)> {
    let (descriptor, payload, binary) = input.into_parts();
    let segment = payload.binary_segment(binary)?;
    let contents = match (&segment, payload) {
        (None, InputPayload::Typed(data)) => Some(
            typed_contents(data)
                .map_err(|e| annotate_input(e, &descriptor.name))?,
        ),
        _ => None,
    };
    let tensor = model_infer_request::InferInputTensor {
        name: descriptor.name,
        datatype: descriptor.datatype.as_str().to_owned(),
        shape: descriptor.shape,
        parameters: to_proto_map(&descriptor.parameters),
        contents,
    };
    Ok((tensor, segment))
}

fn annotate_input(err: Error, name: &str) -> Error {
    match err {
        Error::UnsupportedDataType(msg) => Error::UnsupportedDataType(format!("input '{name}': {msg}")),
        other => other,
    }
}

fn requested_output(output: &InferRequestedOutput) -> model_infer_request::InferRequestedOutputTensor {
    model_infer_request::InferRequestedOutputTensor {
        name: output.name().to_owned(),
        parameters: to_proto_map(&output.wire_parameters(false)),
    }
}

/// Places typed data into the matching `InferTensorContents` field.
fn typed_contents(data: TensorData) -> Result<InferTensorContents> {
    let mut contents = InferTensorContents::default();
    match data {
        TensorData::Bool(v) => contents.bool_contents = v,
        TensorData::Int8(v) => contents.int_contents = v.into_iter().map(i32::from).collect(),
        TensorData::Int16(v) => contents.int_contents = v.into_iter().map(i32::from).collect(),
        TensorData::Int32(v) => contents.int_contents = v,
        TensorData::Int64(v) => contents.int64_contents = v,
        TensorData::Uint8(v) => contents.uint_contents = v.into_iter().map(u32::from).collect(),
        TensorData::Uint16(v) => contents.uint_contents = v.into_iter().map(u32::from).collect(),
        TensorData::Uint32(v) => contents.uint_contents = v,
        TensorData::Uint64(v) => contents.uint64_contents = v,
        TensorData::Fp32(v) => contents.fp32_contents = v,
        TensorData::Fp64(v) => contents.fp64_contents = v,
        TensorData::Bytes(v) => contents.bytes_contents = v,
        other @ (TensorData::Fp16(_) | TensorData::Bf16(_)) => {
            return Err(Error::UnsupportedDataType(format!(
                "{} has no typed contents field; send it as binary data",
                other.datatype()
            )));
        }
    }
    Ok(contents)
}

/// Reads the typed contents field selected by the declared datatype.
///
/// Datatypes without a typed field yield `None`; the output then has no
/// inline data.
fn contents_to_scalars(datatype: &str, contents: &InferTensorContents) -> Option<Vec<Scalar>> {
    let data = match datatype {
        "BOOL" => TensorData::Bool(contents.bool_contents.clone()),
        "INT8" | "INT16" | "INT32" => TensorData::Int32(contents.int_contents.clone()),
        "INT64" => TensorData::Int64(contents.int64_contents.clone()),
        "UINT8" | "UINT16" | "UINT32" => TensorData::Uint32(contents.uint_contents.clone()),
        "UINT64" => TensorData::Uint64(contents.uint64_contents.clone()),
        "FP32" => TensorData::Fp32(contents.fp32_contents.clone()),
        "FP64" => TensorData::Fp64(contents.fp64_contents.clone()),
        "BYTES" => TensorData::Bytes(contents.bytes_contents.clone()),
        _ => return None,
    };
    Some(codec::flatten(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;
    use crate::generated::inference::model_infer_response;
    use crate::infer::{InferInput, InferRequestBuilder, InferRequestedOutput};
    use crate::parameter::InferParameter;

    fn output_tensor(name: &str, datatype: &str) -> model_infer_response::InferOutputTensor {
        model_infer_response::InferOutputTensor {
            name: name.into(),
            datatype: datatype.into(),
            shape: vec![2],
            ..Default::default()
        }
    }

    #[test]
    fn binary_inputs_fill_raw_contents_in_order() {
        let request = InferRequestBuilder::new("m")
            .input(InferInput::new("a", vec![2], DataType::Int32).with_data(vec![1i32, 2]))
            .input(
                InferInput::new("b", vec![1], DataType::Fp32)
                    .with_data(vec![0.5f32])
                    .binary_data(false),
            )
            .input(InferInput::new("c", vec![1], DataType::Uint8).with_data_raw(vec![9]))
            .build()
            .unwrap();
        let proto = GrpcFormat::encode_request(request).unwrap();

        assert_eq!(proto.raw_input_contents.len(), 2);
        assert_eq!(proto.raw_input_contents[0], [1, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(proto.raw_input_contents[1], [9]);
        assert!(proto.inputs[0].contents.is_none());
        assert_eq!(
            proto.inputs[1].contents.as_ref().map(|c| c.fp32_contents.clone()),
            Some(vec![0.5])
        );
        assert_eq!(proto.inputs[2].datatype, "UINT8");
    }

    #[test]
    fn small_integers_widen_into_typed_fields() {
        let request = InferRequestBuilder::new("m")
            .input(
                InferInput::new("a", vec![2], DataType::Int8)
                    .with_data(vec![-1i8, 2])
                    .binary_data(false),
            )
            .input(
                InferInput::new("b", vec![1], DataType::Uint16)
                    .with_data(vec![7u16])
                    .binary_data(false),
            )
            .build()
            .unwrap();
        let proto = GrpcFormat::encode_request(request).unwrap();
        assert!(proto.raw_input_contents.is_empty());
        assert_eq!(proto.inputs[0].contents.as_ref().unwrap().int_contents, vec![-1, 2]);
        assert_eq!(proto.inputs[1].contents.as_ref().unwrap().uint_contents, vec![7]);
    }

    #[test]
    fn inline_half_precision_is_rejected() {
        let request = InferRequestBuilder::new("m")
            .input(
                InferInput::new("h", vec![1], DataType::Fp16)
                    .with_data(vec![half::f16::from_f32(1.0)])
                    .binary_data(false),
            )
            .build()
            .unwrap();
        match GrpcFormat::encode_request(request) {
            Err(Error::UnsupportedDataType(msg)) => assert!(msg.contains("'h'")),
            other => panic!("expected unsupported datatype, got: {other:?}"),
        }
    }

    #[test]
    fn requested_outputs_carry_classification() {
        let request = InferRequestBuilder::new("m")
            .output_with(InferRequestedOutput::new("probs").class_count(5))
            .sequence_id(11)
            .build()
            .unwrap();
        let proto = GrpcFormat::encode_request(request).unwrap();
        let params = &proto.outputs[0].parameters;
        assert_eq!(params.len(), 1);
        assert_eq!(
            InferParameter::from_proto("classification", &params["classification"]).unwrap(),
            InferParameter::Int64(5)
        );
        assert!(proto.parameters.contains_key("sequence_id"));
        assert!(!proto.parameters.contains_key("binary_data_output"));
    }

    #[test]
    fn raw_segments_are_concatenated() {
        let response = inference::ModelInferResponse {
            model_name: "m".into(),
            outputs: vec![output_tensor("x", "INT32"), output_tensor("y", "INT32")],
            raw_output_contents: vec![vec![1, 0, 0, 0, 2, 0, 0, 0], vec![3, 0, 0, 0, 4, 0, 0, 0]],
            ..Default::default()
        };
        let result = GrpcFormat::decode_response(response).unwrap();
        assert_eq!(result.buffer().len(), 16);
        assert_eq!(result.binary_offset("x"), Some(0));
        assert_eq!(result.binary_offset("y"), Some(8));
        assert_eq!(result.output_as::<i32>("y").unwrap(), vec![3, 4]);
    }

    #[test]
    fn segment_count_must_match_outputs() {
        let response = inference::ModelInferResponse {
            outputs: vec![output_tensor("x", "INT32"), output_tensor("y", "INT32")],
            raw_output_contents: vec![vec![0; 8]],
            ..Default::default()
        };
        assert!(matches!(
            GrpcFormat::decode_response(response),
            Err(Error::Framing(_))
        ));
    }

    #[test]
    fn typed_contents_decode_inline() {
        let mut tensor = output_tensor("x", "INT16");
        tensor.contents = Some(InferTensorContents {
            int_contents: vec![-3, 4],
            ..Default::default()
        });
        let response = inference::ModelInferResponse {
            outputs: vec![tensor],
            ..Default::default()
        };
        let result = GrpcFormat::decode_response(response).unwrap();
        assert_eq!(result.output_as::<i16>("x").unwrap(), vec![-3, 4]);
        assert_eq!(result.output_data("x").unwrap(), TensorData::Int16(vec![-3, 4]));
        assert!(result.buffer().is_empty());
    }

    #[test]
    fn half_precision_contents_leave_output_without_data() {
        let mut half = output_tensor("h", "FP16");
        half.contents = Some(InferTensorContents::default());
        let mut ints = output_tensor("x", "INT32");
        ints.contents = Some(InferTensorContents {
            int_contents: vec![1, 2],
            ..Default::default()
        });
        let response = inference::ModelInferResponse {
            outputs: vec![half, ints],
            ..Default::default()
        };
        let result = GrpcFormat::decode_response(response).unwrap();
        assert!(matches!(
            result.output_as::<f32>("h"),
            Err(Error::MissingData { .. })
        ));
        assert_eq!(result.output_as::<i32>("x").unwrap(), vec![1, 2]);
    }

    #[test]
    fn duplicate_output_names_are_rejected() {
        let response = inference::ModelInferResponse {
            outputs: vec![output_tensor("x", "FP32"), output_tensor("x", "FP32")],
            ..Default::default()
        };
        assert!(GrpcFormat::decode_response(response).is_err());
    }

    #[test]
    fn stream_errors_surface() {
        let err = GrpcFormat::decode_stream_response(inference::ModelStreamInferResponse {
            error_message: "model unavailable".into(),
            infer_response: None,
        })
        .unwrap_err();
        assert!(matches!(err, Error::StreamInference(msg) if msg == "model unavailable"));

        let err = GrpcFormat::decode_stream_response(inference::ModelStreamInferResponse::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }

    #[test]
    fn response_bytes_round_trip() {
        let response = inference::ModelInferResponse {
            model_name: "m".into(),
            model_version: "3".into(),
            outputs: vec![output_tensor("x", "FP32")],
            raw_output_contents: vec![[1.5f32.to_le_bytes(), 2.5f32.to_le_bytes()].concat()],
            ..Default::default()
        };
        let result = GrpcFormat::decode_response_bytes(&response.encode_to_vec()).unwrap();
        assert_eq!(result.model_version(), "3");
        assert_eq!(result.output_as::<f32>("x").unwrap(), vec![1.5, 2.5]);

        assert!(matches!(
            GrpcFormat::decode_response_bytes(&[0xFF, 0xFF, 0xFF]),
            Err(Error::Protobuf(_))
        ));
    }
}
