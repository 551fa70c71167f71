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

//! Builder types for constructing transport-neutral inference requests.
//!
//! This module provides an ergonomic, type-safe API for describing an
//! inference call. [`InferInput`] describes an input tensor,
//! [`InferRequestedOutput`] an output the caller wants back, and
//! [`InferRequestBuilder`] assembles them with the request options into a
//! validated [`InferRequest`]. The request is then handed to one of the
//! envelope formats in [`crate::transport`].
//!
//! The request options own a fixed set of parameter keys (see
//! [`RESERVED_PARAMETERS`]); custom parameters using those keys are rejected
//! when the request is built.
//!
//! # Example
//!
//! ```rust
//! use triton_wire::datatype::DataType;
//! use triton_wire::infer::{InferInput, InferRequestBuilder};
//!
//! let input = InferInput::new("input0", vec![1, 16], DataType::Fp32)
//!     .with_data(vec![1.0_f32; 16]);
//!
//! let request = InferRequestBuilder::new("my_model")
//!     .model_version("1")
//!     .request_id("req-001")
//!     .input(input)
//!     .output("output0")
//!     .build()
//!     .unwrap();
//! assert_eq!(request.inputs().len(), 1);
//! ```

use std::collections::HashSet;
use std::time::Duration;

use crate::codec::{self, TensorData};
use crate::compression::CompressionAlgorithm;
use crate::datatype::DataType;
use crate::error::{Error, Result};
use crate::parameter::{InferParameter, Parameters};

/// Request parameter keys owned by [`InferOptions`].
pub const RESERVED_PARAMETERS: [&str; 5] = [
    "sequence_id",
    "sequence_start",
    "sequence_end",
    "priority",
    "binary_data_output",
];

/// Tensor parameter carrying the byte length of a binary payload.
pub const BINARY_DATA_SIZE: &str = "binary_data_size";
/// Requested-output parameter asking for binary rather than JSON data.
pub const BINARY_DATA: &str = "binary_data";
/// Requested-output parameter asking for the top-k classification.
pub const CLASSIFICATION: &str = "classification";
/// Tensor parameter naming a registered shared memory region.
pub const SHARED_MEMORY_REGION: &str = "shared_memory_region";
/// Tensor parameter with the byte size used in a shared memory region.
pub const SHARED_MEMORY_BYTE_SIZE: &str = "shared_memory_byte_size";
/// Tensor parameter with the offset into a shared memory region.
pub const SHARED_MEMORY_OFFSET: &str = "shared_memory_offset";

// ---------------------------------------------------------------------------
// InferInput
// ---------------------------------------------------------------------------

/// Where the contents of an input tensor come from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InputPayload {
    /// Descriptor only.
    Empty,
    /// Typed values, encoded by the transport.
    Typed(TensorData),
    /// Bytes already in the binary tensor encoding.
    Raw(Vec<u8>),
    /// Data lives in a registered shared memory region.
    SharedMemory,
}

/// Describes an input tensor for an inference request.
///
/// Typed data attached with [`with_data`](Self::with_data) is sent as binary
/// data by default; call [`binary_data(false)`](Self::binary_data) to carry
/// it inline in the envelope instead.
///
/// # Example
///
/// ```rust
/// use triton_wire::datatype::DataType;
/// use triton_wire::infer::InferInput;
///
/// let input = InferInput::new("images", vec![1, 3, 224, 224], DataType::Fp32)
///     .with_data(vec![0.0_f32; 3 * 224 * 224]);
/// ```
#[derive(Debug, Clone)]
pub struct InferInput {
    name: String,
    shape: Vec<i64>,
    datatype: DataType,
    payload: InputPayload,
    binary_data: bool,
    parameters: Parameters,
}

impl InferInput {
    /// Creates a new inference input descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` -- The tensor name as defined in the model configuration.
    /// * `shape` -- The shape of the tensor (e.g. `vec![1, 3, 224, 224]`).
    /// * `datatype` -- The element data type.
    #[must_use]
    pub fn new(name: impl Into<String>, shape: Vec<i64>, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            shape,
            datatype,
            payload: InputPayload::Empty,
            binary_data: true,
            parameters: Parameters::new(),
        }
    }

    /// Attaches typed tensor data.
    ///
    /// The element type must match the declared datatype; this is checked
    /// when the request is built.
    #[must_use]
    pub fn with_data(self, data: impl Into<TensorData>) -> Self {
        self.with_payload(InputPayload::Typed(data.into()))
    }

    /// Attaches data that is already in the binary tensor encoding.
    ///
    /// This is the most general form and can be used for any data type.
    /// The caller is responsible for ensuring the bytes are in the correct
    /// format (little-endian, row-major order). Raw data is always sent as
    /// binary data.
    #[must_use]
    pub fn with_data_raw(self, data: Vec<u8>) -> Self {
        self.with_payload(InputPayload::Raw(data))
    }

    /// Attaches variable-length byte sequences (strings).
    #[must_use]
    pub fn with_data_bytes(self, data: &[&[u8]]) -> Self {
        self.with_data(TensorData::from_strings(data))
    }

    /// Points this input at a registered shared memory region.
    ///
    /// Any attached data is dropped; the server reads `byte_size` bytes at
    /// `offset` within `region`.
    #[must_use]
    pub fn with_shared_memory(mut self, region: impl Into<String>, byte_size: u64, offset: u64) -> Self {
        self.parameters
            .insert(SHARED_MEMORY_REGION.to_owned(), InferParameter::String(region.into()));
        self.parameters
            .insert(SHARED_MEMORY_BYTE_SIZE.to_owned(), InferParameter::Uint64(byte_size));
        if offset != 0 {
            self.parameters
                .insert(SHARED_MEMORY_OFFSET.to_owned(), InferParameter::Uint64(offset));
        }
        self.payload = InputPayload::SharedMemory;
        self
    }

    /// Chooses between binary (`true`, the default) and inline (`false`)
    /// transfer of typed data.
    #[must_use]
    pub fn binary_data(self, binary: bool) -> Self {
        Self {
            binary_data: binary,
            ..self
        }
    }

    /// Adds a parameter to this input tensor.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<InferParameter>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Returns the tensor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tensor shape.
    #[must_use]
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// Returns the tensor data type.
    #[must_use]
    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// Returns the tensor parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the attached typed data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&TensorData> {
        self.payload.typed()
    }

    /// Returns `true` if this input's contents travel as binary data.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        match self.payload {
            InputPayload::Raw(_) => true,
            InputPayload::Typed(_) => self.binary_data,
            InputPayload::Empty | InputPayload::SharedMemory => false,
        }
    }

    fn with_payload(mut self, payload: InputPayload) -> Self {
        if self.payload == InputPayload::SharedMemory {
            self.parameters.remove(SHARED_MEMORY_REGION);
            self.parameters.remove(SHARED_MEMORY_BYTE_SIZE);
            self.parameters.remove(SHARED_MEMORY_OFFSET);
        }
        self.payload = payload;
        self
    }

    /// Splits this input into its descriptor parts and the payload.
    pub(crate) fn into_parts(self) -> (InputDescriptor, InputPayload, bool) {
        let descriptor = InputDescriptor {
            name: self.name,
            shape: self.shape,
            datatype: self.datatype,
            parameters: self.parameters,
        };
        (descriptor, self.payload, self.binary_data)
    }

    /// Checks the descriptor and payload against each other.
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidInput("input tensor name must not be empty".into()));
        }
        if let Some(dim) = self.shape.iter().find(|&&d| d < 0) {
            return Err(Error::InvalidInput(format!(
                "input '{}' has negative dimension {dim} in shape {:?}",
                self.name, self.shape
            )));
        }
        let element_count = self
            .shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(usize::try_from(d).ok()?));

        match &self.payload {
            InputPayload::Typed(data) => {
                if data.datatype() != self.datatype {
                    return Err(Error::InvalidInput(format!(
                        "input '{}' is declared {} but carries {} data",
                        self.name,
                        self.datatype,
                        data.datatype()
                    )));
                }
                if let Some(expected) = element_count {
                    if data.len() != expected {
                        return Err(Error::InvalidInput(format!(
                            "input '{}' with shape {:?} expects {expected} elements, got {}",
                            self.name,
                            self.shape,
                            data.len()
                        )));
                    }
                }
            }
            InputPayload::Raw(raw) => {
                let expected = self
                    .datatype
                    .byte_size()
                    .zip(element_count)
                    .and_then(|(width, count)| width.checked_mul(count));
                if let Some(expected) = expected {
                    if raw.len() != expected {
                        return Err(Error::InvalidInput(format!(
                            "input '{}' with shape {:?} expects {expected} bytes of {}, got {}",
                            self.name,
                            self.shape,
                            self.datatype,
                            raw.len()
                        )));
                    }
                }
            }
            InputPayload::Empty | InputPayload::SharedMemory => {}
        }
        Ok(())
    }
}

/// The descriptor half of an input, once its payload has been taken.
#[derive(Debug, Clone)]
pub(crate) struct InputDescriptor {
    pub(crate) name: String,
    pub(crate) shape: Vec<i64>,
    pub(crate) datatype: DataType,
    pub(crate) parameters: Parameters,
}

impl InputPayload {
    /// Returns the bytes to transmit as a binary segment, or `None` when the
    /// payload is not sent as binary data.
    pub(crate) fn binary_segment(&self, binary: bool) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Raw(raw) => Ok(Some(raw.clone())),
            Self::Typed(data) if binary => codec::encode(data).map(Some),
            _ => Ok(None),
        }
    }

    /// Returns the typed data, if the payload holds any.
    pub(crate) fn typed(&self) -> Option<&TensorData> {
        match self {
            Self::Typed(data) => Some(data),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// InferRequestedOutput
// ---------------------------------------------------------------------------

/// Describes a requested output tensor for an inference request.
///
/// Specifying outputs is optional. When no outputs are requested, the server
/// returns all outputs defined in the model configuration, as binary data.
#[derive(Debug, Clone)]
pub struct InferRequestedOutput {
    name: String,
    binary_data: bool,
    class_count: u32,
    shared_memory: bool,
    parameters: Parameters,
}

impl InferRequestedOutput {
    /// Creates a new requested output for the tensor with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binary_data: true,
            class_count: 0,
            shared_memory: false,
            parameters: Parameters::new(),
        }
    }

    /// Chooses between binary (`true`, the default) and inline JSON data for
    /// this output on the HTTP transport.
    #[must_use]
    pub fn binary_data(self, binary: bool) -> Self {
        Self {
            binary_data: binary,
            ..self
        }
    }

    /// Requests the top `count` classification results instead of the raw
    /// tensor. Zero disables classification.
    #[must_use]
    pub fn class_count(self, count: u32) -> Self {
        Self {
            class_count: count,
            ..self
        }
    }

    /// Asks the server to write this output into a registered shared memory
    /// region.
    #[must_use]
    pub fn with_shared_memory(mut self, region: impl Into<String>, byte_size: u64, offset: u64) -> Self {
        self.parameters
            .insert(SHARED_MEMORY_REGION.to_owned(), InferParameter::String(region.into()));
        self.parameters
            .insert(SHARED_MEMORY_BYTE_SIZE.to_owned(), InferParameter::Uint64(byte_size));
        if offset != 0 {
            self.parameters
                .insert(SHARED_MEMORY_OFFSET.to_owned(), InferParameter::Uint64(offset));
        }
        self.shared_memory = true;
        self
    }

    /// Adds a parameter to this output request.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<InferParameter>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Returns the output tensor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters to send with this output.
    ///
    /// `with_binary_flag` adds the `binary_data` flag used by the HTTP
    /// transport; it is never set for shared memory outputs.
    pub(crate) fn wire_parameters(&self, with_binary_flag: bool) -> Parameters {
        let mut parameters = self.parameters.clone();
        if self.class_count > 0 {
            parameters.insert(
                CLASSIFICATION.to_owned(),
                InferParameter::Int64(i64::from(self.class_count)),
            );
        }
        if with_binary_flag && !self.shared_memory {
            parameters.insert(BINARY_DATA.to_owned(), InferParameter::Bool(self.binary_data));
        }
        parameters
    }
}

// ---------------------------------------------------------------------------
// InferOptions
// ---------------------------------------------------------------------------

/// A sequence correlation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceId {
    /// A numeric identifier. Zero means "no sequence".
    Int(u64),
    /// A string identifier. The empty string means "no sequence".
    Str(String),
}

impl SequenceId {
    fn is_set(&self) -> bool {
        match self {
            Self::Int(id) => *id != 0,
            Self::Str(id) => !id.is_empty(),
        }
    }

    fn to_parameter(&self) -> InferParameter {
        match self {
            Self::Int(id) => InferParameter::Uint64(*id),
            Self::Str(id) => InferParameter::String(id.clone()),
        }
    }
}

impl From<u64> for SequenceId {
    fn from(id: u64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for SequenceId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_owned())
    }
}

impl From<String> for SequenceId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// Per-request options that are sent as request parameters or headers.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use triton_wire::compression::CompressionAlgorithm;
/// use triton_wire::infer::InferOptions;
///
/// let options = InferOptions::default()
///     .sequence_id(42)
///     .sequence_start(true)
///     .priority(1)
///     .timeout(Duration::from_millis(250))
///     .response_compression(CompressionAlgorithm::Gzip);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InferOptions {
    request_id: String,
    sequence_id: Option<SequenceId>,
    sequence_start: bool,
    sequence_end: bool,
    priority: u64,
    timeout: Option<Duration>,
    request_compression: CompressionAlgorithm,
    response_compression: CompressionAlgorithm,
    parameters: Parameters,
}

impl InferOptions {
    /// Sets an optional request identifier, echoed back in the response.
    #[must_use]
    pub fn request_id(self, id: impl Into<String>) -> Self {
        Self {
            request_id: id.into(),
            ..self
        }
    }

    /// Sets the sequence the request belongs to.
    #[must_use]
    pub fn sequence_id(self, id: impl Into<SequenceId>) -> Self {
        Self {
            sequence_id: Some(id.into()),
            ..self
        }
    }

    /// Marks the request as the start of its sequence.
    #[must_use]
    pub fn sequence_start(self, start: bool) -> Self {
        Self {
            sequence_start: start,
            ..self
        }
    }

    /// Marks the request as the end of its sequence.
    #[must_use]
    pub fn sequence_end(self, end: bool) -> Self {
        Self {
            sequence_end: end,
            ..self
        }
    }

    /// Sets the scheduling priority. Zero uses the model's default.
    #[must_use]
    pub fn priority(self, priority: u64) -> Self {
        Self { priority, ..self }
    }

    /// Sets the server-side timeout, sent in microseconds.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Sets the compression applied to the request body (HTTP only).
    #[must_use]
    pub fn request_compression(self, algorithm: CompressionAlgorithm) -> Self {
        Self {
            request_compression: algorithm,
            ..self
        }
    }

    /// Sets the compression the server should apply to the response body
    /// (HTTP only).
    #[must_use]
    pub fn response_compression(self, algorithm: CompressionAlgorithm) -> Self {
        Self {
            response_compression: algorithm,
            ..self
        }
    }

    /// Adds a custom request parameter.
    ///
    /// Keys in [`RESERVED_PARAMETERS`] are rejected when the request is
    /// built. A custom `timeout` is replaced by the one set with
    /// [`timeout`](Self::timeout).
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<InferParameter>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Builds the request parameter map: the custom parameters once none of
    /// them collides with a reserved key, then the option-owned keys, which
    /// take precedence over custom values.
    fn request_parameters(&self, all_outputs_binary: bool) -> Result<Parameters> {
        if let Some(key) = RESERVED_PARAMETERS
            .iter()
            .find(|key| self.parameters.contains_key(**key))
        {
            return Err(Error::ReservedParameter {
                key: (*key).to_owned(),
            });
        }

        let mut parameters = self.parameters.clone();
        if let Some(id) = self.sequence_id.as_ref().filter(|id| id.is_set()) {
            parameters.insert("sequence_id".to_owned(), id.to_parameter());
            parameters.insert(
                "sequence_start".to_owned(),
                InferParameter::Bool(self.sequence_start),
            );
            parameters.insert(
                "sequence_end".to_owned(),
                InferParameter::Bool(self.sequence_end),
            );
        }
        if self.priority != 0 {
            parameters.insert("priority".to_owned(), InferParameter::Uint64(self.priority));
        }
        if let Some(timeout) = self.timeout {
            let micros = i64::try_from(timeout.as_micros()).unwrap_or(i64::MAX);
            parameters.insert("timeout".to_owned(), InferParameter::Int64(micros));
        }
        if all_outputs_binary {
            parameters.insert("binary_data_output".to_owned(), InferParameter::Bool(true));
        }
        Ok(parameters)
    }
}

// ---------------------------------------------------------------------------
// InferRequestBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing an [`InferRequest`].
///
/// # Example
///
/// ```rust
/// use triton_wire::datatype::DataType;
/// use triton_wire::infer::{InferInput, InferRequestBuilder};
///
/// let request = InferRequestBuilder::new("resnet50")
///     .model_version("1")
///     .request_id("batch-001")
///     .input(
///         InferInput::new("input", vec![1, 3, 224, 224], DataType::Fp32)
///             .with_data(vec![0.0_f32; 3 * 224 * 224]),
///     )
///     .output("output")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct InferRequestBuilder {
    model_name: String,
    model_version: String,
    inputs: Vec<InferInput>,
    outputs: Vec<InferRequestedOutput>,
    options: InferOptions,
}

impl InferRequestBuilder {
    /// Creates a new builder targeting the specified model.
    #[must_use]
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            model_version: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            options: InferOptions::default(),
        }
    }

    /// Sets the model version to use for inference.
    ///
    /// If not set, the server uses the latest version according to its policy.
    #[must_use]
    pub fn model_version(self, version: impl Into<String>) -> Self {
        Self {
            model_version: version.into(),
            ..self
        }
    }

    /// Sets an optional request identifier.
    ///
    /// When specified, the server echoes this identifier in the response.
    #[must_use]
    pub fn request_id(self, id: impl Into<String>) -> Self {
        Self {
            options: self.options.request_id(id),
            ..self
        }
    }

    /// Adds an input tensor to the request.
    #[must_use]
    pub fn input(mut self, input: InferInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Adds multiple input tensors to the request.
    #[must_use]
    pub fn inputs(mut self, inputs: impl IntoIterator<Item = InferInput>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Adds a requested output by name.
    ///
    /// This is a convenience method that creates an [`InferRequestedOutput`]
    /// with default settings.
    #[must_use]
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(InferRequestedOutput::new(name));
        self
    }

    /// Adds a fully-configured requested output.
    #[must_use]
    pub fn output_with(mut self, output: InferRequestedOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Replaces the request options.
    ///
    /// This also replaces any request id or parameters set earlier on the
    /// builder.
    #[must_use]
    pub fn options(self, options: InferOptions) -> Self {
        Self { options, ..self }
    }

    /// Sets the sequence the request belongs to.
    #[must_use]
    pub fn sequence_id(self, id: impl Into<SequenceId>) -> Self {
        Self {
            options: self.options.sequence_id(id),
            ..self
        }
    }

    /// Marks the request as the start of its sequence.
    #[must_use]
    pub fn sequence_start(self, start: bool) -> Self {
        Self {
            options: self.options.sequence_start(start),
            ..self
        }
    }

    /// Marks the request as the end of its sequence.
    #[must_use]
    pub fn sequence_end(self, end: bool) -> Self {
        Self {
            options: self.options.sequence_end(end),
            ..self
        }
    }

    /// Sets the scheduling priority.
    #[must_use]
    pub fn priority(self, priority: u64) -> Self {
        Self {
            options: self.options.priority(priority),
            ..self
        }
    }

    /// Sets the server-side timeout.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            options: self.options.timeout(timeout),
            ..self
        }
    }

    /// Adds a custom inference parameter.
    #[must_use]
    pub fn parameter(self, key: impl Into<String>, value: impl Into<InferParameter>) -> Self {
        Self {
            options: self.options.parameter(key, value),
            ..self
        }
    }

    /// Validates the request and produces an [`InferRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedParameter`] if a custom parameter uses a key
    /// from [`RESERVED_PARAMETERS`], and [`Error::InvalidInput`] if the model
    /// name is empty, tensor names are empty or repeated, or an input's data
    /// does not match its datatype or shape.
    pub fn build(self) -> Result<InferRequest> {
        if self.model_name.is_empty() {
            return Err(Error::InvalidInput("model name must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for input in &self.inputs {
            input.validate()?;
            if !seen.insert(input.name()) {
                return Err(Error::InvalidInput(format!(
                    "input '{}' is specified more than once",
                    input.name()
                )));
            }
        }

        let mut seen = HashSet::new();
        for output in &self.outputs {
            if output.name().is_empty() {
                return Err(Error::InvalidInput("output tensor name must not be empty".into()));
            }
            if !seen.insert(output.name()) {
                return Err(Error::InvalidInput(format!(
                    "output '{}' is requested more than once",
                    output.name()
                )));
            }
        }

        let parameters = self.options.request_parameters(self.outputs.is_empty())?;

        Ok(InferRequest {
            model_name: self.model_name,
            model_version: self.model_version,
            id: self.options.request_id,
            inputs: self.inputs,
            outputs: self.outputs,
            parameters,
            request_compression: self.options.request_compression,
            response_compression: self.options.response_compression,
        })
    }
}

// ---------------------------------------------------------------------------
// InferRequest
// ---------------------------------------------------------------------------

/// A validated, transport-neutral inference request.
///
/// Produced by [`InferRequestBuilder::build`] and consumed by an envelope
/// format in [`crate::transport`].
#[derive(Debug, Clone)]
pub struct InferRequest {
    pub(crate) model_name: String,
    pub(crate) model_version: String,
    pub(crate) id: String,
    pub(crate) inputs: Vec<InferInput>,
    pub(crate) outputs: Vec<InferRequestedOutput>,
    pub(crate) parameters: Parameters,
    pub(crate) request_compression: CompressionAlgorithm,
    pub(crate) response_compression: CompressionAlgorithm,
}

impl InferRequest {
    /// Returns the target model name.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the target model version; empty means the latest.
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Returns the request identifier; empty when unset.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the input tensors in declaration order.
    #[must_use]
    pub fn inputs(&self) -> &[InferInput] {
        &self.inputs
    }

    /// Returns the requested outputs in declaration order.
    #[must_use]
    pub fn outputs(&self) -> &[InferRequestedOutput] {
        &self.outputs
    }

    /// Returns the merged request parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the compression applied to the request body.
    #[must_use]
    pub fn request_compression(&self) -> CompressionAlgorithm {
        self.request_compression
    }

    /// Returns the compression requested for the response body.
    #[must_use]
    pub fn response_compression(&self) -> CompressionAlgorithm {
        self.response_compression
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_input_with_f32_data() {
        let input = InferInput::new("input0", vec![1, 4], DataType::Fp32)
            .with_data(vec![1.0f32, 2.0, 3.0, 4.0]);

        assert_eq!(input.name(), "input0");
        assert_eq!(input.shape(), &[1, 4]);
        assert_eq!(input.datatype(), DataType::Fp32);
        assert!(input.is_binary());
        assert_eq!(input.data().map(TensorData::len), Some(4));
    }

    #[test]
    fn infer_input_inline_is_not_binary() {
        let input = InferInput::new("mask", vec![3], DataType::Bool)
            .with_data(vec![true, false, true])
            .binary_data(false);
        assert!(!input.is_binary());
    }

    #[test]
    fn infer_input_with_bytes_data() {
        let strings: Vec<&[u8]> = vec![b"hello", b"world"];
        let input = InferInput::new("text", vec![1, 2], DataType::Bytes).with_data_bytes(&strings);
        let segment = input.payload.binary_segment(true).unwrap().unwrap();
        assert_eq!(segment.len(), 18);
        assert_eq!(&segment[..4], &5u32.to_le_bytes());
    }

    #[test]
    fn shared_memory_replaces_data() {
        let input = InferInput::new("in", vec![4], DataType::Fp32)
            .with_data(vec![0.0f32; 4])
            .with_shared_memory("region0", 16, 0);
        assert!(!input.is_binary());
        assert!(input.data().is_none());
        assert_eq!(
            input.parameters().get(SHARED_MEMORY_REGION),
            Some(&InferParameter::String("region0".into()))
        );
        assert!(!input.parameters().contains_key(SHARED_MEMORY_OFFSET));

        let input = input.with_data(vec![1.0f32; 4]);
        assert!(!input.parameters().contains_key(SHARED_MEMORY_REGION));
        assert!(input.is_binary());
    }

    #[test]
    fn build_rejects_mismatched_datatype() {
        let err = InferRequestBuilder::new("model")
            .input(InferInput::new("x", vec![2], DataType::Fp32).with_data(vec![1i64, 2]))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("FP32")));
    }

    #[test]
    fn build_rejects_element_count_mismatch() {
        let err = InferRequestBuilder::new("model")
            .input(InferInput::new("x", vec![2, 2], DataType::Int32).with_data(vec![1i32, 2, 3]))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn build_rejects_wrong_raw_length() {
        let err = InferRequestBuilder::new("model")
            .input(InferInput::new("x", vec![2], DataType::Int32).with_data_raw(vec![0; 6]))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn build_accepts_raw_bytes_of_any_length() {
        let request = InferRequestBuilder::new("model")
            .input(InferInput::new("x", vec![2], DataType::Bytes).with_data_raw(vec![0; 13]))
            .build();
        assert!(request.is_ok());
    }

    #[test]
    fn build_rejects_negative_dims_and_duplicates() {
        assert!(InferRequestBuilder::new("model")
            .input(InferInput::new("x", vec![-1], DataType::Fp32))
            .build()
            .is_err());
        assert!(InferRequestBuilder::new("model")
            .input(InferInput::new("x", vec![1], DataType::Fp32))
            .input(InferInput::new("x", vec![1], DataType::Fp32))
            .build()
            .is_err());
        assert!(InferRequestBuilder::new("model")
            .output("y")
            .output("y")
            .build()
            .is_err());
        assert!(InferRequestBuilder::new("").build().is_err());
    }

    #[test]
    fn reserved_parameters_are_rejected() {
        for key in RESERVED_PARAMETERS {
            let err = InferRequestBuilder::new("model")
                .parameter(key, 1i64)
                .build()
                .unwrap_err();
            match err {
                Error::ReservedParameter { key: reported } => assert_eq!(reported, key),
                other => panic!("expected ReservedParameter for {key}, got: {other}"),
            }
        }
    }

    #[test]
    fn other_custom_parameters_are_merged() {
        let request = InferRequestBuilder::new("model")
            .output("y")
            .parameter("max_tokens", 16i64)
            .parameter("sequence", "not reserved")
            .parameter("timeout_hint", true)
            .build()
            .unwrap();
        assert_eq!(request.parameters().len(), 3);
        assert_eq!(
            request.parameters().get("max_tokens"),
            Some(&InferParameter::Int64(16))
        );
    }

    #[test]
    fn option_timeout_wins_over_custom_parameter() {
        let request = InferRequestBuilder::new("model")
            .output("y")
            .timeout(Duration::from_millis(3))
            .parameter("timeout", 1i64)
            .build()
            .unwrap();
        assert_eq!(
            request.parameters().get("timeout"),
            Some(&InferParameter::Int64(3000))
        );

        let request = InferRequestBuilder::new("model")
            .output("y")
            .parameter("timeout", 1i64)
            .build()
            .unwrap();
        assert_eq!(
            request.parameters().get("timeout"),
            Some(&InferParameter::Int64(1))
        );
    }

    #[test]
    fn empty_outputs_request_binary_for_everything() {
        let request = InferRequestBuilder::new("model").build().unwrap();
        assert_eq!(
            request.parameters().get("binary_data_output"),
            Some(&InferParameter::Bool(true))
        );

        let request = InferRequestBuilder::new("model").output("y").build().unwrap();
        assert!(!request.parameters().contains_key("binary_data_output"));
    }

    #[test]
    fn sequence_options_become_parameters() {
        let request = InferRequestBuilder::new("model")
            .output("y")
            .sequence_id(7)
            .sequence_start(true)
            .priority(2)
            .timeout(Duration::from_millis(3))
            .build()
            .unwrap();
        let params = request.parameters();
        assert_eq!(params.get("sequence_id"), Some(&InferParameter::Uint64(7)));
        assert_eq!(params.get("sequence_start"), Some(&InferParameter::Bool(true)));
        assert_eq!(params.get("sequence_end"), Some(&InferParameter::Bool(false)));
        assert_eq!(params.get("priority"), Some(&InferParameter::Uint64(2)));
        assert_eq!(params.get("timeout"), Some(&InferParameter::Int64(3000)));
    }

    #[test]
    fn unset_sequence_is_omitted() {
        let request = InferRequestBuilder::new("model")
            .output("y")
            .sequence_id("")
            .sequence_start(true)
            .build()
            .unwrap();
        assert!(request.parameters().is_empty());
    }

    #[test]
    fn options_replace_builder_state() {
        let options = InferOptions::default()
            .request_id("abc")
            .sequence_id("corr-1")
            .response_compression(CompressionAlgorithm::Deflate);
        let request = InferRequestBuilder::new("model")
            .request_id("overwritten")
            .options(options)
            .build()
            .unwrap();
        assert_eq!(request.id(), "abc");
        assert_eq!(
            request.parameters().get("sequence_id"),
            Some(&InferParameter::String("corr-1".into()))
        );
        assert_eq!(request.response_compression(), CompressionAlgorithm::Deflate);
        assert_eq!(request.request_compression(), CompressionAlgorithm::None);
    }

    #[test]
    fn infer_request_builder_default_version() {
        let request = InferRequestBuilder::new("model").build().unwrap();
        assert!(request.model_version().is_empty());
        assert!(request.id().is_empty());
    }

    #[test]
    fn requested_output_parameters() {
        let output = InferRequestedOutput::new("output0")
            .class_count(3)
            .with_parameter("custom", "x");
        assert_eq!(output.name(), "output0");

        let http = output.wire_parameters(true);
        assert_eq!(http.get(CLASSIFICATION), Some(&InferParameter::Int64(3)));
        assert_eq!(http.get(BINARY_DATA), Some(&InferParameter::Bool(true)));
        assert_eq!(http.len(), 3);

        let grpc = output.wire_parameters(false);
        assert!(!grpc.contains_key(BINARY_DATA));

        let shm = InferRequestedOutput::new("o").with_shared_memory("r", 64, 8);
        let params = shm.wire_parameters(true);
        assert!(!params.contains_key(BINARY_DATA));
        assert_eq!(params.get(SHARED_MEMORY_OFFSET), Some(&InferParameter::Uint64(8)));
    }
}
