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

//! The transport-neutral inference result.
//!
//! Both envelope parsers in [`crate::transport`] produce an [`InferResult`]:
//! response metadata, the list of output descriptors, and one contiguous
//! binary buffer. Outputs sent as binary data own a [`BufferRegion`] of that
//! buffer; other outputs carry their elements inline.

use std::collections::HashMap;

use crate::codec::{self, Element, ElementError, Scalar, TensorData};
use crate::datatype::DataType;
use crate::error::{Error, Result};
use crate::parameter::Parameters;

// ---------------------------------------------------------------------------
// OutputTensor
// ---------------------------------------------------------------------------

/// Descriptor of one output tensor in a response.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    pub(crate) name: String,
    pub(crate) datatype: String,
    pub(crate) shape: Vec<i64>,
    pub(crate) parameters: Parameters,
    pub(crate) data: Option<Vec<Scalar>>,
}

impl OutputTensor {
    /// Returns the output tensor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the datatype tag exactly as the server declared it.
    #[must_use]
    pub fn datatype_str(&self) -> &str {
        &self.datatype
    }

    /// Returns the declared datatype, or `None` if the tag is not recognised.
    #[must_use]
    pub fn datatype(&self) -> Option<DataType> {
        DataType::parse(&self.datatype)
    }

    /// Returns the output shape.
    #[must_use]
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// Returns the output parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the inline elements, flattened in row-major order.
    ///
    /// `None` when the output was sent as binary data or not at all.
    #[must_use]
    pub fn inline_data(&self) -> Option<&[Scalar]> {
        self.data.as_deref()
    }
}

// ---------------------------------------------------------------------------
// InferResult
// ---------------------------------------------------------------------------

/// A byte range of the response buffer holding one output's binary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRegion {
    /// Start of the region.
    pub offset: usize,
    /// Length of the region in bytes.
    pub len: usize,
}

/// A decoded inference response.
///
/// Outputs are looked up by name. Binary regions never overlap and lie
/// entirely within [`buffer`](Self::buffer).
#[derive(Debug, Clone, PartialEq)]
pub struct InferResult {
    pub(crate) model_name: String,
    pub(crate) model_version: String,
    pub(crate) id: String,
    pub(crate) parameters: Parameters,
    pub(crate) outputs: Vec<OutputTensor>,
    pub(crate) buffer: Vec<u8>,
    pub(crate) regions: HashMap<String, BufferRegion>,
}

impl InferResult {
    /// Returns the model name that produced this response.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the model version that produced this response.
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Returns the request identifier, if one was set in the request.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the response parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the output descriptors in the order the server sent them.
    #[must_use]
    pub fn outputs(&self) -> &[OutputTensor] {
        &self.outputs
    }

    /// Returns the concatenated binary data of all binary outputs.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Finds an output descriptor by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputNotFound`] if no output has this name.
    pub fn output(&self, name: &str) -> Result<&OutputTensor> {
        self.outputs
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| Error::OutputNotFound {
                name: name.to_owned(),
            })
    }

    /// Returns where an output's binary data starts in the buffer.
    #[must_use]
    pub fn binary_offset(&self, name: &str) -> Option<usize> {
        self.regions.get(name).map(|region| region.offset)
    }

    /// Returns the buffer region of an output sent as binary data.
    #[must_use]
    pub fn region(&self, name: &str) -> Option<BufferRegion> {
        self.regions.get(name).copied()
    }

    /// Returns the still-encoded binary data of an output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputNotFound`] for unknown names and
    /// [`Error::MissingData`] if the output was not sent as binary data.
    pub fn raw_output(&self, name: &str) -> Result<&[u8]> {
        self.output(name)?;
        let region = self.regions.get(name).ok_or_else(|| Error::MissingData {
            name: name.to_owned(),
        })?;
        self.slice(region).map_err(|e| e.for_output(name))
    }

    /// Decodes an output into typed data of its declared datatype.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputNotFound`] for unknown names,
    /// [`Error::MissingData`] if the output carries no data, and
    /// [`Error::Output`] or [`Error::Conversion`] if the data does not decode
    /// as the declared datatype.
    pub fn output_data(&self, name: &str) -> Result<TensorData> {
        let output = self.output(name)?;
        let datatype = output
            .datatype()
            .ok_or_else(|| Error::UnsupportedDataType(output.datatype.clone()).for_output(name))?;

        if let Some(region) = self.regions.get(name) {
            let bytes = self.slice(region).map_err(|e| e.for_output(name))?;
            return codec::decode(bytes, datatype).map_err(|e| e.for_output(name));
        }

        let values = output.inline_data().ok_or_else(|| Error::MissingData {
            name: name.to_owned(),
        })?;
        codec::from_scalars(values, datatype).map_err(|e| element_error(name, output, datatype, e))
    }

    /// Decodes an output as a vector of `T`.
    ///
    /// Binary data is decoded with the declared datatype, which must match
    /// `T`. Inline elements are converted one by one.
    ///
    /// # Errors
    ///
    /// As [`output_data`](Self::output_data), plus [`Error::TypeMismatch`]
    /// if the declared datatype cannot be read as `T`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # fn example(result: &triton_wire::response::InferResult) -> triton_wire::error::Result<()> {
    /// let scores: Vec<f32> = result.output_as("scores")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn output_as<T: Element>(&self, name: &str) -> Result<Vec<T>> {
        let output = self.output(name)?;

        if self.regions.contains_key(name) {
            let data = self.output_data(name)?;
            return T::from_tensor_data(data)
                .map_err(|e| element_error(name, output, T::DATATYPE, e));
        }

        let values = output.inline_data().ok_or_else(|| Error::MissingData {
            name: name.to_owned(),
        })?;
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                T::from_scalar(value).map_err(|reason| Error::Conversion {
                    name: name.to_owned(),
                    index,
                    reason,
                })
            })
            .collect()
    }

    fn slice(&self, region: &BufferRegion) -> Result<&[u8]> {
        region
            .offset
            .checked_add(region.len)
            .and_then(|end| self.buffer.get(region.offset..end))
            .ok_or(Error::Truncated {
                offset: region.offset,
                needed: region.len,
                available: self.buffer.len(),
            })
    }
}

fn element_error(name: &str, output: &OutputTensor, requested: DataType, err: ElementError) -> Error {
    match err {
        ElementError::WrongType(_) => Error::TypeMismatch {
            name: name.to_owned(),
            requested,
            declared: output.datatype.clone(),
        },
        ElementError::Invalid { index, reason } => Error::Conversion {
            name: name.to_owned(),
            index,
            reason,
        },
    }
}
