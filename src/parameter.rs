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

//! Request, tensor, and response parameters.
//!
//! Parameters are string-keyed primitive values shared by both transports.
//! [`InferParameter`] is the transport-neutral form; it converts to the gRPC
//! protobuf parameter and serializes to a bare JSON value for HTTP.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::generated::inference;
use crate::generated::inference::infer_parameter::ParameterChoice;

/// A parameter map keyed by parameter name.
pub type Parameters = HashMap<String, InferParameter>;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum InferParameter {
    /// A string value.
    String(String),
    /// A boolean value.
    Bool(bool),
    /// A signed integer value.
    Int64(i64),
    /// An unsigned integer value.
    Uint64(u64),
    /// A floating-point value.
    Double(f64),
}

impl InferParameter {
    /// Returns the value as a byte count or offset, if it is a non-negative
    /// integer.
    #[must_use]
    pub fn as_usize(&self) -> Option<usize> {
        match *self {
            Self::Int64(v) => usize::try_from(v).ok(),
            Self::Uint64(v) => usize::try_from(v).ok(),
            _ => None,
        }
    }

    /// Returns the value if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value if it is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Converts this value into the protobuf representation.
    #[must_use]
    pub fn to_proto(&self) -> inference::InferParameter {
        let choice = match self {
            Self::String(s) => ParameterChoice::StringParam(s.clone()),
            Self::Bool(b) => ParameterChoice::BoolParam(*b),
            Self::Int64(v) => ParameterChoice::Int64Param(*v),
            Self::Uint64(v) => ParameterChoice::Uint64Param(*v),
            Self::Double(v) => ParameterChoice::DoubleParam(*v),
        };
        inference::InferParameter {
            parameter_choice: Some(choice),
        }
    }

    /// Converts a protobuf parameter into this representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`] if the protobuf value has no choice set.
    pub fn from_proto(key: &str, param: &inference::InferParameter) -> Result<Self> {
        let value = match &param.parameter_choice {
            Some(ParameterChoice::StringParam(s)) => Self::String(s.clone()),
            Some(ParameterChoice::BoolParam(b)) => Self::Bool(*b),
            Some(ParameterChoice::Int64Param(v)) => Self::Int64(*v),
            Some(ParameterChoice::Uint64Param(v)) => Self::Uint64(*v),
            Some(ParameterChoice::DoubleParam(v)) => Self::Double(*v),
            None => {
                return Err(Error::Framing(format!("parameter '{key}' has no value")));
            }
        };
        Ok(value)
    }
}

impl From<String> for InferParameter {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for InferParameter {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<bool> for InferParameter {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for InferParameter {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<u64> for InferParameter {
    fn from(value: u64) -> Self {
        Self::Uint64(value)
    }
}

impl From<f64> for InferParameter {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl Serialize for InferParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int64(v) => serializer.serialize_i64(*v),
            Self::Uint64(v) => serializer.serialize_u64(*v),
            Self::Double(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for InferParameter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;

        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(Self::String(s)),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(Self::Int64(v))
                } else if let Some(v) = n.as_u64() {
                    Ok(Self::Uint64(v))
                } else {
                    n.as_f64()
                        .map(Self::Double)
                        .ok_or_else(|| D::Error::custom(format!("unrepresentable number {n}")))
                }
            }
            other => Err(D::Error::custom(format!(
                "parameter values must be strings, booleans, or numbers, found {other}"
            ))),
        }
    }
}

/// Converts a protobuf parameter map.
///
/// # Errors
///
/// Returns [`Error::Framing`] if any value has no choice set.
pub fn from_proto_map(params: &HashMap<String, inference::InferParameter>) -> Result<Parameters> {
    params
        .iter()
        .map(|(key, param)| Ok((key.clone(), InferParameter::from_proto(key, param)?)))
        .collect()
}

/// Converts a parameter map into protobuf parameters.
#[must_use]
pub fn to_proto_map(params: &Parameters) -> HashMap<String, inference::InferParameter> {
    params
        .iter()
        .map(|(key, value)| (key.clone(), value.to_proto()))
        .collect()
}
