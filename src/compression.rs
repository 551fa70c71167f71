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

//! Whole-body compression for the HTTP transport.
//!
//! Compression always wraps the complete body (JSON header and binary
//! region together). `deflate` uses the zlib container, as HTTP defines it.

use std::io::{Read, Write};

use flate2::read::MultiGzDecoder;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};

/// A body compression algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompressionAlgorithm {
    /// No compression.
    #[default]
    None,
    /// `gzip` content encoding.
    Gzip,
    /// `deflate` content encoding (zlib format).
    Deflate,
}

impl CompressionAlgorithm {
    /// Returns the HTTP content-coding token, or `None` when uncompressed.
    #[must_use]
    pub const fn header_value(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Gzip => Some("gzip"),
            Self::Deflate => Some("deflate"),
        }
    }

    /// Parses a `Content-Encoding` header value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`] for content codings other than `gzip`,
    /// `deflate`, and `identity`.
    pub fn from_header(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "identity" => Ok(Self::None),
            "gzip" | "x-gzip" => Ok(Self::Gzip),
            "deflate" => Ok(Self::Deflate),
            other => Err(Error::Framing(format!(
                "unsupported content encoding '{other}'"
            ))),
        }
    }

    /// Compresses `data`, returning it unchanged for [`CompressionAlgorithm::None`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compression`] if the encoder fails.
    pub fn compress(self, data: Vec<u8>) -> Result<Vec<u8>> {
        let wrap = |source| Error::Compression {
            algorithm: self,
            source,
        };
        match self {
            Self::None => Ok(data),
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&data).map_err(wrap)?;
                encoder.finish().map_err(wrap)
            }
            Self::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&data).map_err(wrap)?;
                encoder.finish().map_err(wrap)
            }
        }
    }

    /// Decompresses `data`, returning it unchanged for [`CompressionAlgorithm::None`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compression`] if the stream is corrupt or truncated.
    pub fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>> {
        let inflated = match self {
            Self::None => return Ok(data),
            Self::Gzip => {
                let mut out = Vec::new();
                MultiGzDecoder::new(data.as_slice())
                    .read_to_end(&mut out)
                    .map(|_| out)
            }
            Self::Deflate => inflate_zlib(&data),
        };
        inflated.map_err(|source| Error::Compression {
            algorithm: self,
            source,
        })
    }
}

/// Inflates a zlib stream, failing unless the stream trailer is reached.
fn inflate_zlib(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).max(64));
    loop {
        let consumed = usize::try_from(inflater.total_in()).unwrap_or(data.len());
        let status = inflater
            .decompress_vec(
                &data[consumed.min(data.len())..],
                &mut out,
                FlushDecompress::Finish,
            )
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        match status {
            Status::StreamEnd => return Ok(out),
            _ if out.len() == out.capacity() => out.reserve(out.capacity()),
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "deflate stream ended before its trailer",
                ))
            }
        }
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header_value().unwrap_or("identity"))
    }
}

impl std::str::FromStr for CompressionAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_header(s)
    }
}
