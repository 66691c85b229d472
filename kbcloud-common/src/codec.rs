//! JSON encoding and decoding behind a build-time selectable backend.
//!
//! The default backend is `serde_json`. Enabling the `json-crate` feature
//! switches [`marshal`] and [`unmarshal`] to the `json` crate's parser and
//! printer. Both backends produce the same values; object key order may
//! differ.

use std::io::{Read, Write};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

#[cfg(feature = "json-crate")]
mod json_backend;
#[cfg(feature = "json-crate")]
use json_backend as backend;

#[cfg(not(feature = "json-crate"))]
mod serde_backend;
#[cfg(not(feature = "json-crate"))]
use serde_backend as backend;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "json-crate")]
    #[error("invalid JSON: {0}")]
    Parse(#[from] json::Error),
    #[cfg(feature = "json-crate")]
    #[error("number out of range")]
    NumberOutOfRange,
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("I/O error while streaming JSON: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes `value` into JSON bytes.
pub fn marshal<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    backend::to_vec(value)
}

/// Deserializes JSON bytes into a `T`. Nothing is returned on error, so
/// callers never observe a partially populated value.
pub fn unmarshal<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    backend::from_slice(bytes)
}

/// Writes one JSON document per [`Encoder::encode`] call, each followed by a
/// newline.
pub struct Encoder<W> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        let mut bytes = marshal(value)?;
        bytes.push(b'\n');
        self.writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads a stream of whitespace separated JSON documents.
///
/// Document boundaries are always found with `serde_json`'s streaming
/// tokenizer, regardless of the selected backend.
pub struct Decoder<R: Read> {
    values: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<R>, Value>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            values: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }

    /// Decodes the next document, or returns `Ok(None)` at the end of input.
    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>, CodecError> {
        match self.values.next() {
            None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value?)?)),
        }
    }
}
