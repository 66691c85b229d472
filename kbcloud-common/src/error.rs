use std::fmt;

use http::{HeaderMap, StatusCode};

use crate::codec::CodecError;
use crate::configuration::ConfigurationError;
use crate::model::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("request body is a stream and cannot be sent more than once")]
    UnclonableRequest,
    #[cfg(any(test, feature = "testing"))]
    #[error("no response left to replay")]
    ReplayExhausted,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.into())
    }
}

/// A response with a status of 300 or above.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiError {
    /// The body, if it is JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        crate::codec::unmarshal(&self.body).ok()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server responded with {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", String::from_utf8_lossy(&self.body))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
