//! Runtime support for the KB Cloud client: the JSON codec, the tolerant
//! model contract implemented by `#[derive(Model)]`, and the HTTP layer
//! every API operation goes through.

pub mod client;
pub mod codec;
pub mod configuration;
pub mod error;
pub mod model;

pub use client::{ApiClient, ApiResponse, ReqwestTransport, Transport};
#[cfg(any(test, feature = "testing"))]
pub use client::{RecordedRequest, ReplayTransport};
pub use configuration::{Configuration, Credentials, RetryConfiguration, ServerConfiguration};
pub use error::{ApiError, Error};
pub use model::{
    AdditionalProperties, DecodeError, Decoded, Field, InvalidEnumValue, Model, UnparsedObject,
};
