//! The tolerant JSON contract shared by every generated model.
//!
//! A model is decoded in two passes: first into an all-optional shadow of
//! itself, then field by field through each field type's [`Field`] codec.
//! Payloads that are valid JSON objects but do not fit the model are kept
//! as [`Decoded::Unparsed`] instead of being rejected, so that values the
//! server adds after this client was built still round-trip. Only a
//! missing required field is an error.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

use crate::codec::{self, CodecError};

mod field;

pub use field::{Field, format_timestamp};

/// The raw form of a payload that could not be represented by its model.
pub type UnparsedObject = Map<String, Value>;

/// Keys present on the wire but not declared by the model.
pub type AdditionalProperties = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("required field {field} missing")]
    MissingField {
        model: &'static str,
        field: &'static str,
    },
    #[error("payload does not conform to {model}")]
    Unparsed { model: &'static str },
}

/// `value` is not one of the values an enum declares.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}' for enum {enum_name}")]
pub struct InvalidEnumValue {
    pub enum_name: &'static str,
    pub value: String,
}

/// The result of a tolerant decode: either the typed model or the raw
/// object it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Valid(T),
    Unparsed(UnparsedObject),
}

impl<T> Decoded<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Unparsed(_) => None,
        }
    }

    pub fn valid_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Unparsed(_) => None,
        }
    }

    pub fn unparsed_object(&self) -> Option<&UnparsedObject> {
        match self {
            Self::Valid(_) => None,
            Self::Unparsed(object) => Some(object),
        }
    }

    /// Drops the raw form of an unparsed payload.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Unparsed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        match self {
            Self::Valid(value) => Decoded::Valid(f(value)),
            Self::Unparsed(object) => Decoded::Unparsed(object),
        }
    }
}

impl<T: Model> Decoded<T> {
    /// Returns the typed model, or [`DecodeError::Unparsed`].
    pub fn into_valid(self) -> Result<T, DecodeError> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Unparsed(_) => Err(DecodeError::Unparsed { model: T::NAME }),
        }
    }
}

impl<T> From<T> for Decoded<T> {
    fn from(value: T) -> Self {
        Self::Valid(value)
    }
}

impl<T: Serialize> Serialize for Decoded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(value) => value.serialize(serializer),
            Self::Unparsed(object) => object.serialize(serializer),
        }
    }
}

impl<'de, T: Model> Deserialize<'de> for Decoded<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = UnparsedObject::deserialize(deserializer)?;
        T::from_object(object).map_err(de::Error::custom)
    }
}

/// A wire object type. Implementations are generated by
/// `#[derive(Model)]`.
pub trait Model: Sized {
    const NAME: &'static str;

    /// Wire names of every declared field, in declaration order.
    const FIELDS: &'static [&'static str];

    fn from_object(object: UnparsedObject) -> Result<Decoded<Self>, DecodeError>;

    fn to_object(&self) -> Result<UnparsedObject, serde_json::Error>;

    fn from_json(bytes: &[u8]) -> Result<Decoded<Self>, DecodeError> {
        decode(bytes)
    }

    fn to_json(&self) -> Result<Vec<u8>, CodecError> {
        codec::marshal(&self.to_object()?)
    }
}

/// Decodes a JSON object payload into `M`.
///
/// Malformed JSON, or JSON that is neither an object nor `null`, is an
/// error; everything else follows [`Model::from_object`]. `null` decodes
/// as an empty object, which only succeeds for models without required
/// fields.
pub fn decode<M: Model>(bytes: &[u8]) -> Result<Decoded<M>, DecodeError> {
    let value: Value = codec::unmarshal(bytes)?;
    match value {
        Value::Object(object) => M::from_object(object),
        Value::Null => M::from_object(UnparsedObject::new()),
        _ => Err(DecodeError::NotAnObject),
    }
}

pub fn require<M: Model, S>(value: Option<S>, field: &'static str) -> Result<S, DecodeError> {
    value.ok_or(DecodeError::MissingField {
        model: M::NAME,
        field,
    })
}

/// Validates an optional field. The outer `None` marks an invalid value.
pub fn accept_optional<F: Field>(shadow: Option<F::Shadow>) -> Option<Option<F>> {
    match shadow {
        Some(shadow) => F::from_shadow(shadow).map(Some),
        None => Some(None),
    }
}

pub fn delete_keys(object: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        object.shift_remove(*key);
    }
}

/// Copies the keys of `object` that are not in `known`.
pub fn additional_properties(object: &UnparsedObject, known: &[&str]) -> AdditionalProperties {
    let mut additional = object.clone();
    delete_keys(&mut additional, known);
    additional
}

/// Falls back to the raw object. `reason` only ends up in the log.
pub fn unparsed<M: Model>(object: UnparsedObject, reason: &dyn Display) -> Decoded<M> {
    log::debug!("keeping {} payload unparsed: {reason}", M::NAME);
    Decoded::Unparsed(object)
}

/// Collects the wire form of a model's fields.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    object: UnparsedObject,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required<F: Field>(&mut self, key: &str, value: &F) -> Result<(), serde_json::Error> {
        self.object.insert(key.to_owned(), value.to_value()?);
        Ok(())
    }

    /// Unset values are omitted.
    pub fn optional<F: Field>(
        &mut self,
        key: &str,
        value: Option<&F>,
    ) -> Result<(), serde_json::Error> {
        match value {
            Some(value) => self.required(key, value),
            None => Ok(()),
        }
    }

    /// Merges `additional` over the declared fields.
    pub fn finish(mut self, additional: &AdditionalProperties) -> UnparsedObject {
        for (key, value) in additional {
            self.object.insert(key.clone(), value.clone());
        }
        self.object
    }
}
