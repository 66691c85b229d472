use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Decoded, Model};

/// How a field type is decoded and encoded inside a model.
///
/// `Shadow` is the type the first decode pass reads. `from_shadow` then
/// decides whether the value is acceptable; `None` makes the enclosing
/// model fall back to its unparsed form.
pub trait Field: Sized {
    type Shadow: DeserializeOwned;

    fn from_shadow(shadow: Self::Shadow) -> Option<Self>;

    fn to_value(&self) -> Result<Value, serde_json::Error>;
}

macro_rules! plain_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                type Shadow = Self;

                fn from_shadow(shadow: Self) -> Option<Self> {
                    Some(shadow)
                }

                fn to_value(&self) -> Result<Value, serde_json::Error> {
                    serde_json::to_value(self)
                }
            }
        )*
    };
}

plain_field!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    Value,
    Map<String, Value>,
);

/// RFC 3339 with fractional seconds only when there are any, then always
/// as milliseconds. The offset is kept as received, `Z` for UTC.
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    if timestamp.nanosecond() == 0 {
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    } else {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Field for DateTime<FixedOffset> {
    type Shadow = Self;

    fn from_shadow(shadow: Self) -> Option<Self> {
        Some(shadow)
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        Ok(Value::String(format_timestamp(self)))
    }
}

/// An element that keeps its own raw form. An unparsed element leaves the
/// list or map holding it valid, unlike a model held directly by a field.
impl<T: Model> Field for Decoded<T> {
    type Shadow = Self;

    fn from_shadow(shadow: Self) -> Option<Self> {
        Some(shadow)
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Decoded::Valid(value) => value.to_object().map(Value::Object),
            Decoded::Unparsed(object) => Ok(Value::Object(object.clone())),
        }
    }
}

impl<T: Field> Field for Vec<T> {
    type Shadow = Vec<T::Shadow>;

    fn from_shadow(shadow: Self::Shadow) -> Option<Self> {
        shadow.into_iter().map(T::from_shadow).collect()
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        self.iter()
            .map(Field::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl<T: Field> Field for Option<T> {
    type Shadow = Option<T::Shadow>;

    fn from_shadow(shadow: Self::Shadow) -> Option<Self> {
        match shadow {
            Some(shadow) => T::from_shadow(shadow).map(Some),
            None => Some(None),
        }
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Some(value) => value.to_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Field> Field for HashMap<String, T> {
    type Shadow = HashMap<String, T::Shadow>;

    fn from_shadow(shadow: Self::Shadow) -> Option<Self> {
        shadow
            .into_iter()
            .map(|(key, value)| T::from_shadow(value).map(|value| (key, value)))
            .collect()
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut object = Map::with_capacity(self.len());
        for (key, value) in self {
            object.insert(key.clone(), value.to_value()?);
        }
        Ok(Value::Object(object))
    }
}
