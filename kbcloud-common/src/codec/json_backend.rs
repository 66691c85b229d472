//! Backend built on the `json` crate. Typed values still go through serde,
//! bridged by `serde_json::Value`.

use json::JsonValue;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::CodecError;

pub(super) fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let value = serde_json::to_value(value)?;
    Ok(into_json(value)?.dump().into_bytes())
}

pub(super) fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    let text = std::str::from_utf8(bytes)?;
    let parsed = json::parse(text)?;
    Ok(serde_json::from_value(from_json(parsed)?)?)
}

fn into_json(value: Value) -> Result<JsonValue, CodecError> {
    Ok(match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Boolean(b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else {
                let f = n.as_f64().filter(|f| f.is_finite());
                JsonValue::from(f.ok_or(CodecError::NumberOutOfRange)?)
            }
        }
        Value::String(s) => JsonValue::String(s),
        Value::Array(items) => JsonValue::Array(
            items
                .into_iter()
                .map(into_json)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(entries) => {
            let mut object = json::object::Object::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(&key, into_json(value)?);
            }
            JsonValue::Object(object)
        }
    })
}

fn from_json(value: JsonValue) -> Result<Value, CodecError> {
    Ok(match value {
        JsonValue::Null => Value::Null,
        JsonValue::Short(s) => Value::String(s.as_str().to_owned()),
        JsonValue::String(s) => Value::String(s),
        JsonValue::Number(n) => from_number(n)?,
        JsonValue::Boolean(b) => Value::Bool(b),
        JsonValue::Object(object) => {
            let mut entries = serde_json::Map::with_capacity(object.len());
            for (key, value) in object.iter() {
                entries.insert(key.to_owned(), from_json(value.clone())?);
            }
            Value::Object(entries)
        }
        JsonValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<_, _>>()?,
        ),
    })
}

// integers stay integers so that typed decoding into i64/u64 keeps working;
// `-0` stays a float, as serde_json reads it
fn from_number(n: json::number::Number) -> Result<Value, CodecError> {
    let (positive, mantissa, exponent) = n.as_parts();
    if exponent == 0 && (positive || mantissa != 0) {
        if positive {
            return Ok(Value::from(mantissa));
        }
        if let Some(i) = 0i64.checked_sub_unsigned(mantissa) {
            return Ok(Value::from(i));
        }
    }
    serde_json::Number::from_f64(f64::from(n))
        .map(Value::Number)
        .ok_or(CodecError::NumberOutOfRange)
}
