// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON view of message values, keyed by field name.
//!
//! Mapping:
//!
//! - varint → JSON number
//! - bytes → lowercase hex string
//! - nested message → JSON object
//! - repeated field → JSON array
//!
//! `null` on import means "absent". The view is for tooling and fixtures; it
//! is not part of the wire contract.

use serde_json::{Map, Number, Value as Json};
use thiserror::Error;

use crate::codec::found_shape;
use crate::error::CodecError;
use crate::schema::{Cardinality, FieldDescriptor, Schema, ValueType};
use crate::value::{FieldValue, MessageValue, Value};
use crate::wire::varint_from_i128;

/// Errors converting between JSON and message values.
#[derive(Debug, Error)]
pub enum JsonError {
    /// Value does not conform to the schema.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// JSON object key names no field.
    #[error("message `{message}` has no field named `{name}`")]
    UnknownName {
        /// Message type name.
        message: String,
        /// Offending key.
        name: String,
    },
    /// JSON value has the wrong shape for the field.
    #[error("field `{field}`: expected {expected}")]
    Shape {
        /// Field name.
        field: String,
        /// What the field needs.
        expected: &'static str,
    },
    /// Bytes field is not valid hex.
    #[error("field `{field}`: invalid hex: {source}")]
    Hex {
        /// Field name.
        field: String,
        /// Underlying decode failure.
        #[source]
        source: hex::FromHexError,
    },
    /// Top-level or nested JSON is not an object.
    #[error("message `{0}`: expected a JSON object")]
    NotAnObject(String),
}

/// Export the populated fields of `value`.
pub fn to_json(schema: &Schema, value: &MessageValue) -> Result<Json, JsonError> {
    export(schema, value, false)
}

/// Export every declared field, filling absent optional fields with their
/// defaults and absent repeated fields with `[]`. Absent nested messages
/// export as `null`.
pub fn to_json_with_defaults(schema: &Schema, value: &MessageValue) -> Result<Json, JsonError> {
    export(schema, value, true)
}

fn export(schema: &Schema, value: &MessageValue, with_defaults: bool) -> Result<Json, JsonError> {
    if let Some(number) = value.numbers().find(|n| schema.field(*n).is_none()) {
        return Err(CodecError::UnknownField {
            message: schema.name().to_owned(),
            number,
        }
        .into());
    }

    let mut out = Map::new();
    for field in schema.fields() {
        let json = match (field.cardinality(), value.get(field.number())) {
            (Cardinality::Optional, Some(FieldValue::Single(v))) => {
                export_value(field, v, with_defaults)?
            }
            (Cardinality::Repeated, Some(FieldValue::Repeated(vs))) => Json::Array(
                vs.iter()
                    .map(|v| export_value(field, v, with_defaults))
                    .collect::<Result<_, _>>()?,
            ),
            (_, Some(other)) => {
                return Err(CodecError::TypeMismatch {
                    number: field.number(),
                    expected: field.shape(),
                    found: found_shape(other),
                }
                .into());
            }
            (_, None) if !with_defaults => continue,
            (_, None) if field.is_repeated() => Json::Array(Vec::new()),
            (_, None) => match field.default_value() {
                Some(v) => export_value(field, v, with_defaults)?,
                None => Json::Null,
            },
        };
        out.insert(field.name().to_owned(), json);
    }
    Ok(Json::Object(out))
}

fn export_value(field: &FieldDescriptor, value: &Value, with_defaults: bool) -> Result<Json, JsonError> {
    match (field.value_type(), value) {
        (ValueType::UnsignedVarint, Value::Varint(n)) => Ok(Json::Number(Number::from(*n))),
        (ValueType::Bytes, Value::Bytes(b)) => Ok(Json::String(hex::encode(b))),
        (ValueType::Message(nested), Value::Message(m)) => export(nested, m, with_defaults),
        _ => Err(CodecError::TypeMismatch {
            number: field.number(),
            expected: field.shape(),
            found: value.kind().to_string(),
        }
        .into()),
    }
}

/// Build a message value from a JSON object keyed by field name.
pub fn from_json(schema: &Schema, json: &Json) -> Result<MessageValue, JsonError> {
    let object = json
        .as_object()
        .ok_or_else(|| JsonError::NotAnObject(schema.name().to_owned()))?;

    let mut out = MessageValue::new();
    for (name, item) in object {
        let field = schema
            .field_by_name(name)
            .ok_or_else(|| JsonError::UnknownName {
                message: schema.name().to_owned(),
                name: name.clone(),
            })?;
        if item.is_null() {
            continue;
        }
        if field.is_repeated() {
            let items = item.as_array().ok_or_else(|| JsonError::Shape {
                field: name.clone(),
                expected: "an array",
            })?;
            let values = items
                .iter()
                .map(|i| import_value(field, i))
                .collect::<Result<Vec<_>, _>>()?;
            out.extend(field.number(), values);
        } else {
            out.set(field.number(), import_value(field, item)?);
        }
    }
    Ok(out)
}

fn import_value(field: &FieldDescriptor, json: &Json) -> Result<Value, JsonError> {
    match field.value_type() {
        ValueType::UnsignedVarint => import_varint(field, json).map(Value::Varint),
        ValueType::Bytes => {
            let text = json.as_str().ok_or_else(|| JsonError::Shape {
                field: field.name().to_owned(),
                expected: "a hex string",
            })?;
            hex::decode(text)
                .map(Value::Bytes)
                .map_err(|source| JsonError::Hex {
                    field: field.name().to_owned(),
                    source,
                })
        }
        ValueType::Message(nested) => from_json(nested, json).map(Value::Message),
    }
}

fn import_varint(field: &FieldDescriptor, json: &Json) -> Result<u64, JsonError> {
    let Json::Number(n) = json else {
        return Err(JsonError::Shape {
            field: field.name().to_owned(),
            expected: "an unsigned integer",
        });
    };
    if let Some(v) = n.as_u64() {
        return Ok(v);
    }
    match n.as_i64() {
        Some(signed) => Ok(varint_from_i128(i128::from(signed))?),
        // Floats and integers beyond u64 cannot be varints.
        None => Err(CodecError::ValueOutOfRange.into()),
    }
}
