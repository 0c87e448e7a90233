// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Schema-driven encode/decode of [`MessageValue`]s.
//!
//! Encoding walks the schema in declaration order and omits optional fields
//! equal to their default and empty repeated fields, so the output is a
//! deterministic function of the normalized value. Decoding accepts fields in
//! any order, skips numbers the schema does not declare, and lets the last
//! occurrence of an optional field win.

use tracing::{debug, trace};

use crate::error::CodecError;
use crate::schema::{Cardinality, FieldDescriptor, Schema, ValueType};
use crate::value::{FieldValue, MessageValue, Value};
use crate::wire::{Reader, WireType, Writer};

/// Default ceiling on a decoded message and on any single length prefix.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 64 * 1024;

/// Caller-supplied bounds applied to every decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest accepted input and largest accepted length prefix, in bytes.
    pub max_message_len: usize,
}

impl DecodeLimits {
    /// Limits with the given maximum message length.
    pub const fn new(max_message_len: usize) -> Self {
        Self { max_message_len }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_LEN)
    }
}

/// Encode `value` according to `schema`.
pub fn encode(schema: &Schema, value: &MessageValue) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer::default();
    encode_into(schema, value, &mut writer)?;
    Ok(writer.into_vec())
}

/// Encode `value` according to `schema`, appending to `writer`.
pub fn encode_into(
    schema: &Schema,
    value: &MessageValue,
    writer: &mut Writer,
) -> Result<(), CodecError> {
    if let Some(number) = value.numbers().find(|n| schema.field(*n).is_none()) {
        return Err(CodecError::UnknownField {
            message: schema.name().to_owned(),
            number,
        });
    }

    for field in schema.fields() {
        let Some(slot) = value.get(field.number()) else {
            continue;
        };
        match (field.cardinality(), slot) {
            (Cardinality::Optional, FieldValue::Single(v)) => {
                check_kind(field, v)?;
                if !field.is_default(v) {
                    encode_one(field, v, writer)?;
                }
            }
            (Cardinality::Repeated, FieldValue::Repeated(values)) => {
                for v in values {
                    check_kind(field, v)?;
                    encode_one(field, v, writer)?;
                }
            }
            (_, other) => {
                return Err(CodecError::TypeMismatch {
                    number: field.number(),
                    expected: field.shape(),
                    found: found_shape(other),
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn found_shape(slot: &FieldValue) -> String {
    match slot {
        FieldValue::Single(v) => v.kind().to_string(),
        FieldValue::Repeated(vs) => match vs.first() {
            Some(v) => format!("repeated {}", v.kind()),
            None => "repeated".to_owned(),
        },
    }
}

fn check_kind(field: &FieldDescriptor, value: &Value) -> Result<(), CodecError> {
    if field.value_type().kind() == value.kind() {
        Ok(())
    } else {
        Err(CodecError::TypeMismatch {
            number: field.number(),
            expected: field.shape(),
            found: value.kind().to_string(),
        })
    }
}

fn encode_one(field: &FieldDescriptor, value: &Value, writer: &mut Writer) -> Result<(), CodecError> {
    let number = field.number();
    match (field.value_type(), value) {
        (ValueType::UnsignedVarint, Value::Varint(n)) => {
            writer.write_tag(number, WireType::Varint);
            writer.write_varint(*n);
        }
        (ValueType::Bytes, Value::Bytes(b)) => {
            writer.write_tag(number, WireType::LengthDelimited);
            writer.write_len_delimited(b);
        }
        (ValueType::Message(nested), Value::Message(m)) => {
            let body = encode(nested, m)?;
            writer.write_tag(number, WireType::LengthDelimited);
            writer.write_len_delimited(&body);
        }
        _ => {
            return Err(CodecError::TypeMismatch {
                number,
                expected: field.shape(),
                found: value.kind().to_string(),
            });
        }
    }
    Ok(())
}

/// Decode `bytes` according to `schema` with [`DecodeLimits::default`].
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<MessageValue, CodecError> {
    decode_with_limits(schema, bytes, DecodeLimits::default())
}

/// Decode `bytes` according to `schema`, bounded by `limits`.
pub fn decode_with_limits(
    schema: &Schema,
    bytes: &[u8],
    limits: DecodeLimits,
) -> Result<MessageValue, CodecError> {
    if bytes.len() > limits.max_message_len {
        return Err(CodecError::LengthLimitExceeded {
            len: bytes.len() as u64,
            limit: limits.max_message_len,
        });
    }
    let value = decode_region(schema, bytes, limits)?;
    trace!(
        message = schema.name(),
        len = bytes.len(),
        fields = value.len(),
        "decoded message"
    );
    Ok(value)
}

fn decode_region(
    schema: &Schema,
    bytes: &[u8],
    limits: DecodeLimits,
) -> Result<MessageValue, CodecError> {
    let max = limits.max_message_len;
    let mut reader = Reader::new(bytes);
    let mut out = MessageValue::new();

    while !reader.is_empty() {
        let (number, wire_type) = reader.read_tag()?;
        let Some(field) = schema.field(number) else {
            debug!(
                message = schema.name(),
                number,
                ?wire_type,
                "skipping unknown field"
            );
            reader.skip(wire_type, max)?;
            continue;
        };

        let declared = field.value_type().wire_type();
        if wire_type != declared {
            return Err(CodecError::WireTypeMismatch {
                number,
                kind: field.value_type().kind(),
                found: wire_type,
            });
        }

        let value = match field.value_type() {
            ValueType::UnsignedVarint => Value::Varint(reader.read_varint()?),
            ValueType::Bytes => Value::Bytes(reader.read_len_delimited(max)?.to_vec()),
            ValueType::Message(nested) => {
                let body = reader.read_len_delimited(max)?;
                Value::Message(decode_region(nested, body, limits)?)
            }
        };

        match field.cardinality() {
            Cardinality::Repeated => out.push(number, value),
            Cardinality::Optional => out.set(number, value),
        };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaHandle;

    fn counter() -> SchemaHandle {
        Schema::builder("Counter").varint(1, "count").build().unwrap()
    }

    #[test]
    fn encodes_reference_varint_field() {
        let schema = counter();
        let value = MessageValue::new().with(1, 300u64);
        let bytes = encode(&schema, &value).unwrap();
        assert_eq!(bytes, vec![0x08, 0xac, 0x02]);
        assert_eq!(decode(&schema, &bytes).unwrap(), value);
    }

    #[test]
    fn default_values_are_omitted() {
        let schema = counter();
        let value = MessageValue::new().with(1, 0u64);
        assert!(encode(&schema, &value).unwrap().is_empty());
    }

    #[test]
    fn unknown_number_fails_encode() {
        let schema = counter();
        let value = MessageValue::new().with(7, 1u64);
        assert_eq!(
            encode(&schema, &value),
            Err(CodecError::UnknownField {
                message: "Counter".into(),
                number: 7
            })
        );
    }

    #[test]
    fn wrong_kind_and_shape_fail_encode() {
        let schema = counter();
        let err = encode(&schema, &MessageValue::new().with(1, b"x")).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { number: 1, .. }));
        let err = encode(&schema, &MessageValue::new().with_repeated(1, [1u64])).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { number: 1, .. }));
    }

    #[test]
    fn last_occurrence_of_optional_wins() {
        let schema = counter();
        let decoded = decode(&schema, &[0x08, 0x01, 0x08, 0x02]).unwrap();
        assert_eq!(decoded, MessageValue::new().with(1, 2u64));
    }

    #[test]
    fn wire_type_mismatch_is_rejected() {
        let schema = counter();
        let err = decode(&schema, &[0x0a, 0x01, 0x00]).unwrap_err();
        assert_eq!(
            err,
            CodecError::WireTypeMismatch {
                number: 1,
                kind: crate::schema::ValueKind::Varint,
                found: WireType::LengthDelimited
            }
        );
    }

    #[test]
    fn oversized_input_is_rejected_before_parsing() {
        let schema = counter();
        let err = decode_with_limits(&schema, &[0x08, 0x01], DecodeLimits::new(1)).unwrap_err();
        assert_eq!(err, CodecError::LengthLimitExceeded { len: 2, limit: 1 });
    }

    #[test]
    fn nested_messages_decode_within_their_slice() {
        let inner = counter();
        let outer = Schema::builder("Outer")
            .message(1, "inner", &inner)
            .varint(2, "tail")
            .build()
            .unwrap();
        // inner claims 2 bytes but its varint would need a third.
        let bytes = [0x0a, 0x02, 0x08, 0x80, 0x10, 0x01];
        assert_eq!(decode(&outer, &bytes), Err(CodecError::MalformedVarint));
    }
}
