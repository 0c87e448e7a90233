// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Golden vectors and rejection cases for the message codec.

use pbwire_core::{
    decode, decode_with_limits, encode, CodecError, DecodeLimits, MessageValue, Schema,
    SchemaHandle, WireType,
};

fn sample() -> SchemaHandle {
    Schema::builder("Sample")
        .varint(1, "id")
        .repeated_bytes(2, "tags")
        .build()
        .expect("schema")
}

#[test]
fn golden_varint_field() {
    let bytes = encode(&sample(), &MessageValue::new().with(1, 300u64)).expect("encode");
    let expected: &[u8] = &[0x08, 0xac, 0x02];
    assert_eq!(bytes, expected);
}

#[test]
fn golden_repeated_bytes_field() {
    let value = MessageValue::new().with_repeated(2, [&b"a"[..], &b"bb"[..]]);
    let bytes = encode(&sample(), &value).expect("encode");
    // 12 01 'a' 12 02 'b' 'b'
    let expected: &[u8] = &[0x12, 0x01, 0x61, 0x12, 0x02, 0x62, 0x62];
    assert_eq!(bytes, expected);
    assert_eq!(decode(&sample(), &bytes).expect("decode"), value);
}

#[test]
fn golden_nested_message() {
    let inner = sample();
    let outer = Schema::builder("Outer")
        .message(1, "inner", &inner)
        .build()
        .expect("schema");
    let value = MessageValue::new().with(1, MessageValue::new().with(1, 1u64));
    let bytes = encode(&outer, &value).expect("encode");
    let expected: &[u8] = &[0x0a, 0x02, 0x08, 0x01];
    assert_eq!(bytes, expected);
    assert_eq!(decode(&outer, &bytes).expect("decode"), value);
}

#[test]
fn empty_input_decodes_to_all_defaults() {
    let decoded = decode(&sample(), &[]).expect("decode");
    assert!(decoded.is_empty());
}

#[test]
fn encoding_follows_declaration_order_not_insertion_order() {
    let schema = Schema::builder("Ordered")
        .varint(5, "later")
        .varint(1, "earlier")
        .build()
        .expect("schema");
    let mut value = MessageValue::new();
    value.set(1, 1u64).set(5, 5u64);
    let bytes = encode(&schema, &value).expect("encode");
    assert_eq!(bytes, vec![0x28, 0x05, 0x08, 0x01]);
}

#[test]
fn unknown_fields_are_skipped() {
    // field 99 varint 7, then field 1 varint 3, then field 98 bytes "zz"
    let bytes: &[u8] = &[
        0x98, 0x06, 0x07, 0x08, 0x03, 0x92, 0x06, 0x02, b'z', b'z',
    ];
    let decoded = decode(&sample(), bytes).expect("decode");
    assert_eq!(decoded, MessageValue::new().with(1, 3u64));
}

#[test]
fn reject_truncated_length_prefix() {
    let bytes: &[u8] = &[0x12, 0x05, b'a'];
    assert_eq!(
        decode(&sample(), bytes),
        Err(CodecError::TruncatedStream {
            needed: 5,
            remaining: 1
        })
    );
}

#[test]
fn reject_stream_ending_mid_varint() {
    assert_eq!(decode(&sample(), &[0x08, 0xac]), Err(CodecError::MalformedVarint));
    assert_eq!(decode(&sample(), &[0x88]), Err(CodecError::MalformedVarint));
}

#[test]
fn reject_overlong_varint() {
    let mut bytes = vec![0x08];
    bytes.extend([0xff; 10]);
    bytes.push(0x01);
    assert_eq!(decode(&sample(), &bytes), Err(CodecError::VarintOverflow));
}

#[test]
fn reject_unsupported_wire_types() {
    // field 1, wire type 1 (fixed64)
    assert_eq!(
        decode(&sample(), &[0x09, 0, 0, 0, 0, 0, 0, 0, 0]),
        Err(CodecError::UnsupportedWireType(1))
    );
    // field 1, wire type 5 (fixed32)
    assert_eq!(
        decode(&sample(), &[0x0d, 0, 0, 0, 0]),
        Err(CodecError::UnsupportedWireType(5))
    );
}

#[test]
fn reject_field_number_zero() {
    assert_eq!(decode(&sample(), &[0x00, 0x01]), Err(CodecError::InvalidTag(0)));
}

#[test]
fn reject_declared_field_with_wrong_wire_type() {
    let err = decode(&sample(), &[0x10, 0x01]).expect_err("varint in bytes field");
    assert!(matches!(
        err,
        CodecError::WireTypeMismatch {
            number: 2,
            found: WireType::Varint,
            ..
        }
    ));
}

#[test]
fn length_limit_applies_to_prefixes_before_truncation() {
    let bytes: &[u8] = &[0x12, 0x7f, b'a'];
    assert_eq!(
        decode_with_limits(&sample(), bytes, DecodeLimits::new(16)),
        Err(CodecError::LengthLimitExceeded {
            len: 0x7f,
            limit: 16
        })
    );
}
