// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Schema-driven binary message codec over the protobuf wire subset.
//!
//! Messages are described at runtime by immutable [`Schema`]s: ordered tables
//! of numbered fields, each an unsigned varint, a byte string or a nested
//! message, optionally repeated. The codec turns [`MessageValue`]s into the
//! wire format and back:
//!
//! - tags are `(field_number << 3) | wire_type`, with wire types 0 (varint)
//!   and 2 (length-delimited);
//! - integers are little-endian base-128 varints of at most ten bytes;
//! - fields equal to their default are never emitted, so encoding a
//!   normalized value is deterministic;
//! - unknown fields are skipped on decode and rejected on encode.
//!
//! ```
//! use pbwire_core::{decode, encode, MessageValue, Schema};
//!
//! let schema = Schema::builder("Counter").varint(1, "count").build()?;
//! let value = MessageValue::new().with(1, 300u64);
//! let bytes = encode(&schema, &value)?;
//! assert_eq!(bytes, [0x08, 0xac, 0x02]);
//! assert_eq!(decode(&schema, &bytes)?, value);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Schemas that reference each other by name are assembled with
//! [`RegistryBuilder`], which rejects nesting cycles and dangling references.
//! With the default `json` feature, [`json`] converts values to and from a
//! name-keyed JSON view for tooling.

pub mod codec;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod registry;
pub mod schema;
pub mod value;
pub mod wire;

pub use codec::{
    decode, decode_with_limits, encode, encode_into, DecodeLimits, DEFAULT_MAX_MESSAGE_LEN,
};
pub use error::{CodecError, SchemaError};
pub use registry::{FieldDecl, MessageDecl, RegistryBuilder, SchemaRegistry, TypeRef};
pub use schema::{
    Cardinality, FieldDescriptor, Schema, SchemaBuilder, SchemaHandle, ValueKind, ValueType,
};
pub use value::{FieldValue, MessageValue, MessageView, Value};
pub use wire::{
    decode_bytes, decode_varint, encode_bytes, encode_varint, varint_len, Reader, WireType,
    Writer, MAX_FIELD_NUMBER, MAX_VARINT_LEN,
};
