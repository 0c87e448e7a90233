// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for schema construction and the wire codec.

use thiserror::Error;

use crate::schema::ValueKind;
use crate::wire::WireType;

/// Errors produced while encoding or decoding message bytes.
///
/// Every decode error is terminal for that call: the caller never receives a
/// partially populated value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The stream ended inside a varint (no terminating byte).
    #[error("malformed varint: stream ended before a terminating byte")]
    MalformedVarint,
    /// A varint needed more than 64 bits.
    #[error("varint overflows 64 bits")]
    VarintOverflow,
    /// A length prefix claimed more bytes than remain in the region.
    #[error("truncated stream: need {needed} bytes, {remaining} remain")]
    TruncatedStream {
        /// Bytes the payload claims.
        needed: u64,
        /// Bytes left in the bounded region.
        remaining: usize,
    },
    /// Input or a claimed length exceeds the caller's limit.
    #[error("length {len} exceeds limit {limit}")]
    LengthLimitExceeded {
        /// Offending length.
        len: u64,
        /// Configured maximum.
        limit: usize,
    },
    /// A message value populates a field number its schema does not declare.
    #[error("field {number} is not declared by message `{message}`")]
    UnknownField {
        /// Message type name.
        message: String,
        /// Undeclared field number.
        number: u32,
    },
    /// A value's runtime kind or shape disagrees with its descriptor.
    #[error("field {number}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Field number.
        number: u32,
        /// Declared shape.
        expected: String,
        /// Shape actually supplied.
        found: String,
    },
    /// A known field arrived with an incompatible wire type.
    #[error("field {number}: declared {kind} but wire type is {found:?}")]
    WireTypeMismatch {
        /// Field number.
        number: u32,
        /// Declared value kind.
        kind: ValueKind,
        /// Wire type read from the tag.
        found: WireType,
    },
    /// A number does not fit the unsigned 64-bit varint domain.
    #[error("value out of range for an unsigned 64-bit varint")]
    ValueOutOfRange,
    /// A tag carried field number zero or one beyond the 29-bit range.
    #[error("invalid tag {0:#x}")]
    InvalidTag(u64),
    /// Wire types other than varint and length-delimited are not supported.
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),
}

/// Errors raised while building schemas or a schema registry.
///
/// A schema that fails construction is never handed out.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Field number outside `1..=MAX_FIELD_NUMBER`.
    #[error("message `{message}`: invalid field number {number}")]
    InvalidFieldNumber {
        /// Message type name.
        message: String,
        /// Rejected number.
        number: u32,
    },
    /// Two descriptors share a field number.
    #[error("message `{message}`: duplicate field number {number}")]
    DuplicateFieldNumber {
        /// Message type name.
        message: String,
        /// Repeated number.
        number: u32,
    },
    /// Two descriptors share a field name.
    #[error("message `{message}`: duplicate field name `{name}`")]
    DuplicateFieldName {
        /// Message type name.
        message: String,
        /// Repeated name.
        name: String,
    },
    /// A declared default does not match the field's value kind.
    #[error("message `{message}`: default for field `{field}` is not a {kind}")]
    DefaultTypeMismatch {
        /// Message type name.
        message: String,
        /// Field name.
        field: String,
        /// Declared value kind.
        kind: ValueKind,
    },
    /// Repeated fields cannot declare a default.
    #[error("message `{message}`: repeated field `{field}` cannot carry a default")]
    RepeatedDefault {
        /// Message type name.
        message: String,
        /// Field name.
        field: String,
    },
    /// A message type nests itself directly or transitively.
    #[error("cyclic schema: {}", .0.join(" -> "))]
    CyclicSchema(Vec<String>),
    /// A field references a message type nobody declared.
    #[error("message `{message}` references unknown message type `{missing}`")]
    UnknownMessage {
        /// Referencing message type.
        message: String,
        /// Missing type name.
        missing: String,
    },
    /// Two message types were declared with the same name.
    #[error("message type `{0}` declared twice")]
    DuplicateMessage(String),
}
