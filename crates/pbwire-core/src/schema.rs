// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Field descriptors and immutable message schemas.
//!
//! A [`Schema`] is the data-driven replacement for a generated per-message
//! type: an ordered table of [`FieldDescriptor`]s keyed by field number.
//! Schemas are built once through [`SchemaBuilder`], validated, and then shared
//! read-only as [`SchemaHandle`]s.
//!
//! Nested message fields hold the nested schema's handle directly, so the
//! schema graph is fixed at construction. A builder only accepts handles that
//! already exist, which keeps hand-built graphs acyclic; name-based
//! declarations go through [`crate::registry::RegistryBuilder`], which rejects
//! cycles before any schema is handed out.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::SchemaError;
use crate::value::Value;
use crate::wire::{WireType, MAX_FIELD_NUMBER};

/// Shared, immutable schema reference.
pub type SchemaHandle = Arc<Schema>;

/// Closed set of value kinds, without the nested schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Unsigned varint.
    Varint,
    /// Length-delimited byte string.
    Bytes,
    /// Nested message.
    Message,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Varint => "varint",
            Self::Bytes => "bytes",
            Self::Message => "message",
        })
    }
}

/// Declared value type of a field.
#[derive(Debug, Clone)]
pub enum ValueType {
    /// Unsigned 64-bit varint.
    UnsignedVarint,
    /// Raw byte string.
    Bytes,
    /// Nested message of the referenced schema.
    Message(SchemaHandle),
}

impl ValueType {
    /// Kind of value this type holds.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::UnsignedVarint => ValueKind::Varint,
            Self::Bytes => ValueKind::Bytes,
            Self::Message(_) => ValueKind::Message,
        }
    }

    /// Wire type used to frame values of this type.
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::UnsignedVarint => WireType::Varint,
            Self::Bytes | Self::Message(_) => WireType::LengthDelimited,
        }
    }

    /// Nested schema, for message-typed fields.
    pub fn nested(&self) -> Option<&SchemaHandle> {
        match self {
            Self::Message(schema) => Some(schema),
            _ => None,
        }
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnsignedVarint, Self::UnsignedVarint) | (Self::Bytes, Self::Bytes) => true,
            (Self::Message(a), Self::Message(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl Eq for ValueType {}

/// Whether a field holds at most one value or a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Zero or one value; absent reads back as the default.
    Optional,
    /// Ordered sequence; empty means absent.
    Repeated,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Optional => "optional",
            Self::Repeated => "repeated",
        })
    }
}

/// Immutable metadata for one field of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    number: u32,
    name: String,
    value_type: ValueType,
    cardinality: Cardinality,
    default: Option<Value>,
}

impl FieldDescriptor {
    /// Wire identity of the field.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// In-memory name; not wire-significant.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Declared cardinality.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Shorthand for `cardinality() == Cardinality::Repeated`.
    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    /// Value an absent optional field reads back as.
    ///
    /// `None` for repeated fields and for nested messages, which have no
    /// default instance.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether `value` equals this field's default (and so is omitted on
    /// encode).
    pub fn is_default(&self, value: &Value) -> bool {
        self.default.as_ref() == Some(value)
    }

    /// Human-readable shape, e.g. `repeated bytes`.
    pub fn shape(&self) -> String {
        match self.cardinality {
            Cardinality::Optional => self.value_type.kind().to_string(),
            Cardinality::Repeated => format!("repeated {}", self.value_type.kind()),
        }
    }
}

/// Immutable description of one message type.
///
/// Field order is declaration order; it only matters for re-encoding
/// determinism.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
    by_number: BTreeMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl Schema {
    /// Start building a schema for the message type `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Message type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by number.
    pub fn field(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&idx| &self.fields[idx])
    }

    /// Look up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&idx| &self.fields[idx])
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Eq for Schema {}

/// Incremental schema constructor; all validation happens in [`build`].
///
/// [`build`]: SchemaBuilder::build
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    explicit_defaults: Vec<bool>,
}

impl SchemaBuilder {
    /// Start a schema for the message type `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            explicit_defaults: Vec::new(),
        }
    }

    /// Declare a field with an explicit type, cardinality and optional
    /// default.
    pub fn field(
        mut self,
        number: u32,
        name: impl Into<String>,
        value_type: ValueType,
        cardinality: Cardinality,
        default: Option<Value>,
    ) -> Self {
        self.explicit_defaults.push(default.is_some());
        self.fields.push(FieldDescriptor {
            number,
            name: name.into(),
            value_type,
            cardinality,
            default,
        });
        self
    }

    /// Optional varint, default 0.
    pub fn varint(self, number: u32, name: impl Into<String>) -> Self {
        self.field(number, name, ValueType::UnsignedVarint, Cardinality::Optional, None)
    }

    /// Optional varint with a declared default.
    pub fn varint_with_default(self, number: u32, name: impl Into<String>, default: u64) -> Self {
        self.field(
            number,
            name,
            ValueType::UnsignedVarint,
            Cardinality::Optional,
            Some(Value::Varint(default)),
        )
    }

    /// Optional bytes, default empty.
    pub fn bytes(self, number: u32, name: impl Into<String>) -> Self {
        self.field(number, name, ValueType::Bytes, Cardinality::Optional, None)
    }

    /// Optional nested message.
    pub fn message(self, number: u32, name: impl Into<String>, schema: &SchemaHandle) -> Self {
        self.field(
            number,
            name,
            ValueType::Message(Arc::clone(schema)),
            Cardinality::Optional,
            None,
        )
    }

    /// Repeated varint.
    pub fn repeated_varint(self, number: u32, name: impl Into<String>) -> Self {
        self.field(number, name, ValueType::UnsignedVarint, Cardinality::Repeated, None)
    }

    /// Repeated bytes.
    pub fn repeated_bytes(self, number: u32, name: impl Into<String>) -> Self {
        self.field(number, name, ValueType::Bytes, Cardinality::Repeated, None)
    }

    /// Repeated nested message.
    pub fn repeated_message(
        self,
        number: u32,
        name: impl Into<String>,
        schema: &SchemaHandle,
    ) -> Self {
        self.field(
            number,
            name,
            ValueType::Message(Arc::clone(schema)),
            Cardinality::Repeated,
            None,
        )
    }

    /// Validate the declarations and freeze them into a shared schema.
    pub fn build(self) -> Result<SchemaHandle, SchemaError> {
        let Self {
            name,
            mut fields,
            explicit_defaults,
        } = self;

        let mut by_number = BTreeMap::new();
        let mut by_name = HashMap::new();
        for (idx, (field, explicit)) in fields.iter_mut().zip(explicit_defaults).enumerate() {
            if field.number == 0 || field.number > MAX_FIELD_NUMBER {
                return Err(SchemaError::InvalidFieldNumber {
                    message: name,
                    number: field.number,
                });
            }
            if by_number.insert(field.number, idx).is_some() {
                return Err(SchemaError::DuplicateFieldNumber {
                    message: name,
                    number: field.number,
                });
            }
            if by_name.insert(field.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateFieldName {
                    message: name,
                    name: field.name.clone(),
                });
            }
            field.default = resolve_default(&name, field, explicit)?;
        }

        Ok(Arc::new(Schema {
            name,
            fields,
            by_number,
            by_name,
        }))
    }
}

fn resolve_default(
    message: &str,
    field: &FieldDescriptor,
    explicit: bool,
) -> Result<Option<Value>, SchemaError> {
    if field.cardinality == Cardinality::Repeated {
        if explicit {
            return Err(SchemaError::RepeatedDefault {
                message: message.to_owned(),
                field: field.name.clone(),
            });
        }
        return Ok(None);
    }
    let kind = field.value_type.kind();
    match (&field.default, kind) {
        (None, ValueKind::Varint) => Ok(Some(Value::Varint(0))),
        (None, ValueKind::Bytes) => Ok(Some(Value::Bytes(Vec::new()))),
        (None, ValueKind::Message) => Ok(None),
        (Some(v @ Value::Varint(_)), ValueKind::Varint)
        | (Some(v @ Value::Bytes(_)), ValueKind::Bytes) => Ok(Some(v.clone())),
        (Some(_), kind) => Err(SchemaError::DefaultTypeMismatch {
            message: message.to_owned(),
            field: field.name.clone(),
            kind,
        }),
    }
}
