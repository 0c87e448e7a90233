// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Runtime message values.
//!
//! A [`MessageValue`] is a field-number-keyed tree of values. It is only
//! meaningful relative to the [`Schema`] it was built for; the codec checks
//! conformance when encoding.

use std::collections::BTreeMap;

use crate::schema::{Cardinality, FieldDescriptor, Schema, ValueKind};

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned varint.
    Varint(u64),
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// Nested message.
    Message(MessageValue),
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Varint(_) => ValueKind::Varint,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Message(_) => ValueKind::Message,
        }
    }

    /// The varint, if this is one.
    pub fn as_varint(&self) -> Option<u64> {
        match self {
            Self::Varint(n) => Some(*n),
            _ => None,
        }
    }

    /// The byte string, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The nested message, if this is one.
    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Varint(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Varint(u64::from(n))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<MessageValue> for Value {
    fn from(m: MessageValue) -> Self {
        Self::Message(m)
    }
}

/// Contents of one populated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Optional field holding one value.
    Single(Value),
    /// Repeated field holding an ordered sequence (possibly empty).
    Repeated(Vec<Value>),
}

impl FieldValue {
    /// Cardinality this shape corresponds to.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::Single(_) => Cardinality::Optional,
            Self::Repeated(_) => Cardinality::Repeated,
        }
    }

    /// Values in order (one for `Single`).
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Repeated(vs) => vs,
        }
    }
}

/// Field-number-keyed message instance.
///
/// Owned exclusively by its creator; nested messages are owned by their
/// parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageValue {
    fields: BTreeMap<u32, FieldValue>,
}

impl MessageValue {
    /// Empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, number: u32, value: impl Into<Value>) -> Self {
        self.set(number, value);
        self
    }

    /// Builder-style [`extend`](Self::extend).
    #[must_use]
    pub fn with_repeated<I, V>(mut self, number: u32, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.extend(number, values);
        self
    }

    /// Set an optional field, replacing any previous value.
    pub fn set(&mut self, number: u32, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(number, FieldValue::Single(value.into()));
        self
    }

    /// Append to a repeated field.
    ///
    /// A field previously set as single is turned into a sequence holding the
    /// old value followed by the new one.
    pub fn push(&mut self, number: u32, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let values = match self.fields.remove(&number) {
            Some(FieldValue::Repeated(mut values)) => {
                values.push(value);
                values
            }
            Some(FieldValue::Single(old)) => vec![old, value],
            None => vec![value],
        };
        self.fields.insert(number, FieldValue::Repeated(values));
        self
    }

    /// Append every value to a repeated field (creating it, even if empty).
    pub fn extend<I, V>(&mut self, number: u32, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.fields
            .entry(number)
            .or_insert_with(|| FieldValue::Repeated(Vec::new()));
        for value in values {
            self.push(number, value);
        }
        self
    }

    /// Raw contents of a field, if populated.
    pub fn get(&self, number: u32) -> Option<&FieldValue> {
        self.fields.get(&number)
    }

    /// Remove a field, returning its contents.
    pub fn remove(&mut self, number: u32) -> Option<FieldValue> {
        self.fields.remove(&number)
    }

    /// Whether `number` is populated.
    pub fn contains(&self, number: u32) -> bool {
        self.fields.contains_key(&number)
    }

    /// Populated field numbers, ascending.
    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.fields.keys().copied()
    }

    /// Populated fields, ascending by number.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &FieldValue)> + '_ {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is populated.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read an optional field, falling back to its default when absent.
    ///
    /// Returns `None` for absent nested messages (no default) and when the
    /// stored shape is repeated.
    pub fn read<'a>(&'a self, field: &'a FieldDescriptor) -> Option<&'a Value> {
        match self.fields.get(&field.number()) {
            Some(FieldValue::Single(v)) => Some(v),
            Some(FieldValue::Repeated(_)) => None,
            None => field.default_value(),
        }
    }

    /// Read a repeated field; absent reads as empty.
    pub fn read_repeated(&self, field: &FieldDescriptor) -> &[Value] {
        match self.fields.get(&field.number()) {
            Some(FieldValue::Repeated(vs)) => vs,
            _ => &[],
        }
    }

    /// Drop optional fields equal to their default and empty repeated fields,
    /// recursing into nested messages.
    ///
    /// Two values that encode identically under `schema` are equal after
    /// normalization. Numbers the schema does not declare are left alone.
    pub fn normalize(&mut self, schema: &Schema) {
        self.fields.retain(|number, slot| {
            let Some(field) = schema.field(*number) else {
                return true;
            };
            match slot {
                FieldValue::Single(v) => {
                    if field.is_default(v) {
                        return false;
                    }
                    normalize_value(field, v);
                    true
                }
                FieldValue::Repeated(vs) => {
                    for v in vs.iter_mut() {
                        normalize_value(field, v);
                    }
                    !vs.is_empty()
                }
            }
        });
    }

    /// Consuming form of [`normalize`](Self::normalize).
    #[must_use]
    pub fn normalized(mut self, schema: &Schema) -> Self {
        self.normalize(schema);
        self
    }
}

fn normalize_value(field: &FieldDescriptor, value: &mut Value) {
    if let (Some(nested), Value::Message(m)) = (field.value_type().nested(), value) {
        m.normalize(nested);
    }
}

/// Name-based, default-aware read access to a message.
#[derive(Debug, Clone, Copy)]
pub struct MessageView<'a> {
    schema: &'a Schema,
    value: &'a MessageValue,
}

impl<'a> MessageView<'a> {
    /// View `value` through `schema`.
    pub fn new(schema: &'a Schema, value: &'a MessageValue) -> Self {
        Self { schema, value }
    }

    /// Schema the view reads through.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Underlying value.
    pub fn value(&self) -> &'a MessageValue {
        self.value
    }

    fn optional(&self, name: &str) -> Option<&'a Value> {
        let field = self.schema.field_by_name(name)?;
        self.value.read(field)
    }

    /// Optional varint field by name (default when absent).
    pub fn varint(&self, name: &str) -> Option<u64> {
        self.optional(name)?.as_varint()
    }

    /// Optional bytes field by name (default when absent).
    pub fn bytes(&self, name: &str) -> Option<&'a [u8]> {
        self.optional(name)?.as_bytes()
    }

    /// Optional nested message by name.
    pub fn message(&self, name: &str) -> Option<MessageView<'a>> {
        let field = self.schema.field_by_name(name)?;
        let nested = field.value_type().nested()?;
        let value = self.value.read(field)?.as_message()?;
        Some(MessageView::new(nested, value))
    }

    /// Repeated field by name; `None` when the schema has no such field.
    pub fn repeated(&self, name: &str) -> Option<&'a [Value]> {
        let field = self.schema.field_by_name(name)?;
        Some(self.value.read_repeated(field))
    }

    /// Repeated nested messages by name, each as a view.
    pub fn messages(&self, name: &str) -> Option<Vec<MessageView<'a>>> {
        let field = self.schema.field_by_name(name)?;
        let nested: &'a Schema = field.value_type().nested()?;
        Some(
            self.value
                .read_repeated(field)
                .iter()
                .filter_map(Value::as_message)
                .map(|m| MessageView::new(nested, m))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaHandle;

    fn schema() -> SchemaHandle {
        let input = Schema::builder("Input")
            .bytes(1, "prev_hash")
            .varint_with_default(5, "sequence", 0xffff_ffff)
            .build()
            .unwrap();
        Schema::builder("Tx")
            .varint(1, "version")
            .repeated_message(2, "inputs", &input)
            .bytes(8, "extra_data")
            .build()
            .unwrap()
    }

    #[test]
    fn absent_optional_reads_default() {
        let schema = schema();
        let value = MessageValue::new();
        let view = MessageView::new(&schema, &value);
        assert_eq!(view.varint("version"), Some(0));
        assert_eq!(view.bytes("extra_data"), Some(&b""[..]));
        assert_eq!(view.repeated("inputs").map(<[Value]>::len), Some(0));
        assert_eq!(view.varint("missing"), None);
    }

    #[test]
    fn nested_defaults_read_through_views() {
        let schema = schema();
        let value = MessageValue::new()
            .with(1, 2u64)
            .with_repeated(2, [MessageValue::new().with(1, b"ab")]);
        let view = MessageView::new(&schema, &value);
        let inputs = view.messages("inputs").unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].bytes("prev_hash"), Some(&b"ab"[..]));
        assert_eq!(inputs[0].varint("sequence"), Some(0xffff_ffff));
    }

    #[test]
    fn push_promotes_single_to_sequence() {
        let mut value = MessageValue::new();
        value.set(3, 1u64);
        value.push(3, 2u64);
        assert_eq!(
            value.get(3),
            Some(&FieldValue::Repeated(vec![Value::Varint(1), Value::Varint(2)]))
        );
    }

    #[test]
    fn normalize_drops_defaults_and_empty_sequences() {
        let schema = schema();
        let explicit = MessageValue::new()
            .with(1, 0u64)
            .with(8, Vec::<u8>::new())
            .with_repeated(2, Vec::<MessageValue>::new());
        assert_eq!(explicit.normalized(&schema), MessageValue::new());

        let nested = MessageValue::new()
            .with_repeated(2, [MessageValue::new().with(5, 0xffff_ffffu64)])
            .normalized(&schema);
        assert_eq!(
            nested,
            MessageValue::new().with_repeated(2, [MessageValue::new()])
        );
    }
}
