// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Table rendering for schema listings.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use pbwire_core::{FieldDescriptor, Schema, SchemaRegistry, Value, ValueType};

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// One row per registered type: name and field count.
pub fn types_table(registry: &SchemaRegistry) -> Table {
    let mut out = table(&["Type", "Fields"]);
    for schema in registry.iter() {
        out.add_row(vec![Cell::new(schema.name()), Cell::new(schema.len())]);
    }
    out
}

/// One row per field, in declaration order.
pub fn describe_table(schema: &Schema) -> Table {
    let mut out = table(&["#", "Name", "Type", "Cardinality", "Default"]);
    for field in schema.fields() {
        out.add_row(vec![
            Cell::new(field.number()),
            Cell::new(field.name()),
            Cell::new(type_label(field.value_type())),
            Cell::new(field.cardinality()),
            Cell::new(default_label(field)),
        ]);
    }
    out
}

fn type_label(value_type: &ValueType) -> String {
    match value_type {
        ValueType::Message(nested) => nested.name().to_owned(),
        other => other.kind().to_string(),
    }
}

fn default_label(field: &FieldDescriptor) -> String {
    match field.default_value() {
        Some(Value::Varint(n)) if *n > 0xffff => format!("{n:#x}"),
        Some(Value::Varint(n)) => n.to_string(),
        Some(Value::Bytes(b)) if b.is_empty() => "\"\"".to_owned(),
        Some(Value::Bytes(b)) => hex::encode(b),
        Some(Value::Message(_)) | None => "-".to_owned(),
    }
}
