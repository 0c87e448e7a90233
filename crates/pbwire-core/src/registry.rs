// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only schema registry and name-based schema declarations.
//!
//! Message tables in the wire protocol reference each other by type name
//! (`inputs: repeated TxInputType`). [`RegistryBuilder`] accepts those
//! declarations in any order, resolves the names depth-first into shared
//! [`SchemaHandle`]s, and rejects unknown names and nesting cycles before any
//! schema becomes reachable. The resulting [`SchemaRegistry`] is immutable and
//! is meant to be built once per process and passed around by reference.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::SchemaError;
use crate::schema::{Cardinality, Schema, SchemaBuilder, SchemaHandle, ValueType};
use crate::value::Value;

/// Value type of a declared field, with nested messages named rather than
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Unsigned varint.
    Varint,
    /// Raw bytes.
    Bytes,
    /// Nested message, by registered type name.
    Message(String),
}

/// One row of a message declaration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field number.
    pub number: u32,
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Declared cardinality.
    pub cardinality: Cardinality,
    /// Explicit default, if any.
    pub default: Option<Value>,
}

/// Declarative field table for one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDecl {
    name: String,
    fields: Vec<FieldDecl>,
}

impl MessageDecl {
    /// Start a declaration for message type `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declared type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared rows, in order.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Append a fully specified row.
    #[must_use]
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    fn row(
        self,
        number: u32,
        name: &str,
        ty: TypeRef,
        cardinality: Cardinality,
        default: Option<Value>,
    ) -> Self {
        self.field(FieldDecl {
            number,
            name: name.to_owned(),
            ty,
            cardinality,
            default,
        })
    }

    /// Optional varint, default 0.
    #[must_use]
    pub fn varint(self, number: u32, name: &str) -> Self {
        self.row(number, name, TypeRef::Varint, Cardinality::Optional, None)
    }

    /// Optional varint with an explicit default.
    #[must_use]
    pub fn varint_with_default(self, number: u32, name: &str, default: u64) -> Self {
        self.row(
            number,
            name,
            TypeRef::Varint,
            Cardinality::Optional,
            Some(Value::Varint(default)),
        )
    }

    /// Optional bytes, default empty.
    #[must_use]
    pub fn bytes(self, number: u32, name: &str) -> Self {
        self.row(number, name, TypeRef::Bytes, Cardinality::Optional, None)
    }

    /// Optional nested message of type `message`.
    #[must_use]
    pub fn message(self, number: u32, name: &str, message: &str) -> Self {
        self.row(
            number,
            name,
            TypeRef::Message(message.to_owned()),
            Cardinality::Optional,
            None,
        )
    }

    /// Repeated varint.
    #[must_use]
    pub fn repeated_varint(self, number: u32, name: &str) -> Self {
        self.row(number, name, TypeRef::Varint, Cardinality::Repeated, None)
    }

    /// Repeated bytes.
    #[must_use]
    pub fn repeated_bytes(self, number: u32, name: &str) -> Self {
        self.row(number, name, TypeRef::Bytes, Cardinality::Repeated, None)
    }

    /// Repeated nested message of type `message`.
    #[must_use]
    pub fn repeated_message(self, number: u32, name: &str, message: &str) -> Self {
        self.row(
            number,
            name,
            TypeRef::Message(message.to_owned()),
            Cardinality::Repeated,
            None,
        )
    }
}

/// Collects message declarations and resolves them into a registry.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    decls: Vec<MessageDecl>,
    prebuilt: Vec<SchemaHandle>,
}

impl RegistryBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name-based declaration.
    #[must_use]
    pub fn declare(mut self, decl: MessageDecl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Add an already-built schema; declarations may reference it by name.
    #[must_use]
    pub fn schema(mut self, schema: SchemaHandle) -> Self {
        self.prebuilt.push(schema);
        self
    }

    /// Resolve every declaration.
    ///
    /// Fails with [`SchemaError::CyclicSchema`] when a type nests itself,
    /// [`SchemaError::UnknownMessage`] for dangling references and
    /// [`SchemaError::DuplicateMessage`] when a name is declared twice.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut resolver = Resolver::default();
        for schema in self.prebuilt {
            let name = schema.name().to_owned();
            if resolver.resolved.insert(name.clone(), schema).is_some() {
                return Err(SchemaError::DuplicateMessage(name));
            }
        }
        for decl in &self.decls {
            if resolver.resolved.contains_key(&decl.name)
                || resolver.pending.insert(decl.name.as_str(), decl).is_some()
            {
                return Err(SchemaError::DuplicateMessage(decl.name.clone()));
            }
        }
        for decl in &self.decls {
            resolver.resolve(&decl.name)?;
        }

        let schemas: BTreeMap<String, SchemaHandle> = resolver.resolved.into_iter().collect();
        debug!(messages = schemas.len(), "schema registry resolved");
        Ok(SchemaRegistry { schemas })
    }
}

#[derive(Default)]
struct Resolver<'d> {
    pending: HashMap<&'d str, &'d MessageDecl>,
    resolved: HashMap<String, SchemaHandle>,
    stack: Vec<String>,
}

impl<'d> Resolver<'d> {
    fn resolve(&mut self, name: &str) -> Result<SchemaHandle, SchemaError> {
        if let Some(schema) = self.resolved.get(name) {
            return Ok(SchemaHandle::clone(schema));
        }
        if let Some(pos) = self.stack.iter().position(|n| n == name) {
            let mut cycle = self.stack[pos..].to_vec();
            cycle.push(name.to_owned());
            return Err(SchemaError::CyclicSchema(cycle));
        }
        let decl = self.pending.get(name).copied().ok_or_else(|| {
            SchemaError::UnknownMessage {
                message: self.stack.last().cloned().unwrap_or_default(),
                missing: name.to_owned(),
            }
        })?;

        self.stack.push(name.to_owned());
        let mut builder = SchemaBuilder::new(name);
        for row in &decl.fields {
            let value_type = match &row.ty {
                TypeRef::Varint => ValueType::UnsignedVarint,
                TypeRef::Bytes => ValueType::Bytes,
                TypeRef::Message(target) => ValueType::Message(self.resolve(target)?),
            };
            builder = builder.field(
                row.number,
                row.name.clone(),
                value_type,
                row.cardinality,
                row.default.clone(),
            );
        }
        self.stack.pop();

        let schema = builder.build()?;
        self.resolved
            .insert(name.to_owned(), SchemaHandle::clone(&schema));
        Ok(schema)
    }
}

/// Immutable map from message type name to schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SchemaHandle>,
}

impl SchemaRegistry {
    /// Start a [`RegistryBuilder`].
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a message type.
    pub fn get(&self, name: &str) -> Option<&SchemaHandle> {
        self.schemas.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schemas.keys().map(String::as_str)
    }

    /// Registered schemas, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> + '_ {
        self.schemas.values().map(|s| &**s)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
