// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bundled message schemas for hardware-wallet transaction streaming.
//!
//! The tables live in [`wallet`] as name-based declarations and are resolved
//! once per process into a shared [`SchemaRegistry`]. Callers hold
//! `&'static` references; nothing here is mutable after the first call.

use std::sync::OnceLock;

use pbwire_core::{SchemaError, SchemaHandle, SchemaRegistry};
use tracing::debug;

pub mod wallet;

pub use wallet::names;

static REGISTRY: OnceLock<Result<SchemaRegistry, SchemaError>> = OnceLock::new();

/// Registry holding every bundled message type.
///
/// Resolution runs on the first call only; later calls (from any thread)
/// return the same registry.
pub fn registry() -> Result<&'static SchemaRegistry, SchemaError> {
    REGISTRY
        .get_or_init(|| {
            let built = wallet::declarations()
                .into_iter()
                .fold(SchemaRegistry::builder(), |b, decl| b.declare(decl))
                .build();
            if let Ok(registry) = &built {
                debug!(types = registry.len(), "bundled wallet schemas ready");
            }
            built
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Bundled schema for message type `name`, if registered.
pub fn schema(name: &str) -> Result<Option<&'static SchemaHandle>, SchemaError> {
    Ok(registry()?.get(name))
}

/// Bundled `TransactionType` schema.
pub fn transaction_type() -> Result<&'static SchemaHandle, SchemaError> {
    let registry = registry()?;
    registry
        .get(names::TRANSACTION)
        .ok_or_else(|| SchemaError::UnknownMessage {
            message: String::new(),
            missing: names::TRANSACTION.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_built_once() {
        let a = registry().unwrap();
        let b = registry().unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.len(), 7);
    }

    #[test]
    fn registry_names_are_sorted() {
        let names: Vec<_> = registry().unwrap().names().collect();
        assert_eq!(
            names,
            vec![
                "HDNodePathType",
                "HDNodeType",
                "MultisigRedeemScriptType",
                "TransactionType",
                "TxInputType",
                "TxOutputBinType",
                "TxOutputType",
            ]
        );
    }

    #[test]
    fn unknown_type_is_none() {
        assert!(schema("NoSuchType").unwrap().is_none());
    }
}
