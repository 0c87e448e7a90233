// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Wire-level checks for the bundled `TransactionType` schema.

use pbwire_core::json::{from_json, to_json, to_json_with_defaults};
use pbwire_core::{decode, encode, Cardinality, MessageValue, MessageView, ValueKind};
use pbwire_messages::wallet::{transaction as tx, tx_input, SEQUENCE_FINAL};
use pbwire_messages::{names, registry, transaction_type};
use serde_json::json;

fn input(prev_hash: &[u8]) -> MessageValue {
    MessageValue::new().with(tx_input::PREV_HASH, prev_hash)
}

#[test]
fn transaction_table_matches_declaration() {
    let schema = transaction_type().expect("registry");
    let rows: Vec<_> = schema
        .fields()
        .iter()
        .map(|f| (f.number(), f.name(), f.value_type().kind(), f.cardinality()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, "version", ValueKind::Varint, Cardinality::Optional),
            (2, "inputs", ValueKind::Message, Cardinality::Repeated),
            (3, "bin_outputs", ValueKind::Message, Cardinality::Repeated),
            (4, "lock_time", ValueKind::Varint, Cardinality::Optional),
            (5, "outputs", ValueKind::Message, Cardinality::Repeated),
            (6, "inputs_cnt", ValueKind::Varint, Cardinality::Optional),
            (7, "outputs_cnt", ValueKind::Varint, Cardinality::Optional),
            (8, "extra_data", ValueKind::Bytes, Cardinality::Optional),
            (9, "extra_data_len", ValueKind::Varint, Cardinality::Optional),
            (10, "decred_expiry", ValueKind::Varint, Cardinality::Optional),
        ]
    );
    let inputs = schema.field(tx::INPUTS).and_then(|f| f.value_type().nested());
    assert_eq!(inputs.map(|s| s.name()), Some(names::TX_INPUT));
}

#[test]
fn golden_transaction_bytes() {
    let schema = transaction_type().expect("registry");
    let value = MessageValue::new()
        .with(tx::VERSION, 1u64)
        .with_repeated(tx::INPUTS, [input(&[0xaa, 0xaa])])
        .with(tx::LOCK_TIME, 0u64)
        .with(tx::INPUTS_CNT, 1u64)
        .with(tx::DECRED_EXPIRY, 5u64);
    let bytes = encode(schema, &value).expect("encode");
    assert_eq!(hex::encode(&bytes), "080112041202aaaa30015005");
    assert_eq!(decode(schema, &bytes).expect("decode"), value.normalized(schema));
}

#[test]
fn sequence_default_is_final_and_zero_is_emitted() {
    let schema = registry()
        .expect("registry")
        .get(names::TX_INPUT)
        .expect("TxInputType");

    let absent = MessageValue::new();
    let view = MessageView::new(schema, &absent);
    assert_eq!(view.varint("sequence"), Some(SEQUENCE_FINAL));
    assert!(encode(schema, &absent.clone().with(tx_input::SEQUENCE, SEQUENCE_FINAL))
        .expect("encode")
        .is_empty());

    let zero = MessageValue::new().with(tx_input::SEQUENCE, 0u64);
    assert_eq!(encode(schema, &zero).expect("encode"), vec![0x28, 0x00]);
}

#[test]
fn decred_expiry_reads_zero_when_absent() {
    let schema = transaction_type().expect("registry");
    let decoded = decode(schema, &[0x08, 0x02]).expect("decode");
    let view = MessageView::new(schema, &decoded);
    assert_eq!(view.varint("version"), Some(2));
    assert_eq!(view.varint("decred_expiry"), Some(0));
    assert_eq!(view.repeated("inputs").map(<[_]>::len), Some(0));
}

#[test]
fn nested_multisig_round_trips() {
    let schema = transaction_type().expect("registry");
    let value = from_json(
        schema,
        &json!({
            "version": 2,
            "inputs": [{
                "address_n": [2147483692u64, 2147483648u64, 0],
                "prev_hash": "00112233",
                "multisig": {
                    "pubkeys": [{"node": {"depth": 1, "public_key": "02ab"}, "address_n": [0, 1]}],
                    "signatures": ["", "3044"],
                    "m": 1
                }
            }],
            "outputs": [{"address": "6d6e", "amount": 1000}]
        }),
    )
    .expect("from_json");

    let bytes = encode(schema, &value).expect("encode");
    let decoded = decode(schema, &bytes).expect("decode");
    assert_eq!(decoded, value.clone().normalized(schema));

    let view = MessageView::new(schema, &decoded);
    let inputs = view.messages("inputs").expect("inputs");
    let multisig = inputs[0].message("multisig").expect("multisig");
    assert_eq!(multisig.varint("m"), Some(1));
    assert_eq!(multisig.repeated("signatures").map(<[_]>::len), Some(2));
    assert_eq!(inputs[0].varint("sequence"), Some(SEQUENCE_FINAL));
}

#[test]
fn json_export_uses_names_and_hex() {
    let schema = transaction_type().expect("registry");
    let value = MessageValue::new()
        .with(tx::EXTRA_DATA, b"\x01\xff")
        .with(tx::EXTRA_DATA_LEN, 2u64);
    assert_eq!(
        to_json(schema, &value).expect("to_json"),
        json!({"extra_data": "01ff", "extra_data_len": 2})
    );
    let full = to_json_with_defaults(schema, &MessageValue::new()).expect("to_json");
    assert_eq!(full["decred_expiry"], json!(0));
    assert_eq!(full["inputs"], json!([]));
}
