// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Field tables for the wallet transaction messages.
//!
//! Strings travel as bytes and enums as varints. Every scalar defaults to
//! zero except `TxInputType.sequence`, which defaults to `0xFFFF_FFFF`.

use pbwire_core::MessageDecl;

/// Message type names.
pub mod names {
    /// BIP-32 node.
    pub const HD_NODE: &str = "HDNodeType";
    /// Node plus derivation path.
    pub const HD_NODE_PATH: &str = "HDNodePathType";
    /// m-of-n redeem script.
    pub const MULTISIG_REDEEM_SCRIPT: &str = "MultisigRedeemScriptType";
    /// Transaction input.
    pub const TX_INPUT: &str = "TxInputType";
    /// Pre-serialized transaction output.
    pub const TX_OUTPUT_BIN: &str = "TxOutputBinType";
    /// Transaction output by address or path.
    pub const TX_OUTPUT: &str = "TxOutputType";
    /// Transaction being signed or streamed.
    pub const TRANSACTION: &str = "TransactionType";
}

/// Default input sequence (final).
pub const SEQUENCE_FINAL: u64 = 0xFFFF_FFFF;

/// `TransactionType` field numbers.
pub mod transaction {
    /// Transaction version.
    pub const VERSION: u32 = 1;
    /// Inputs (`TxInputType`).
    pub const INPUTS: u32 = 2;
    /// Binary outputs (`TxOutputBinType`).
    pub const BIN_OUTPUTS: u32 = 3;
    /// Lock time.
    pub const LOCK_TIME: u32 = 4;
    /// Outputs (`TxOutputType`).
    pub const OUTPUTS: u32 = 5;
    /// Input count.
    pub const INPUTS_CNT: u32 = 6;
    /// Output count.
    pub const OUTPUTS_CNT: u32 = 7;
    /// Trailing extra data chunk.
    pub const EXTRA_DATA: u32 = 8;
    /// Total extra data length.
    pub const EXTRA_DATA_LEN: u32 = 9;
    /// Decred expiry height.
    pub const DECRED_EXPIRY: u32 = 10;
}

/// `TxInputType` field numbers.
pub mod tx_input {
    /// BIP-32 path to the signing key.
    pub const ADDRESS_N: u32 = 1;
    /// Previous transaction hash.
    pub const PREV_HASH: u32 = 2;
    /// Previous output index.
    pub const PREV_INDEX: u32 = 3;
    /// Script signature.
    pub const SCRIPT_SIG: u32 = 4;
    /// Sequence number.
    pub const SEQUENCE: u32 = 5;
    /// Input script type.
    pub const SCRIPT_TYPE: u32 = 6;
    /// Multisig redeem script.
    pub const MULTISIG: u32 = 7;
    /// Amount spent.
    pub const AMOUNT: u32 = 8;
    /// Decred tree.
    pub const DECRED_TREE: u32 = 9;
    /// Decred script version.
    pub const DECRED_SCRIPT_VERSION: u32 = 10;
}

/// `TxOutputBinType` field numbers.
pub mod tx_output_bin {
    /// Amount.
    pub const AMOUNT: u32 = 1;
    /// Locking script.
    pub const SCRIPT_PUBKEY: u32 = 2;
    /// Decred script version.
    pub const DECRED_SCRIPT_VERSION: u32 = 3;
}

/// Declarations for every bundled message type, in dependency order.
pub fn declarations() -> Vec<MessageDecl> {
    vec![
        MessageDecl::new(names::HD_NODE)
            .varint(1, "depth")
            .varint(2, "fingerprint")
            .varint(3, "child_num")
            .bytes(4, "chain_code")
            .bytes(5, "private_key")
            .bytes(6, "public_key"),
        MessageDecl::new(names::HD_NODE_PATH)
            .message(1, "node", names::HD_NODE)
            .repeated_varint(2, "address_n"),
        MessageDecl::new(names::MULTISIG_REDEEM_SCRIPT)
            .repeated_message(1, "pubkeys", names::HD_NODE_PATH)
            .repeated_bytes(2, "signatures")
            .varint(3, "m"),
        MessageDecl::new(names::TX_INPUT)
            .repeated_varint(tx_input::ADDRESS_N, "address_n")
            .bytes(tx_input::PREV_HASH, "prev_hash")
            .varint(tx_input::PREV_INDEX, "prev_index")
            .bytes(tx_input::SCRIPT_SIG, "script_sig")
            .varint_with_default(tx_input::SEQUENCE, "sequence", SEQUENCE_FINAL)
            .varint(tx_input::SCRIPT_TYPE, "script_type")
            .message(tx_input::MULTISIG, "multisig", names::MULTISIG_REDEEM_SCRIPT)
            .varint(tx_input::AMOUNT, "amount")
            .varint(tx_input::DECRED_TREE, "decred_tree")
            .varint(tx_input::DECRED_SCRIPT_VERSION, "decred_script_version"),
        MessageDecl::new(names::TX_OUTPUT_BIN)
            .varint(tx_output_bin::AMOUNT, "amount")
            .bytes(tx_output_bin::SCRIPT_PUBKEY, "script_pubkey")
            .varint(tx_output_bin::DECRED_SCRIPT_VERSION, "decred_script_version"),
        MessageDecl::new(names::TX_OUTPUT)
            .bytes(1, "address")
            .repeated_varint(2, "address_n")
            .varint(3, "amount")
            .varint(4, "script_type")
            .message(5, "multisig", names::MULTISIG_REDEEM_SCRIPT)
            .bytes(6, "op_return_data")
            .varint(7, "decred_script_version"),
        MessageDecl::new(names::TRANSACTION)
            .varint(transaction::VERSION, "version")
            .repeated_message(transaction::INPUTS, "inputs", names::TX_INPUT)
            .repeated_message(transaction::BIN_OUTPUTS, "bin_outputs", names::TX_OUTPUT_BIN)
            .varint(transaction::LOCK_TIME, "lock_time")
            .repeated_message(transaction::OUTPUTS, "outputs", names::TX_OUTPUT)
            .varint(transaction::INPUTS_CNT, "inputs_cnt")
            .varint(transaction::OUTPUTS_CNT, "outputs_cnt")
            .bytes(transaction::EXTRA_DATA, "extra_data")
            .varint(transaction::EXTRA_DATA_LEN, "extra_data_len")
            .varint(transaction::DECRED_EXPIRY, "decred_expiry"),
    ]
}
