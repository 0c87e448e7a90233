// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic transaction fixtures.

use pbwire_core::MessageValue;
use pbwire_messages::wallet::{transaction as tx, tx_input, tx_output_bin};

/// Hardened BIP-44 purpose/coin/account prefix used by every fixture input.
pub const ACCOUNT_PATH: [u64; 3] = [0x8000_002c, 0x8000_0000, 0x8000_0000];

/// Input `index` spending output `index` of a synthetic previous transaction.
pub fn input(index: u32) -> MessageValue {
    let mut prev_hash = [0u8; 32];
    prev_hash[..4].copy_from_slice(&index.to_be_bytes());
    prev_hash[31] = 0xa5;
    MessageValue::new()
        .with_repeated(
            tx_input::ADDRESS_N,
            ACCOUNT_PATH.into_iter().chain([0, u64::from(index)]),
        )
        .with(tx_input::PREV_HASH, prev_hash.to_vec())
        .with(tx_input::PREV_INDEX, index)
        .with(tx_input::AMOUNT, 10_000 + u64::from(index))
}

/// Binary output paying `amount` to a P2PKH-shaped script.
pub fn bin_output(amount: u64) -> MessageValue {
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend([0x11; 20]);
    script.extend([0x88, 0xac]);
    MessageValue::new()
        .with(tx_output_bin::AMOUNT, amount)
        .with(tx_output_bin::SCRIPT_PUBKEY, script)
}

/// Version-2 transaction with `inputs` inputs and two binary outputs.
pub fn transaction(inputs: u32) -> MessageValue {
    MessageValue::new()
        .with(tx::VERSION, 2u64)
        .with_repeated(tx::INPUTS, (0..inputs).map(input))
        .with_repeated(tx::BIN_OUTPUTS, [bin_output(5_000), bin_output(4_000)])
        .with(tx::LOCK_TIME, 0u64)
        .with(tx::INPUTS_CNT, inputs)
        .with(tx::OUTPUTS_CNT, 2u64)
}
