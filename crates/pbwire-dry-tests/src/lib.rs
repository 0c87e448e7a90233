// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for pbwire crates.
//!
//! - [`InMemoryConfigStore`]: config store fake with counters and failure
//!   injection.
//! - [`fixtures`]: deterministic `TransactionType` values for tests and
//!   benches.

pub mod config;
pub mod fixtures;

pub use config::InMemoryConfigStore;
