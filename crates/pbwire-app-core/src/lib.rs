// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for pbwire tools (config, codec prefs).
//! Keeps CLI and other front ends thin and storage-agnostic.

pub mod config;
pub mod prefs;
