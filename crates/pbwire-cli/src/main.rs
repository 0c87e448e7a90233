// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! pbwire CLI entrypoint.
//!
//! # Usage
//! ```text
//! pbwire types
//! pbwire describe TransactionType
//! pbwire encode TransactionType --input tx.json --format hex
//! pbwire decode TransactionType 0801120412...
//! pbwire config set --default-type TransactionType --max-len 131072
//! ```
//!
//! Data goes to stdout; logs go to stderr. The CLI exits with code `0` on
//! success and non-zero on error.

mod cli;
mod commands;
mod output;

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use pbwire_config_fs::FsConfigStore;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::App;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = match &cli.config_dir {
        Some(dir) => FsConfigStore::at(dir)?,
        None => FsConfigStore::new()?,
    };
    let mut app = App::new(store)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Types => app.types(&mut out)?,
        Command::Describe { message } => app.describe(message.as_deref(), &mut out)?,
        Command::Encode(args) => app.encode(args, &mut out)?,
        Command::Decode(args) => app.decode(args, &mut out)?,
        Command::Config(command) => app.config(command, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
