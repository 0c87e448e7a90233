// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pbwire_app_core::prefs::OutputFormat;

/// Inspect, encode and decode wire messages using the bundled schemas.
#[derive(Parser, Debug)]
#[command(name = "pbwire", author, version, about, long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config directory (defaults to the platform config dir).
    #[arg(long, value_name = "DIR", global = true, env = "PBWIRE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered message types.
    Types,
    /// Show the field table of a message type.
    Describe {
        /// Message type (falls back to the configured default).
        #[arg(value_name = "TYPE")]
        message: Option<String>,
    },
    /// Encode a JSON object into wire bytes.
    Encode(EncodeArgs),
    /// Decode wire bytes into JSON.
    Decode(DecodeArgs),
    /// Show or change saved preferences.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// `encode` arguments.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message type (falls back to the configured default).
    #[arg(value_name = "TYPE")]
    pub message: Option<String>,
    /// JSON input file; `-` or absent reads stdin.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
    /// Output file; absent writes stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Output format (defaults to the saved preference).
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

/// `decode` arguments.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Message type, then hex bytes. With a configured default type, a lone
    /// argument that names no registered type is taken as the hex.
    #[arg(value_name = "TYPE_OR_HEX", num_args = 0..=2)]
    pub positional: Vec<String>,
    /// Raw binary input file; `-` reads stdin.
    #[arg(short, long, value_name = "PATH", conflicts_with = "hex")]
    pub input: Option<PathBuf>,
    /// Hex input, as an alternative to the positional form.
    #[arg(long, value_name = "HEX")]
    pub hex: Option<String>,
    /// Decode limit in bytes (defaults to the saved preference).
    #[arg(long, value_name = "N")]
    pub max_len: Option<usize>,
    /// Include absent fields at their defaults.
    #[arg(long)]
    pub defaults: bool,
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print saved preferences as JSON.
    Show,
    /// Update saved preferences.
    Set(ConfigSetArgs),
}

/// `config set` arguments.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Decode limit in bytes.
    #[arg(long, value_name = "N")]
    pub max_len: Option<usize>,
    /// Default message type.
    #[arg(long, value_name = "TYPE", conflicts_with = "clear_default_type")]
    pub default_type: Option<String>,
    /// Forget the default message type.
    #[arg(long)]
    pub clear_default_type: bool,
    /// Default output format for `encode`.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Output format flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Lowercase hex text.
    Hex,
    /// Raw bytes.
    Raw,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Hex => Self::Hex,
            FormatArg::Raw => Self::Raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn decode_accepts_type_and_hex() {
        let cli = Cli::try_parse_from(["pbwire", "decode", "TransactionType", "0801"]).unwrap();
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.positional, vec!["TransactionType", "0801"]);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["pbwire", "-vv", "types"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
