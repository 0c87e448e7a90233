// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use pbwire_app_core::config::{ConfigService, ConfigStore};
use pbwire_app_core::prefs::{CodecPrefs, OutputFormat};
use pbwire_core::json::{from_json, to_json, to_json_with_defaults};
use pbwire_core::{decode_with_limits, encode, DecodeLimits, SchemaHandle, SchemaRegistry};
use tracing::{debug, info};

use crate::cli::{ConfigCommand, ConfigSetArgs, DecodeArgs, EncodeArgs};
use crate::output::{describe_table, types_table};

/// Shared state for one invocation.
pub struct App<S> {
    registry: &'static SchemaRegistry,
    config: ConfigService<S>,
    prefs: CodecPrefs,
}

impl<S: ConfigStore> App<S> {
    /// Load preferences from `store` and bind the bundled registry.
    pub fn new(store: S) -> Result<Self> {
        let registry = pbwire_messages::registry().context("bundled schemas failed to resolve")?;
        let config = ConfigService::new(store);
        let prefs = config.codec_prefs().context("failed to load preferences")?;
        debug!(?prefs, "preferences loaded");
        Ok(Self {
            registry,
            config,
            prefs,
        })
    }

    fn schema(&self, requested: Option<&str>) -> Result<&'static SchemaHandle> {
        let name = requested
            .or(self.prefs.default_message.as_deref())
            .ok_or_else(|| {
                anyhow!("no message type given and no default configured (see `pbwire config set --default-type`)")
            })?;
        self.registry
            .get(name)
            .ok_or_else(|| anyhow!("unknown message type `{name}` (see `pbwire types`)"))
    }

    /// `pbwire types`
    pub fn types(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", types_table(self.registry))?;
        Ok(())
    }

    /// `pbwire describe`
    pub fn describe(&self, message: Option<&str>, out: &mut impl Write) -> Result<()> {
        let schema = self.schema(message)?;
        writeln!(out, "{}", schema.name())?;
        writeln!(out, "{}", describe_table(schema))?;
        Ok(())
    }

    /// `pbwire encode`
    pub fn encode(&self, args: &EncodeArgs, out: &mut impl Write) -> Result<()> {
        let schema = self.schema(args.message.as_deref())?;
        let text = read_input(args.input.as_deref()).context("failed to read JSON input")?;
        let json: serde_json::Value =
            serde_json::from_slice(&text).context("input is not valid JSON")?;
        let value = from_json(schema, &json)
            .with_context(|| format!("input does not match `{}`", schema.name()))?;
        let bytes = encode(schema, &value)?;
        info!(message = schema.name(), len = bytes.len(), "encoded");

        let format = args.format.map_or(self.prefs.output, OutputFormat::from);
        let rendered = match format {
            OutputFormat::Hex => {
                let mut text = hex::encode(&bytes).into_bytes();
                text.push(b'\n');
                text
            }
            OutputFormat::Raw => bytes,
        };
        match &args.output {
            Some(path) => fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => out.write_all(&rendered)?,
        }
        Ok(())
    }

    /// `pbwire decode`
    pub fn decode(&self, args: &DecodeArgs, out: &mut impl Write) -> Result<()> {
        let (message, positional_hex) = self.split_decode_positionals(&args.positional)?;
        let schema = self.schema(message)?;

        let bytes = match (positional_hex.or(args.hex.as_deref()), &args.input) {
            (Some(_), Some(_)) => bail!("give either hex bytes or --input, not both"),
            (Some(text), None) => parse_hex(text)?,
            (None, input) => read_input(input.as_deref()).context("failed to read input")?,
        };

        let limits = args
            .max_len
            .map_or_else(|| self.prefs.limits(), DecodeLimits::new);
        let value = decode_with_limits(schema, &bytes, limits)
            .with_context(|| format!("failed to decode `{}`", schema.name()))?;
        let json = if args.defaults {
            to_json_with_defaults(schema, &value)?
        } else {
            to_json(schema, &value)?
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        Ok(())
    }

    fn split_decode_positionals<'a>(
        &self,
        positional: &'a [String],
    ) -> Result<(Option<&'a str>, Option<&'a str>)> {
        match positional {
            [] => Ok((None, None)),
            [only] => {
                let only = only.as_str();
                if self.registry.get(only).is_none() && self.prefs.default_message.is_some() {
                    Ok((None, Some(only)))
                } else {
                    Ok((Some(only), None))
                }
            }
            [message, hex] => Ok((Some(message.as_str()), Some(hex.as_str()))),
            _ => bail!("expected at most a message type and hex bytes"),
        }
    }

    /// `pbwire config ...`
    pub fn config(&mut self, command: &ConfigCommand, out: &mut impl Write) -> Result<()> {
        match command {
            ConfigCommand::Show => {}
            ConfigCommand::Set(args) => self.config_set(args)?,
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&self.prefs)?)?;
        Ok(())
    }

    fn config_set(&mut self, args: &ConfigSetArgs) -> Result<()> {
        let mut prefs = self.prefs.clone();
        if let Some(max_len) = args.max_len {
            prefs.max_message_len = max_len;
        }
        if let Some(name) = &args.default_type {
            if self.registry.get(name).is_none() {
                bail!("unknown message type `{name}` (see `pbwire types`)");
            }
            prefs.default_message = Some(name.clone());
        }
        if args.clear_default_type {
            prefs.default_message = None;
        }
        if let Some(format) = args.format {
            prefs.output = format.into();
        }
        self.config
            .save_codec_prefs(&prefs)
            .context("failed to save preferences")?;
        info!(?prefs, "preferences saved");
        self.prefs = prefs;
        Ok(())
    }
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    hex::decode(&cleaned).context("argument is not valid hex")
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
