// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved codec preferences shared by pbwire tools.

use std::fmt;
use std::str::FromStr;

use pbwire_core::{DecodeLimits, DEFAULT_MAX_MESSAGE_LEN};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Store key the codec preferences live under.
pub const CODEC_PREFS_KEY: &str = "codec";

/// How encoded bytes are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lowercase hex text.
    #[default]
    Hex,
    /// Raw bytes.
    Raw,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hex => "hex",
            Self::Raw => "raw",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "raw" => Ok(Self::Raw),
            other => Err(ConfigError::Invalid {
                key: "output".into(),
                reason: format!("unknown output format `{other}`"),
            }),
        }
    }
}

/// Codec preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecPrefs {
    /// Upper bound on decoded input and on any length prefix.
    pub max_message_len: usize,
    /// Message type used when a command omits one.
    pub default_message: Option<String>,
    /// Output format for encoded bytes.
    pub output: OutputFormat,
}

impl Default for CodecPrefs {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            default_message: None,
            output: OutputFormat::Hex,
        }
    }
}

impl CodecPrefs {
    /// Decode limits these preferences imply.
    pub fn limits(&self) -> DecodeLimits {
        DecodeLimits::new(self.max_message_len)
    }

    /// Reject unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_len == 0 {
            return Err(ConfigError::Invalid {
                key: CODEC_PREFS_KEY.into(),
                reason: "max_message_len must be positive".into(),
            });
        }
        if self.default_message.as_deref() == Some("") {
            return Err(ConfigError::Invalid {
                key: CODEC_PREFS_KEY.into(),
                reason: "default_message must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_codec_defaults() {
        let prefs = CodecPrefs::default();
        assert_eq!(prefs.limits(), DecodeLimits::default());
        assert_eq!(prefs.output, OutputFormat::Hex);
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn missing_keys_fill_from_defaults() {
        let prefs: CodecPrefs = serde_json::from_str(r#"{"output": "raw"}"#).unwrap();
        assert_eq!(prefs.output, OutputFormat::Raw);
        assert_eq!(prefs.max_message_len, DEFAULT_MAX_MESSAGE_LEN);
    }

    #[test]
    fn zero_limit_is_invalid() {
        let prefs = CodecPrefs {
            max_message_len: 0,
            ..CodecPrefs::default()
        };
        assert!(matches!(prefs.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("HEX".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert!("base64".parse::<OutputFormat>().is_err());
    }
}
