//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section is optional and falls back to the built-in odds, commission
//! rates and cutoff, so an empty file is a valid configuration.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::cutoff::CutoffPolicy;
use crate::engine::commission::CommissionRates;
use crate::engine::payout::OddsTable;
use crate::engine::EngineConfig;

/// Highest payout rate a configured odds table may carry.
const MAX_ODDS: Decimal = dec!(1000000);

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub parser: ParserConfig,
    pub cutoff: CutoffPolicy,
    pub odds: OddsTable,
    pub commission: CommissionRates,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    /// Year for `DD/MM` dates. When absent the caller supplies one.
    pub default_year: Option<i32>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise use the built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tables that would produce negative money, or payouts too
    /// large to price.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [("group_a", self.commission.group_a), ("group_b", self.commission.group_b)] {
            if rate.is_sign_negative() || rate >= Decimal::ONE {
                bail!("commission.{name} must be in [0, 1), got {rate}");
            }
        }
        for (name, odds) in [("group_a", &self.odds.group_a), ("group_b", &self.odds.group_b)] {
            let values = [
                odds.big.first,
                odds.big.second,
                odds.big.third,
                odds.big.special,
                odds.big.consolation,
                odds.small.first,
                odds.small.second,
                odds.small.third,
                odds.ang,
                odds.consolation,
            ];
            if values.iter().any(|v| v.is_sign_negative()) {
                bail!("odds.{name} contains a negative rate");
            }
            if let Some(v) = values.iter().find(|v| **v > MAX_ODDS) {
                bail!("odds.{name} rate {v} exceeds {MAX_ODDS}");
            }
        }
        Ok(())
    }

    /// Engine configuration, using `fallback_year` when none is configured.
    pub fn engine_config(&self, fallback_year: i32) -> EngineConfig {
        EngineConfig {
            default_year: self.parser.default_year.unwrap_or(fallback_year),
            odds: self.odds.clone(),
            commission: self.commission,
        }
    }
}
