//! Converter configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::types::*;

/// Settings that vary between exports or destination accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Value of the `Exchange` column on every output row
    pub exchange_name: String,
    /// Currency credited when liquidation proceeds repay a loan
    pub stablecoin: String,
    /// Raw currency code -> canonical code, matched case-insensitively
    pub currency_aliases: BTreeMap<String, String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        let mut currency_aliases = BTreeMap::new();
        currency_aliases.insert("USDTERC".to_string(), "USDT".to_string());
        currency_aliases.insert("NEXONEXO".to_string(), "NEXO".to_string());

        Self {
            exchange_name: "Nexo".to_string(),
            stablecoin: "USDT".to_string(),
            currency_aliases,
        }
    }
}

impl ConverterConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> ConvertResult<Self> {
        let parsed: ConverterConfig =
            toml::from_str(content).map_err(|e| ConvertError::Config(format!("parse TOML: {e}")))?;
        parsed.normalized()
    }

    /// Load a TOML file from disk
    pub fn load(path: &Path) -> ConvertResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Upper-case every code and reject alias chains.
    ///
    /// An alias target that is itself an alias key would make currency
    /// normalization non-idempotent.
    pub fn normalized(self) -> ConvertResult<Self> {
        if self.exchange_name.trim().is_empty() {
            return Err(ConvertError::Config(
                "exchange_name cannot be empty".to_string(),
            ));
        }

        let stablecoin = self.stablecoin.trim().to_uppercase();
        if stablecoin.is_empty() {
            return Err(ConvertError::Config("stablecoin cannot be empty".to_string()));
        }

        let currency_aliases: BTreeMap<String, String> = self
            .currency_aliases
            .into_iter()
            .map(|(from, to)| (from.trim().to_uppercase(), to.trim().to_uppercase()))
            .collect();

        for (from, to) in &currency_aliases {
            if to.is_empty() {
                return Err(ConvertError::Config(format!(
                    "alias '{}' maps to an empty currency code",
                    from
                )));
            }
            if from != to && currency_aliases.contains_key(to) {
                return Err(ConvertError::Config(format!(
                    "alias '{}' -> '{}' points at another alias",
                    from, to
                )));
            }
        }

        Ok(Self {
            exchange_name: self.exchange_name.trim().to_string(),
            stablecoin: currency_aliases.get(&stablecoin).cloned().unwrap_or(stablecoin),
            currency_aliases,
        })
    }

    /// Upper-case a raw code and resolve it through the alias table
    pub fn normalize_currency(&self, raw: &str) -> String {
        let code = raw.trim().to_uppercase();
        match self.currency_aliases.get(&code) {
            Some(canonical) => canonical.clone(),
            None => code,
        }
    }
}
