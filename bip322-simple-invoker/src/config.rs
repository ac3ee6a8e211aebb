use anyhow::{Context, Result};
use bip322_simple_logger::LogConfig;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// The top-level configuration for the signer invoker.
///
/// Keys are snake_case so that `BIP322__SECTION__KEY` environment variables
/// address the same fields as the TOML file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InvokerConfig {
    #[serde(default)]
    pub signer: SignerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// What to sign and where the key comes from.
///
/// The key itself is never part of the configuration; only the name of
/// the environment variable that carries it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    pub message: String,
    pub address_type: AddressType,
    pub wif_env: String,
}

/// Selects the foreign signing routine.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Native SegWit (P2WPKH).
    #[default]
    Segwit,
    /// Taproot key path (P2TR).
    Taproot,
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressType::Segwit => f.write_str("segwit"),
            AddressType::Taproot => f.write_str("taproot"),
        }
    }
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            message: "test".to_string(),
            address_type: AddressType::Segwit,
            wif_env: "BIP322_WIF".to_string(),
        }
    }
}

/// Loads the invoker configuration.
///
/// Values come from the optional TOML file at `path`, then from
/// `BIP322__<SECTION>__<KEY>` environment variables, and fall back to
/// defaults for anything left unset.
pub fn load_config(path: Option<&str>) -> Result<InvokerConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }
    builder = builder.add_source(config::Environment::with_prefix("BIP322").separator("__"));

    let settings: InvokerConfig = builder
        .build()
        .context(format!("Failed to build configuration from '{}'", path.unwrap_or("<env>")))?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    Ok(settings)
}
