use crate::config::{AddressType, SignerConfig};
use clap::{Parser, Subcommand};

/// The main CLI structure for the BIP-322 signer invoker.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign a message through the foreign signer and print the signature.
    Sign(SignCmd),
}

/// Arguments for the `sign` subcommand.
///
/// Flags override values from the configuration file.
#[derive(Parser, Debug, Default)]
pub struct SignCmd {
    /// Path to the invoker configuration TOML file.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Message to sign.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Address type the signature is produced for.
    #[arg(short = 't', long, value_enum)]
    pub address_type: Option<AddressType>,

    /// Name of the environment variable holding the WIF key.
    #[arg(long)]
    pub wif_env: Option<String>,

    /// Read the WIF key from the first line of standard input.
    #[arg(long, conflicts_with = "wif_env")]
    pub wif_stdin: bool,
}

impl SignCmd {
    pub fn apply(&self, signer: &mut SignerConfig) {
        if let Some(message) = &self.message {
            signer.message = message.clone();
        }
        if let Some(address_type) = self.address_type {
            signer.address_type = address_type;
        }
        if let Some(wif_env) = &self.wif_env {
            signer.wif_env = wif_env.clone();
        }
    }
}
