//! # BIP-322 Signer Invoker
//!
//! Calls the `bip322-simple-signer` C ABI the way a foreign host would:
//! the message and key are marshalled into null-terminated buffers, the
//! returned string is checked for the null failure sentinel, converted and
//! released, and the signature is printed as `Result: <signature>`.
//!
//! The key is read from an environment variable or standard input and is
//! never logged.

pub mod cli;
pub mod config;
pub mod error;
pub mod invoke;
pub mod key;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, SignCmd};
use key::{read_key, KeySource};

/// The main entry point: CLI parsing, configuration, logging and the signing call.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sign(sign_cmd) => sign(sign_cmd),
    }
}

fn sign(cmd: SignCmd) -> Result<()> {
    let mut config = config::load_config(cmd.config.as_deref())?;
    cmd.apply(&mut config.signer);

    bip322_simple_logger::init(&config.log)?;

    let source = if cmd.wif_stdin {
        KeySource::Stdin
    } else {
        KeySource::Env(config.signer.wif_env.clone())
    };
    let wif = read_key(&source)?;

    tracing::info!(
        address_type = %config.signer.address_type,
        message_len = config.signer.message.len(),
        "Invoking foreign signer"
    );
    let signature = invoke::invoke(config.signer.address_type, &config.signer.message, &wif)
        .context("Failed to sign message")?;
    tracing::debug!("Signature received");

    println!("{}", invoke::result_line(&signature));
    Ok(())
}
