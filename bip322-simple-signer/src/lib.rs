//! # BIP-322 Simple Signer (C-ABI)
//!
//! This crate computes BIP-322 "simple" message signatures from a WIF-encoded
//! private key and exposes them through a C-compatible foreign function
//! interface, so that hosts written in Go, Python, C# or C can sign messages
//! without linking a Bitcoin stack of their own.
//!
//! ## Supported address kinds
//!
//! - **Native SegWit (P2WPKH)**: BIP-143 sighash, deterministic ECDSA.
//! - **Taproot (P2TR key path)**: BIP-341 sighash, BIP-340 Schnorr without
//!   auxiliary randomness.
//!
//! Both produce the same output for the same inputs: the base64 encoding of
//! the consensus-serialized witness stack of the virtual `to_sign`
//! transaction.
//!
//! The Rust API lives in [`sign`]; all FFI-exposed functions are defined in
//! the [`ffi`] module.

pub mod error;
pub mod ffi;
pub mod hashing;
pub mod sign;
pub mod wallet;

pub use error::SignerError;
pub use sign::{
    sign_simple, simple_signature_with_wif_segwit, simple_signature_with_wif_taproot,
};
pub use wallet::{AddressKind, Wallet};
