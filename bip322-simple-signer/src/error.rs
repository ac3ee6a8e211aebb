use crate::wallet::AddressKind;
use bitcoin::key::FromWifError;
use thiserror::Error;

/// Failures that can occur while producing a BIP-322 signature.
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("invalid WIF private key: {0}")]
    InvalidWif(#[from] FromWifError),

    #[error("{0} signatures require a compressed public key")]
    UncompressedKey(AddressKind),

    #[error("sighash computation failed: {0}")]
    Sighash(String),

    #[error("argument is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("signature contains an interior NUL byte")]
    InteriorNul(#[from] std::ffi::NulError),

    #[error("null {0} argument")]
    NullPointer(&'static str),

    #[error("signer panicked")]
    Panic,
}
