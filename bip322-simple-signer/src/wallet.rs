use crate::error::SignerError;
use bitcoin::{
    secp256k1::{Secp256k1, Signing, Verification},
    CompressedPublicKey, PrivateKey, ScriptBuf,
};
use std::fmt;

/// The kind of address a signature proves control of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Pay-to-witness-public-key-hash, SegWit v0.
    NativeSegwit,
    /// Pay-to-taproot, key path with no script tree.
    Taproot,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::NativeSegwit => f.write_str("segwit"),
            AddressKind::Taproot => f.write_str("taproot"),
        }
    }
}

/// A single-key wallet decoded from WIF.
///
/// The secret scalar is erased when the wallet is dropped.
pub struct Wallet {
    pub private_key: PrivateKey,
    pub public_key: CompressedPublicKey,
    pub kind: AddressKind,
    pub script_pubkey: ScriptBuf,
}

impl Wallet {
    pub fn from_wif<C: Signing + Verification>(
        wif: &str,
        kind: AddressKind,
        secp: &Secp256k1<C>,
    ) -> Result<Self, SignerError> {
        let private_key = PrivateKey::from_wif(wif)?;
        let public_key = CompressedPublicKey::from_private_key(secp, &private_key)
            .map_err(|_| SignerError::UncompressedKey(kind))?;

        let script_pubkey = match kind {
            AddressKind::NativeSegwit => ScriptBuf::new_p2wpkh(&public_key.wpubkey_hash()),
            AddressKind::Taproot => {
                let (internal_key, _) = public_key.0.x_only_public_key();
                ScriptBuf::new_p2tr(secp, internal_key, None)
            }
        };

        Ok(Self {
            private_key,
            public_key,
            kind,
            script_pubkey,
        })
    }
}

impl Drop for Wallet {
    fn drop(&mut self) {
        self.private_key.inner.non_secure_erase();
    }
}
