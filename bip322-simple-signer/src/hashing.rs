use sha2::{Digest, Sha256};

/// Tag of the BIP-322 message hash.
pub const BIP322_TAG: &[u8] = b"BIP0322-signed-message";

pub fn hash_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Computes the BIP-340 style tagged hash of `message`:
/// `SHA256(SHA256(tag) || SHA256(tag) || message)`.
pub fn message_hash(message: &[u8]) -> [u8; 32] {
    let tag_hash = hash_sha256(BIP322_TAG);
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher.update(message);
    hasher.finalize().into()
}
