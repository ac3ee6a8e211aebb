use crate::{
    error::SignerError,
    hashing,
    wallet::{AddressKind, Wallet},
};
use base64::{engine::general_purpose, Engine};
use bitcoin::{
    absolute, consensus, ecdsa,
    hashes::Hash,
    key::TapTweak,
    opcodes::all::OP_RETURN,
    secp256k1::{Keypair, Message, Secp256k1, Signing, Verification},
    sighash::{EcdsaSighashType, Prevouts, SighashCache, TapSighashType},
    taproot,
    transaction::Version,
    Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
};

const OP_0: u8 = 0x00;
const OP_PUSHBYTES_32: u8 = 0x20;

/// Builds the virtual `to_spend` transaction that commits to `message` and
/// pays the wallet's `scriptPubKey`, and returns its txid.
pub fn to_spend_txid(message: &str, wallet: &Wallet) -> Txid {
    let mut script_sig = Vec::with_capacity(34);
    script_sig.push(OP_0);
    script_sig.push(OP_PUSHBYTES_32);
    script_sig.extend_from_slice(&hashing::message_hash(message.as_bytes()));

    let tx = Transaction {
        version: Version(0),
        lock_time: absolute::LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint {
                txid: Txid::all_zeros(),
                vout: 0xFFFF_FFFF,
            },
            script_sig: ScriptBuf::from_bytes(script_sig),
            sequence: Sequence(0),
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::ZERO,
            script_pubkey: wallet.script_pubkey.clone(),
        }],
    };
    tx.compute_txid()
}

/// Builds the unsigned virtual `to_sign` transaction spending output 0 of
/// `to_spend` into a single `OP_RETURN` output.
pub fn to_sign_tx(to_spend: Txid) -> Transaction {
    Transaction {
        version: Version(0),
        lock_time: absolute::LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint {
                txid: to_spend,
                vout: 0,
            },
            script_sig: ScriptBuf::new(),
            sequence: Sequence(0),
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::ZERO,
            script_pubkey: ScriptBuf::from_bytes(vec![OP_RETURN.to_u8()]),
        }],
    }
}

/// Signs input 0 of `to_sign` as a P2WPKH spend and returns the base64
/// encoded witness `[signature, public key]`.
pub fn sign_segwit<C: Signing>(
    to_sign: &Transaction,
    wallet: &Wallet,
    secp: &Secp256k1<C>,
) -> Result<String, SignerError> {
    let mut cache = SighashCache::new(to_sign);
    let sighash = cache
        .p2wpkh_signature_hash(0, &wallet.script_pubkey, Amount::ZERO, EcdsaSighashType::All)
        .map_err(|e| SignerError::Sighash(e.to_string()))?;

    let message = Message::from_digest(sighash.to_byte_array());
    let signature = ecdsa::Signature {
        signature: secp.sign_ecdsa(&message, &wallet.private_key.inner),
        sighash_type: EcdsaSighashType::All,
    };

    let witness = Witness::from_slice(&[signature.to_vec(), wallet.public_key.to_bytes().to_vec()]);
    Ok(encode_witness(&witness))
}

/// Signs input 0 of `to_sign` as a P2TR key-path spend and returns the
/// base64 encoded witness `[schnorr signature]`.
pub fn sign_taproot<C: Signing + Verification>(
    to_sign: &Transaction,
    wallet: &Wallet,
    secp: &Secp256k1<C>,
) -> Result<String, SignerError> {
    let prevouts = [TxOut {
        value: Amount::ZERO,
        script_pubkey: wallet.script_pubkey.clone(),
    }];
    let mut cache = SighashCache::new(to_sign);
    let sighash = cache
        .taproot_key_spend_signature_hash(0, &Prevouts::All(&prevouts), TapSighashType::Default)
        .map_err(|e| SignerError::Sighash(e.to_string()))?;

    let keypair = Keypair::from_secret_key(secp, &wallet.private_key.inner)
        .tap_tweak(secp, None)
        .to_inner();
    let message = Message::from_digest(sighash.to_byte_array());
    let signature = taproot::Signature {
        signature: secp.sign_schnorr_no_aux_rand(&message, &keypair),
        sighash_type: TapSighashType::Default,
    };

    let witness = Witness::from_slice(&[signature.to_vec()]);
    Ok(encode_witness(&witness))
}

fn encode_witness(witness: &Witness) -> String {
    general_purpose::STANDARD.encode(consensus::serialize(witness))
}

/// Produces a BIP-322 simple signature of `message` for the address of
/// `kind` controlled by the WIF key `wif`.
pub fn sign_simple(message: &str, wif: &str, kind: AddressKind) -> Result<String, SignerError> {
    let secp = Secp256k1::new();
    let wallet = Wallet::from_wif(wif, kind, &secp)?;
    let txid = to_spend_txid(message, &wallet);
    let to_sign = to_sign_tx(txid);
    tracing::debug!(%kind, to_spend = %txid, "Signing BIP-322 message");

    match kind {
        AddressKind::NativeSegwit => sign_segwit(&to_sign, &wallet, &secp),
        AddressKind::Taproot => sign_taproot(&to_sign, &wallet, &secp),
    }
}

pub fn simple_signature_with_wif_segwit(message: &str, wif: &str) -> Result<String, SignerError> {
    sign_simple(message, wif, AddressKind::NativeSegwit)
}

pub fn simple_signature_with_wif_taproot(message: &str, wif: &str) -> Result<String, SignerError> {
    sign_simple(message, wif, AddressKind::Taproot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::ecdsa::Signature as EcdsaSignature;

    const SEGWIT_WIF: &str = "L3gn3CheHVnEJHApMjb6BuKdc45LzqChEebLMQaMh3V7cMh6qsaM";
    const SEGWIT_SIGNATURE: &str = "AkcwRAIgcS8lDfTl7UAytHbZI9BT74uTYqIuQHHUxlFOGGmT5Q8CIAclpi1G295lXeeRfDXdUWfdlkWdhv0S8XFP8rNFfvnDASEDviPnXh+H71VQrKuWCm2FYhSGV9TPO4XJTPhu3fwhhPM=";
    const TAPROOT_WIF: &str = "L4F5BYm82Bck6VEY64EbqQkoBXqkegq9X9yc6iLTV3cyJoqUasnY";
    const TAPROOT_MESSAGE: &str =
        "Sign this message to log in to https://www.subber.xyz // 200323342";
    const TAPROOT_SIGNATURE: &str = "AUBxfbxG6dgW18nia1pfYVPB/OtzRImvqu5O2AvHwRmjmvRN5/bWbDDlMMfGlqJdRbqwUsxVAS/FfvbLJDE7MQFL";

    fn decode_witness(signature: &str) -> Witness {
        let bytes = general_purpose::STANDARD.decode(signature).unwrap();
        consensus::deserialize(&bytes).unwrap()
    }

    #[test]
    fn test_to_spend_txid() {
        let secp = Secp256k1::new();
        let wallet = Wallet::from_wif(SEGWIT_WIF, AddressKind::NativeSegwit, &secp).unwrap();
        assert_eq!(
            to_spend_txid("test", &wallet).to_string(),
            "b5cb848389f3ee72a8984560f6ae19f4a8dec1cd2d7e799d62f3e38ff121271c"
        );
    }

    #[test]
    fn test_to_sign_shape() {
        let secp = Secp256k1::new();
        let wallet = Wallet::from_wif(SEGWIT_WIF, AddressKind::NativeSegwit, &secp).unwrap();
        let txid = to_spend_txid("test", &wallet);
        let to_sign = to_sign_tx(txid);

        assert_eq!(to_sign.version, Version(0));
        assert_eq!(to_sign.input.len(), 1);
        assert_eq!(to_sign.input[0].previous_output, OutPoint { txid, vout: 0 });
        assert_eq!(to_sign.output.len(), 1);
        assert!(to_sign.output[0].script_pubkey.is_op_return());
        assert_eq!(to_sign.output[0].value, Amount::ZERO);
    }

    #[test]
    fn test_base64_encoded_signature() {
        let secp = Secp256k1::new();
        let wallet = Wallet::from_wif(SEGWIT_WIF, AddressKind::NativeSegwit, &secp).unwrap();
        let to_sign = to_sign_tx(to_spend_txid("test", &wallet));
        let signature = sign_segwit(&to_sign, &wallet, &secp).unwrap();
        assert_eq!(signature, SEGWIT_SIGNATURE);
    }

    #[test]
    fn test_segwit_signature_verifies() {
        let secp = Secp256k1::new();
        let wallet = Wallet::from_wif(SEGWIT_WIF, AddressKind::NativeSegwit, &secp).unwrap();
        let to_sign = to_sign_tx(to_spend_txid("test", &wallet));
        let witness = decode_witness(&sign_segwit(&to_sign, &wallet, &secp).unwrap());

        assert_eq!(witness.len(), 2);
        let sig_bytes = witness.nth(0).unwrap();
        assert_eq!(*sig_bytes.last().unwrap(), EcdsaSighashType::All as u8);
        assert_eq!(witness.nth(1).unwrap(), &wallet.public_key.to_bytes()[..]);

        let sighash = SighashCache::new(&to_sign)
            .p2wpkh_signature_hash(0, &wallet.script_pubkey, Amount::ZERO, EcdsaSighashType::All)
            .unwrap();
        let signature = EcdsaSignature::from_der(&sig_bytes[..sig_bytes.len() - 1]).unwrap();
        secp.verify_ecdsa(
            &Message::from_digest(sighash.to_byte_array()),
            &signature,
            &wallet.public_key.0,
        )
        .unwrap();
    }

    #[test]
    fn test_taproot_signature() {
        let secp = Secp256k1::new();
        let wallet = Wallet::from_wif(TAPROOT_WIF, AddressKind::Taproot, &secp).unwrap();
        let to_sign = to_sign_tx(to_spend_txid(TAPROOT_MESSAGE, &wallet));
        let signature = sign_taproot(&to_sign, &wallet, &secp).unwrap();
        assert_eq!(signature, TAPROOT_SIGNATURE);

        let witness = decode_witness(&signature);
        assert_eq!(witness.len(), 1);
        assert_eq!(witness.nth(0).unwrap().len(), 64);
    }

    #[test]
    fn test_simple_sig_segwit() {
        assert_eq!(
            simple_signature_with_wif_segwit("test", SEGWIT_WIF).unwrap(),
            SEGWIT_SIGNATURE
        );
    }

    #[test]
    fn test_simple_sig_taproot() {
        assert_eq!(
            simple_signature_with_wif_taproot(TAPROOT_MESSAGE, TAPROOT_WIF).unwrap(),
            TAPROOT_SIGNATURE
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let first = simple_signature_with_wif_taproot("hello", SEGWIT_WIF).unwrap();
        let second = simple_signature_with_wif_taproot("hello", SEGWIT_WIF).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_message_changes_signature() {
        let a = simple_signature_with_wif_segwit("a", SEGWIT_WIF).unwrap();
        let b = simple_signature_with_wif_segwit("b", SEGWIT_WIF).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_bad_checksum_wif() {
        // Last character altered.
        let err = simple_signature_with_wif_segwit(
            "test",
            "L3gn3CheHVnEJHApMjb6BuKdc45LzqChEebLMQaMh3V7cMh6qsaN",
        )
        .unwrap_err();
        assert!(matches!(err, SignerError::InvalidWif(_)));
    }
}
