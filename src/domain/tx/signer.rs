//! Offline transaction signing
//!
//! Signing is deterministic (RFC 6979 nonces), so the same unsigned
//! transaction and key always produce byte-identical output. The private key
//! never leaves this address space.

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{Signed, SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::{Decodable2718, Encodable2718};
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, Signature, B256};
use alloy::signers::local::PrivateKeySigner;

use crate::domain::tx::UnsignedTransaction;
use crate::error::{GatewayError, GatewayResult};

/// A signed transaction and its wire serialization.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    signed: Signed<TxLegacy>,
    raw: Bytes,
}

impl SignedTransaction {
    /// The transaction fields as signed
    pub fn tx(&self) -> &TxLegacy {
        self.signed.tx()
    }

    /// Keccak-256 of the wire serialization
    pub fn hash(&self) -> B256 {
        *self.signed.hash()
    }

    /// The recoverable signature (r, s, parity)
    pub fn signature(&self) -> &Signature {
        self.signed.signature()
    }

    /// Recovery indicator: 0 or 1
    pub fn recovery_id(&self) -> u8 {
        self.signed.signature().v() as u8
    }

    /// Canonical RLP bytes, ready for `eth_sendRawTransaction`
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Wire bytes as a 0x-prefixed hex string
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    /// Recover the signing address from (hash, r, s, recovery id).
    pub fn recover_sender(&self) -> GatewayResult<Address> {
        self.signed
            .recover_signer()
            .map_err(|err| GatewayError::Decode(format!("signature recovery failed: {err}")))
    }

    /// Parse wire bytes back into a signed transaction.
    pub fn decode(raw: &[u8]) -> GatewayResult<Self> {
        let envelope = TxEnvelope::decode_2718(&mut &raw[..])
            .map_err(|err| GatewayError::Decode(format!("malformed raw transaction: {err}")))?;

        match envelope {
            TxEnvelope::Legacy(signed) => Ok(Self {
                signed,
                raw: Bytes::copy_from_slice(raw),
            }),
            other => Err(GatewayError::Decode(format!(
                "expected a legacy transaction, got type {:?}",
                other.tx_type()
            ))),
        }
    }
}

/// Sign the canonical serialization of `tx` with the given private key.
///
/// The key must recover to the transaction's declared sender; any mismatch
/// is rejected before a single byte goes on the wire.
pub fn sign(tx: &UnsignedTransaction, private_key: &str) -> GatewayResult<SignedTransaction> {
    let signer = parse_private_key(private_key)?;

    if signer.address() != tx.sender {
        return Err(GatewayError::InvalidKey(format!(
            "key recovers to {:?}, declared sender is {:?}",
            signer.address(),
            tx.sender
        )));
    }

    let mut legacy = tx.to_legacy();
    let signature = signer
        .sign_transaction_sync(&mut legacy)
        .map_err(|err| GatewayError::InvalidKey(err.to_string()))?;

    let signed = legacy.into_signed(signature);
    let raw = signed.encoded_2718();

    Ok(SignedTransaction {
        signed,
        raw: raw.into(),
    })
}

/// Parse a 0x-prefixed or bare hex private key into a signer.
fn parse_private_key(private_key: &str) -> GatewayResult<PrivateKeySigner> {
    let trimmed = private_key.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(payload)
        .map_err(|err| GatewayError::InvalidKey(format!("not valid hex: {err}")))?;
    if bytes.len() != 32 {
        return Err(GatewayError::InvalidKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    PrivateKeySigner::from_bytes(&B256::from_slice(&bytes))
        .map_err(|err| GatewayError::InvalidKey(format!("not a valid curve scalar: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tx::TRANSFER_GAS_LIMIT;
    use crate::domain::KeyPair;
    use alloy::primitives::{address, U256};

    fn transfer_for(pair: &KeyPair) -> UnsignedTransaction {
        UnsignedTransaction::build_offline(
            pair.address,
            Some(address!("2222222222222222222222222222222222222222")),
            U256::from(100),
            0,
            0,
            TRANSFER_GAS_LIMIT,
            Bytes::new(),
        )
    }

    #[test]
    fn test_signing_is_deterministic() {
        let pair = KeyPair::generate();
        let tx = transfer_for(&pair);

        let first = sign(&tx, &pair.private_key_hex()).unwrap();
        let second = sign(&tx, &pair.private_key_hex()).unwrap();

        assert_eq!(first.raw(), second.raw());
        assert_eq!(first.hash(), second.hash());
    }

    #[test]
    fn test_recovered_sender_matches() {
        let pair = KeyPair::generate();
        let signed = sign(&transfer_for(&pair), &pair.private_key_hex()).unwrap();
        assert_eq!(signed.recover_sender().unwrap(), pair.address);
    }

    #[test]
    fn test_mismatched_sender_is_rejected() {
        let pair = KeyPair::generate();
        let other = KeyPair::generate();

        let tx = transfer_for(&pair);
        let err = sign(&tx, &other.private_key_hex()).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidKey(_)));
    }

    #[test]
    fn test_malformed_keys_are_rejected() {
        let pair = KeyPair::generate();
        let tx = transfer_for(&pair);

        assert!(matches!(
            sign(&tx, "0xzz").unwrap_err(),
            GatewayError::InvalidKey(_)
        ));
        assert!(matches!(
            sign(&tx, "0x1234").unwrap_err(),
            GatewayError::InvalidKey(_)
        ));
        // Zero is not a valid scalar
        assert!(matches!(
            sign(&tx, &format!("0x{}", "00".repeat(32))).unwrap_err(),
            GatewayError::InvalidKey(_)
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            SignedTransaction::decode(&[0x00, 0x01, 0x02]).unwrap_err(),
            GatewayError::Decode(_)
        ));
    }

    #[test]
    fn test_decode_round_trip() {
        let pair = KeyPair::generate();
        let tx = transfer_for(&pair);
        let signed = sign(&tx, &pair.private_key_hex()).unwrap();

        let reparsed = SignedTransaction::decode(signed.raw()).unwrap();
        assert_eq!(reparsed.tx().nonce, 0);
        assert_eq!(reparsed.tx().value, U256::from(100));
        assert_eq!(reparsed.hash(), signed.hash());
    }
}
