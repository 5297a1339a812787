//! Key pair generation and address derivation

use alloy::primitives::{Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::Serialize;

/// A freshly generated secp256k1 key pair.
///
/// The gateway never stores these; the caller owns the lifecycle. The
/// address is the last 20 bytes of the Keccak-256 hash of the uncompressed
/// public key.
#[derive(Debug, Clone, Serialize)]
pub struct KeyPair {
    /// 20-byte account address, EIP-55 checksummed on display
    pub address: Address,
    /// 64-byte uncompressed public key point (no SEC1 tag byte)
    pub public_key: Bytes,
    /// 32-byte private scalar
    pub private_key: B256,
}

impl KeyPair {
    /// Generate a key pair from OS randomness.
    ///
    /// Panics only if the entropy source is exhausted, which is fatal and
    /// non-retryable anyway.
    pub fn generate() -> Self {
        let signer = PrivateKeySigner::random();
        Self::from_signer(&signer)
    }

    fn from_signer(signer: &PrivateKeySigner) -> Self {
        let point = signer.credential().verifying_key().to_encoded_point(false);
        // Skip the 0x04 uncompressed-point tag
        let public_key = Bytes::copy_from_slice(&point.as_bytes()[1..]);

        Self {
            address: signer.address(),
            public_key,
            private_key: signer.to_bytes(),
        }
    }

    /// Private key as a 0x-prefixed hex string
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.private_key))
    }

    /// Address as a 0x-prefixed hex string
    pub fn address_hex(&self) -> String {
        format!("{:?}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    #[test]
    fn test_generated_keys_are_distinct() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_ne!(a.private_key, b.private_key);
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn test_address_matches_public_key_hash() {
        let pair = KeyPair::generate();
        assert_eq!(pair.public_key.len(), 64);

        let hash = keccak256(&pair.public_key);
        assert_eq!(pair.address.as_slice(), &hash[12..]);
    }

    #[test]
    fn test_hex_forms_are_prefixed() {
        let pair = KeyPair::generate();
        assert!(pair.private_key_hex().starts_with("0x"));
        assert_eq!(pair.private_key_hex().len(), 66);
        assert!(pair.address_hex().starts_with("0x"));
        assert_eq!(pair.address_hex().len(), 42);
    }
}
