// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Wallet keys: seed decoding, key derivation, and payload signing.
//!
//! The testnet faucet hands out ed25519 seeds (`sEd...`); operators may also
//! paste legacy secp256k1 family seeds (`s...`). Both derive exactly as the
//! ledger's reference tooling does:
//!
//! - ed25519: private key = SHA-512Half(entropy), public key prefixed `0xED`.
//! - secp256k1: root scalar from SHA-512Half(entropy || counter), account
//!   scalar from SHA-512Half(root_pub || family || counter), summed mod n.
//!
//! ed25519 signs the raw payload; secp256k1 signs SHA-512Half(payload) with
//! deterministic ECDSA, low-S normalized, DER encoded.

use ed25519_dalek::Signer;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;

use super::address::{self, SeedAlgorithm};
use super::codec::sha512_half;
use super::LedgerError;

enum Keypair {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

/// A signing wallet derived from a seed.
pub struct Wallet {
    seed: String,
    keypair: Keypair,
    public_key: Vec<u8>,
    address: String,
}

impl Wallet {
    /// Derive a wallet from a base58check seed string.
    pub fn from_seed(seed: &str) -> Result<Self, LedgerError> {
        let (entropy, algorithm) = address::decode_seed(seed)?;

        let (keypair, public_key) = match algorithm {
            SeedAlgorithm::Ed25519 => {
                let raw = sha512_half(&entropy);
                let signing = ed25519_dalek::SigningKey::from_bytes(&raw);
                let mut public = Vec::with_capacity(33);
                public.push(0xED);
                public.extend_from_slice(&signing.verifying_key().to_bytes());
                (Keypair::Ed25519(signing), public)
            }
            SeedAlgorithm::Secp256k1 => {
                let signing = derive_secp256k1(&entropy)?;
                let public = signing
                    .verifying_key()
                    .to_encoded_point(true)
                    .as_bytes()
                    .to_vec();
                (Keypair::Secp256k1(signing), public)
            }
        };

        let account = address::account_id(&public_key);
        let addr = address::encode_account_id(&account);

        Ok(Self {
            seed: seed.to_string(),
            keypair,
            public_key,
            address: addr,
        })
    }

    /// Classic address of this wallet.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The seed this wallet was derived from.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// 33-byte ledger-form public key.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Sign a serialized signing payload.
    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, LedgerError> {
        match &self.keypair {
            Keypair::Ed25519(key) => Ok(key.sign(payload).to_bytes().to_vec()),
            Keypair::Secp256k1(key) => {
                let digest = sha512_half(payload);
                let signature: k256::ecdsa::Signature = key
                    .sign_prehash(&digest)
                    .map_err(|e| LedgerError::Signing(e.to_string()))?;
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the seed or key material.
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Family-seed derivation: find a valid scalar by hashing `prefix || counter`.
fn find_scalar(prefix: &[u8]) -> Result<k256::SecretKey, LedgerError> {
    // The counter loop terminates almost immediately; the bound only guards
    // against a malformed implementation looping forever.
    for counter in 0u32..=64 {
        let mut buf = Vec::with_capacity(prefix.len() + 4);
        buf.extend_from_slice(prefix);
        buf.extend_from_slice(&counter.to_be_bytes());
        let digest = sha512_half(&buf);
        if let Ok(secret) = k256::SecretKey::from_slice(&digest) {
            return Ok(secret);
        }
    }
    Err(LedgerError::InvalidSeed)
}

fn derive_secp256k1(entropy: &[u8; 16]) -> Result<k256::ecdsa::SigningKey, LedgerError> {
    let root = find_scalar(entropy)?;
    let root_public = root.public_key().to_encoded_point(true);

    // Account family 0, matching the reference key derivation.
    let mut prefix = root_public.as_bytes().to_vec();
    prefix.extend_from_slice(&0u32.to_be_bytes());
    let intermediate = find_scalar(&prefix)?;

    let sum = *root.to_nonzero_scalar() + *intermediate.to_nonzero_scalar();
    k256::ecdsa::SigningKey::from_bytes(&sum.to_repr())
        .map_err(|_| LedgerError::InvalidSeed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Verifier;
    use k256::ecdsa::signature::hazmat::PrehashVerifier;

    #[test]
    fn derives_known_genesis_account() {
        // "masterpassphrase" family seed: the canonical secp256k1 vector.
        let wallet = Wallet::from_seed("snoPBrXtMeMyMHUVTgbuqAfg1SUTb").unwrap();
        assert_eq!(wallet.address(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
        assert_eq!(
            hex::encode_upper(wallet.public_key()),
            "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020"
        );
    }

    #[test]
    fn ed25519_wallet_is_deterministic() {
        let seed = address::encode_seed(&[7u8; 16], SeedAlgorithm::Ed25519);
        let a = Wallet::from_seed(&seed).unwrap();
        let b = Wallet::from_seed(&seed).unwrap();
        assert_eq!(a.address(), b.address());
        assert!(a.address().starts_with('r'));
        assert_eq!(a.public_key()[0], 0xED);
        assert_eq!(a.public_key().len(), 33);
    }

    #[test]
    fn ed25519_signatures_verify() {
        let seed = address::encode_seed(&[1u8; 16], SeedAlgorithm::Ed25519);
        let wallet = Wallet::from_seed(&seed).unwrap();
        let payload = b"signing payload";
        let signature = wallet.sign(payload).unwrap();

        let key_bytes: [u8; 32] = wallet.public_key()[1..].try_into().unwrap();
        let verifying = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes).unwrap();
        let signature = ed25519_dalek::Signature::from_bytes(&signature.try_into().unwrap());
        assert!(verifying.verify(payload, &signature).is_ok());
    }

    #[test]
    fn secp256k1_signatures_verify_over_prehash() {
        let wallet = Wallet::from_seed("snoPBrXtMeMyMHUVTgbuqAfg1SUTb").unwrap();
        let payload = b"signing payload";
        let der = wallet.sign(payload).unwrap();

        let verifying =
            k256::ecdsa::VerifyingKey::from_sec1_bytes(wallet.public_key()).unwrap();
        let signature = k256::ecdsa::Signature::from_der(&der).unwrap();
        let digest = sha512_half(payload);
        assert!(verifying.verify_prehash(&digest, &signature).is_ok());
    }

    #[test]
    fn rejects_garbage_seed() {
        assert!(Wallet::from_seed("not-a-seed").is_err());
        assert!(Wallet::from_seed("").is_err());
    }
}
