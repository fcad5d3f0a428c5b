// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Base58check codec for XRPL classic addresses and seeds.
//!
//! The ledger uses its own base58 alphabet and a double-SHA-256 checksum.
//! Classic addresses wrap a 20-byte account id (RIPEMD-160 of SHA-256 of the
//! public key); seeds wrap 16 bytes of entropy with a prefix that selects the
//! signing algorithm.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use super::LedgerError;

/// Payload type prefix for classic account addresses.
const ACCOUNT_ID_PREFIX: [u8; 1] = [0x00];
/// Payload type prefix for secp256k1 family seeds (`s...`).
const FAMILY_SEED_PREFIX: [u8; 1] = [0x21];
/// Payload type prefix for ed25519 seeds (`sEd...`).
const ED25519_SEED_PREFIX: [u8; 3] = [0x01, 0xE1, 0x4B];

/// Signing algorithm selected by a seed's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedAlgorithm {
    Ed25519,
    Secp256k1,
}

/// Compute the 20-byte account id for a 33-byte ledger public key.
pub fn account_id(public_key: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(public_key);
    let rip = Ripemd160::digest(sha);
    let mut id = [0u8; 20];
    id.copy_from_slice(&rip);
    id
}

/// Encode a 20-byte account id as a classic address (`r...`).
pub fn encode_account_id(id: &[u8; 20]) -> String {
    encode_base58check(&ACCOUNT_ID_PREFIX, id)
}

/// Decode a classic address back into its 20-byte account id.
pub fn decode_account_id(address: &str) -> Result<[u8; 20], LedgerError> {
    let payload = decode_base58check(address)?;
    let rest = payload
        .strip_prefix(&ACCOUNT_ID_PREFIX[..])
        .ok_or_else(|| LedgerError::InvalidAddress(address.to_string()))?;
    let id: [u8; 20] = rest
        .try_into()
        .map_err(|_| LedgerError::InvalidAddress(address.to_string()))?;
    Ok(id)
}

/// Encode 16 bytes of entropy as a seed for the given algorithm.
pub fn encode_seed(entropy: &[u8; 16], algorithm: SeedAlgorithm) -> String {
    match algorithm {
        SeedAlgorithm::Ed25519 => encode_base58check(&ED25519_SEED_PREFIX, entropy),
        SeedAlgorithm::Secp256k1 => encode_base58check(&FAMILY_SEED_PREFIX, entropy),
    }
}

/// Decode a seed string into its entropy and signing algorithm.
pub fn decode_seed(seed: &str) -> Result<([u8; 16], SeedAlgorithm), LedgerError> {
    let payload = decode_base58check(seed).map_err(|_| LedgerError::InvalidSeed)?;

    let (entropy, algorithm) = if let Some(rest) = payload.strip_prefix(&ED25519_SEED_PREFIX[..]) {
        (rest, SeedAlgorithm::Ed25519)
    } else if let Some(rest) = payload.strip_prefix(&FAMILY_SEED_PREFIX[..]) {
        (rest, SeedAlgorithm::Secp256k1)
    } else {
        return Err(LedgerError::InvalidSeed);
    };

    let entropy: [u8; 16] = entropy.try_into().map_err(|_| LedgerError::InvalidSeed)?;
    Ok((entropy, algorithm))
}

/// Quick validity check for classic addresses arriving over the API.
pub fn is_valid_address(address: &str) -> bool {
    address.starts_with('r') && decode_account_id(address).is_ok()
}

fn encode_base58check(prefix: &[u8], payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(prefix.len() + payload.len() + 4);
    data.extend_from_slice(prefix);
    data.extend_from_slice(payload);
    let check = Sha256::digest(Sha256::digest(&data));
    data.extend_from_slice(&check[..4]);
    bs58::encode(data)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

fn decode_base58check(encoded: &str) -> Result<Vec<u8>, LedgerError> {
    let data = bs58::decode(encoded)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|_| LedgerError::InvalidAddress(encoded.to_string()))?;

    if data.len() < 5 {
        return Err(LedgerError::InvalidAddress(encoded.to_string()));
    }

    let (payload, check) = data.split_at(data.len() - 4);
    let expected = Sha256::digest(Sha256::digest(payload));
    if check != &expected[..4] {
        return Err(LedgerError::InvalidAddress(encoded.to_string()));
    }

    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_roundtrip() {
        let id = [0x5Eu8; 20];
        let address = encode_account_id(&id);
        assert!(address.starts_with('r'));
        assert_eq!(decode_account_id(&address).unwrap(), id);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let id = [7u8; 20];
        let mut address = encode_account_id(&id);
        // Flip the last character to something else in the alphabet.
        let last = address.pop().unwrap();
        address.push(if last == 'z' { 'y' } else { 'z' });
        assert!(decode_account_id(&address).is_err());
    }

    #[test]
    fn seed_roundtrip_both_algorithms() {
        let entropy = [0x42u8; 16];

        let ed = encode_seed(&entropy, SeedAlgorithm::Ed25519);
        assert!(ed.starts_with("sEd"));
        assert_eq!(decode_seed(&ed).unwrap(), (entropy, SeedAlgorithm::Ed25519));

        let fam = encode_seed(&entropy, SeedAlgorithm::Secp256k1);
        assert!(fam.starts_with('s'));
        assert!(!fam.starts_with("sEd"));
        assert_eq!(
            decode_seed(&fam).unwrap(),
            (entropy, SeedAlgorithm::Secp256k1)
        );
    }

    #[test]
    fn decodes_known_genesis_seed() {
        // The well-known testnet genesis family seed.
        let (entropy, algorithm) = decode_seed("snoPBrXtMeMyMHUVTgbuqAfg1SUTb").unwrap();
        assert_eq!(algorithm, SeedAlgorithm::Secp256k1);
        assert_eq!(entropy.len(), 16);
    }

    #[test]
    fn address_validation() {
        assert!(is_valid_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"));
        assert!(!is_valid_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTH"));
        assert!(!is_valid_address("not-an-address"));
        assert!(!is_valid_address(""));
    }
}
