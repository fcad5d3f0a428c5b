// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Canonical binary serialization for the transaction subset this service
//! submits: `Payment`, `TrustSet`, `AccountSet`, `OfferCreate`.
//!
//! The format is the ledger's, not ours: fields are emitted sorted by
//! (type code, field code), blobs are length-prefixed, and issued amounts use
//! the ledger's 64-bit decimal-float pattern. Public nodes do not sign on the
//! caller's behalf, so the client must produce byte-exact signing payloads.

use sha2::{Digest, Sha512};

use super::address::decode_account_id;
use super::types::{Amount, IssuedAmount};
use super::LedgerError;

/// Prefix for single-signer signing payloads (`STX\0`).
const SIGNING_PREFIX: [u8; 4] = [0x53, 0x54, 0x58, 0x00];
/// Prefix for transaction hashes (`TXN\0`).
const TX_HASH_PREFIX: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

/// First half of SHA-512, the ledger's standard digest.
pub(crate) fn sha512_half(data: &[u8]) -> [u8; 32] {
    let digest = Sha512::digest(data);
    let mut half = [0u8; 32];
    half.copy_from_slice(&digest[..32]);
    half
}

// Serialized type codes.
const ST_UINT16: u8 = 1;
const ST_UINT32: u8 = 2;
const ST_AMOUNT: u8 = 6;
const ST_BLOB: u8 = 7;
const ST_ACCOUNT: u8 = 8;

// Field codes within their type, from the ledger's field definitions.
const FIELD_TRANSACTION_TYPE: u8 = 2;
const FIELD_FLAGS: u8 = 2;
const FIELD_SEQUENCE: u8 = 4;
const FIELD_LAST_LEDGER_SEQUENCE: u8 = 27;
const FIELD_SET_FLAG: u8 = 33;
const FIELD_AMOUNT: u8 = 1;
const FIELD_LIMIT_AMOUNT: u8 = 3;
const FIELD_TAKER_PAYS: u8 = 4;
const FIELD_TAKER_GETS: u8 = 5;
const FIELD_FEE: u8 = 8;
const FIELD_SIGNING_PUB_KEY: u8 = 3;
const FIELD_TXN_SIGNATURE: u8 = 4;
const FIELD_ACCOUNT: u8 = 1;
const FIELD_DESTINATION: u8 = 3;

/// Transaction payloads this service knows how to build.
#[derive(Debug, Clone)]
pub enum TxKind {
    /// Send XRP or an issued token. Issuers issue tokens with this.
    Payment { destination: String, amount: Amount },
    /// Create or update a trust line.
    TrustSet { limit: IssuedAmount },
    /// Set an account-level flag.
    AccountSet { set_flag: u32 },
    /// Place a DEX offer.
    OfferCreate { taker_gets: Amount, taker_pays: Amount },
}

/// An unsigned transaction. `sequence`, `fee_drops` and
/// `last_ledger_sequence` are filled in by autofill before signing.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub account: String,
    pub kind: TxKind,
    pub flags: Option<u32>,
    pub sequence: Option<u32>,
    pub fee_drops: Option<u64>,
    pub last_ledger_sequence: Option<u32>,
}

impl Transaction {
    pub fn new(account: &str, kind: TxKind) -> Self {
        Self {
            account: account.to_string(),
            kind,
            flags: None,
            sequence: None,
            fee_drops: None,
            last_ledger_sequence: None,
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Transaction type code on the wire.
    fn type_code(&self) -> u16 {
        match self.kind {
            TxKind::Payment { .. } => 0,
            TxKind::AccountSet { .. } => 3,
            TxKind::OfferCreate { .. } => 7,
            TxKind::TrustSet { .. } => 20,
        }
    }

    /// Transaction type name for logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            TxKind::Payment { .. } => "Payment",
            TxKind::AccountSet { .. } => "AccountSet",
            TxKind::OfferCreate { .. } => "OfferCreate",
            TxKind::TrustSet { .. } => "TrustSet",
        }
    }

    /// Serialize with the given signing key and, once signed, the signature.
    fn serialize(
        &self,
        signing_pub_key: &[u8],
        signature: Option<&[u8]>,
    ) -> Result<Vec<u8>, LedgerError> {
        let sequence = self
            .sequence
            .ok_or_else(|| codec_err("missing Sequence; autofill first"))?;
        let fee = self
            .fee_drops
            .ok_or_else(|| codec_err("missing Fee; autofill first"))?;

        let mut ser = Serializer::default();
        ser.uint16(FIELD_TRANSACTION_TYPE, self.type_code());
        if let Some(flags) = self.flags {
            ser.uint32(FIELD_FLAGS, flags);
        }
        ser.uint32(FIELD_SEQUENCE, sequence);
        if let Some(lls) = self.last_ledger_sequence {
            ser.uint32(FIELD_LAST_LEDGER_SEQUENCE, lls);
        }
        ser.amount(FIELD_FEE, &Amount::drops(fee))?;
        ser.blob(FIELD_SIGNING_PUB_KEY, signing_pub_key);
        if let Some(sig) = signature {
            ser.blob(FIELD_TXN_SIGNATURE, sig);
        }
        ser.account(FIELD_ACCOUNT, &self.account)?;

        match &self.kind {
            TxKind::Payment {
                destination,
                amount,
            } => {
                ser.amount(FIELD_AMOUNT, amount)?;
                ser.account(FIELD_DESTINATION, destination)?;
            }
            TxKind::TrustSet { limit } => {
                ser.amount(FIELD_LIMIT_AMOUNT, &Amount::Issued(limit.clone()))?;
            }
            TxKind::AccountSet { set_flag } => {
                ser.uint32(FIELD_SET_FLAG, *set_flag);
            }
            TxKind::OfferCreate {
                taker_gets,
                taker_pays,
            } => {
                ser.amount(FIELD_TAKER_PAYS, taker_pays)?;
                ser.amount(FIELD_TAKER_GETS, taker_gets)?;
            }
        }

        Ok(ser.finish())
    }

    /// The byte payload a wallet signs: prefix plus the unsigned serialization.
    pub fn signing_payload(&self, signing_pub_key: &[u8]) -> Result<Vec<u8>, LedgerError> {
        let mut payload = SIGNING_PREFIX.to_vec();
        payload.extend(self.serialize(signing_pub_key, None)?);
        Ok(payload)
    }

    /// The fully signed wire blob.
    pub fn signed_blob(
        &self,
        signing_pub_key: &[u8],
        signature: &[u8],
    ) -> Result<Vec<u8>, LedgerError> {
        self.serialize(signing_pub_key, Some(signature))
    }
}

/// Transaction hash of a signed blob (uppercase hex, as the ledger reports it).
pub fn tx_hash(signed_blob: &[u8]) -> String {
    let mut data = TX_HASH_PREFIX.to_vec();
    data.extend_from_slice(signed_blob);
    hex::encode_upper(sha512_half(&data))
}

fn codec_err(message: impl Into<String>) -> LedgerError {
    LedgerError::Codec(message.into())
}

/// Collects encoded fields, then emits them in canonical order.
#[derive(Default)]
struct Serializer {
    fields: Vec<(u8, u8, Vec<u8>)>,
}

impl Serializer {
    fn uint16(&mut self, field: u8, value: u16) {
        self.fields
            .push((ST_UINT16, field, value.to_be_bytes().to_vec()));
    }

    fn uint32(&mut self, field: u8, value: u32) {
        self.fields
            .push((ST_UINT32, field, value.to_be_bytes().to_vec()));
    }

    fn amount(&mut self, field: u8, amount: &Amount) -> Result<(), LedgerError> {
        self.fields.push((ST_AMOUNT, field, encode_amount(amount)?));
        Ok(())
    }

    fn blob(&mut self, field: u8, data: &[u8]) {
        let mut encoded = encode_vl_length(data.len());
        encoded.extend_from_slice(data);
        self.fields.push((ST_BLOB, field, encoded));
    }

    fn account(&mut self, field: u8, address: &str) -> Result<(), LedgerError> {
        let id = decode_account_id(address)?;
        let mut encoded = encode_vl_length(id.len());
        encoded.extend_from_slice(&id);
        self.fields.push((ST_ACCOUNT, field, encoded));
        Ok(())
    }

    fn finish(mut self) -> Vec<u8> {
        self.fields
            .sort_by_key(|(type_code, field_code, _)| (*type_code, *field_code));

        let mut out = Vec::new();
        for (type_code, field_code, value) in self.fields {
            out.extend(field_header(type_code, field_code));
            out.extend(value);
        }
        out
    }
}

/// Field header bytes for a (type, field) pair.
fn field_header(type_code: u8, field_code: u8) -> Vec<u8> {
    match (type_code < 16, field_code < 16) {
        (true, true) => vec![(type_code << 4) | field_code],
        (true, false) => vec![type_code << 4, field_code],
        (false, true) => vec![field_code, type_code],
        (false, false) => vec![0, type_code, field_code],
    }
}

/// Variable-length prefix. Lengths here are tiny (20 or 33 bytes), but the
/// full three-tier scheme is cheap to carry.
fn encode_vl_length(len: usize) -> Vec<u8> {
    if len <= 192 {
        vec![len as u8]
    } else if len <= 12_480 {
        let adjusted = len - 193;
        vec![193 + (adjusted >> 8) as u8, (adjusted & 0xFF) as u8]
    } else {
        let adjusted = len - 12_481;
        vec![
            241 + (adjusted >> 16) as u8,
            ((adjusted >> 8) & 0xFF) as u8,
            (adjusted & 0xFF) as u8,
        ]
    }
}

fn encode_amount(amount: &Amount) -> Result<Vec<u8>, LedgerError> {
    match amount {
        Amount::Drops(drops) => {
            let drops: u64 = drops
                .parse()
                .map_err(|_| codec_err(format!("invalid drop count `{drops}`")))?;
            if drops > 100_000_000_000_000_000 {
                return Err(codec_err("drop count exceeds total XRP supply"));
            }
            // Bit 62 marks a positive native amount.
            Ok((0x4000_0000_0000_0000u64 | drops).to_be_bytes().to_vec())
        }
        Amount::Issued(issued) => {
            let mut out = Vec::with_capacity(48);
            out.extend(encode_issued_value(&issued.value)?.to_be_bytes());
            out.extend(encode_currency(&issued.currency)?);
            out.extend(decode_account_id(&issued.issuer)?);
            Ok(out)
        }
    }
}

/// Encode an issued-token decimal value into the ledger's 64-bit pattern:
/// not-XRP bit, sign bit, exponent biased by 97, 54-bit mantissa normalized
/// to [10^15, 10^16).
fn encode_issued_value(value: &str) -> Result<u64, LedgerError> {
    let value = value.trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let mut parts = digits.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(codec_err(format!("invalid token value `{value}`")));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(codec_err(format!("invalid token value `{value}`")));
    }

    let mut mantissa: u128 = 0;
    for c in int_part.chars().chain(frac_part.chars()) {
        mantissa = mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add((c as u8 - b'0') as u128))
            .ok_or_else(|| codec_err(format!("token value `{value}` out of range")))?;
    }
    let mut exponent: i32 = -(frac_part.len() as i32);

    if mantissa == 0 {
        // Canonical zero: only the not-XRP bit set.
        return Ok(0x8000_0000_0000_0000);
    }

    const MANTISSA_MIN: u128 = 1_000_000_000_000_000;
    const MANTISSA_MAX: u128 = 9_999_999_999_999_999;

    while mantissa > MANTISSA_MAX {
        if mantissa % 10 != 0 {
            return Err(codec_err(format!(
                "token value `{value}` has more precision than the ledger carries"
            )));
        }
        mantissa /= 10;
        exponent += 1;
    }
    while mantissa < MANTISSA_MIN {
        mantissa *= 10;
        exponent -= 1;
    }

    if !(-96..=80).contains(&exponent) {
        return Err(codec_err(format!("token value `{value}` out of range")));
    }

    let mut bits = 0x8000_0000_0000_0000u64;
    if !negative {
        bits |= 0x4000_0000_0000_0000;
    }
    bits |= ((exponent + 97) as u64) << 54;
    bits |= mantissa as u64;
    Ok(bits)
}

/// Encode a currency code into its 160-bit form: three ASCII characters at
/// bytes 12..15, or a raw 40-hex-character nonstandard code.
fn encode_currency(code: &str) -> Result<[u8; 20], LedgerError> {
    let mut out = [0u8; 20];

    if code.len() == 40 && code.chars().all(|c| c.is_ascii_hexdigit()) {
        let raw = hex::decode(code).map_err(|e| codec_err(e.to_string()))?;
        out.copy_from_slice(&raw);
        return Ok(out);
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(codec_err(format!("invalid currency code `{code}`")));
    }
    if code == "XRP" {
        return Err(codec_err("XRP cannot be used as an issued currency"));
    }

    out[12..15].copy_from_slice(code.as_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::address::encode_account_id;

    #[test]
    fn issued_value_one_matches_reference_encoding() {
        // 1 = mantissa 10^15, exponent -15; the reference vector for "1".
        assert_eq!(encode_issued_value("1").unwrap(), 0xD483_8D7E_A4C6_8000);
    }

    #[test]
    fn issued_value_zero_is_canonical() {
        assert_eq!(encode_issued_value("0").unwrap(), 0x8000_0000_0000_0000);
        assert_eq!(encode_issued_value("0.000").unwrap(), 0x8000_0000_0000_0000);
    }

    #[test]
    fn issued_value_negative_clears_sign_bit() {
        let positive = encode_issued_value("1").unwrap();
        let negative = encode_issued_value("-1").unwrap();
        assert_eq!(positive & !0x4000_0000_0000_0000, negative);
    }

    #[test]
    fn issued_value_normalizes_mantissa() {
        let bits = encode_issued_value("2500").unwrap();
        let mantissa = bits & ((1u64 << 54) - 1);
        let exponent = ((bits >> 54) & 0xFF) as i32 - 97;
        assert!((1_000_000_000_000_000..=9_999_999_999_999_999).contains(&mantissa));
        // mantissa * 10^exponent == 2500
        assert_eq!(mantissa, 2_500_000_000_000_000);
        assert_eq!(exponent, -12);
    }

    #[test]
    fn issued_value_rejects_excess_precision() {
        assert!(encode_issued_value("1.00000000000000001").is_err());
        assert!(encode_issued_value("abc").is_err());
        assert!(encode_issued_value("").is_err());
    }

    #[test]
    fn native_amount_sets_positive_bit() {
        let bytes = encode_amount(&Amount::drops(1_000_000)).unwrap();
        assert_eq!(hex::encode_upper(&bytes), "40000000000F4240");
    }

    #[test]
    fn currency_codes() {
        let tka = encode_currency("TKA").unwrap();
        assert_eq!(&tka[12..15], b"TKA");
        assert!(tka[..12].iter().all(|&b| b == 0));
        assert!(tka[15..].iter().all(|&b| b == 0));

        let raw = "0158415500000000C1F76FF6ECB0BAC600000000";
        assert_eq!(hex::encode_upper(encode_currency(raw).unwrap()), raw);

        assert!(encode_currency("XRP").is_err());
        assert!(encode_currency("TOOLONG").is_err());
        assert!(encode_currency("T!").is_err());
    }

    #[test]
    fn vl_length_tiers() {
        assert_eq!(encode_vl_length(0), vec![0]);
        assert_eq!(encode_vl_length(20), vec![20]);
        assert_eq!(encode_vl_length(192), vec![192]);
        assert_eq!(encode_vl_length(193), vec![193, 0]);
        assert_eq!(encode_vl_length(12_480), vec![240, 255]);
        assert_eq!(encode_vl_length(12_481), vec![241, 0, 0]);
    }

    #[test]
    fn field_headers() {
        // TransactionType: type 1, field 2.
        assert_eq!(field_header(1, 2), vec![0x12]);
        // LastLedgerSequence: type 2, field 27.
        assert_eq!(field_header(2, 27), vec![0x20, 0x1B]);
        // SetFlag: type 2, field 33.
        assert_eq!(field_header(2, 33), vec![0x20, 0x21]);
    }

    #[test]
    fn payment_serializes_in_canonical_order() {
        let account = encode_account_id(&[0x11u8; 20]);
        let destination = encode_account_id(&[0x22u8; 20]);
        let pub_key = [0xEDu8; 33];

        let mut tx = Transaction::new(
            &account,
            TxKind::Payment {
                destination: destination.clone(),
                amount: Amount::drops(1000),
            },
        );
        tx.sequence = Some(5);
        tx.fee_drops = Some(12);
        tx.last_ledger_sequence = Some(100);

        let blob = tx.serialize(&pub_key, None).unwrap();

        let mut expected = String::new();
        expected.push_str("120000"); // TransactionType: Payment
        expected.push_str("2400000005"); // Sequence
        expected.push_str("201B00000064"); // LastLedgerSequence
        expected.push_str("6140000000000003E8"); // Amount (1000 drops)
        expected.push_str("68400000000000000C"); // Fee (12 drops)
        expected.push_str("7321"); // SigningPubKey, VL 33
        expected.push_str(&hex::encode_upper(pub_key));
        expected.push_str("8114"); // Account, VL 20
        expected.push_str(&hex::encode_upper([0x11u8; 20]));
        expected.push_str("8314"); // Destination, VL 20
        expected.push_str(&hex::encode_upper([0x22u8; 20]));

        assert_eq!(hex::encode_upper(&blob), expected);
    }

    #[test]
    fn trust_set_carries_limit_amount() {
        let account = encode_account_id(&[0x11u8; 20]);
        let issuer = encode_account_id(&[0x22u8; 20]);

        let mut tx = Transaction::new(
            &account,
            TxKind::TrustSet {
                limit: IssuedAmount {
                    currency: "TKA".to_string(),
                    issuer,
                    value: "1000000".to_string(),
                },
            },
        )
        .with_flags(crate::ledger::types::TF_CLEAR_NO_RIPPLE);
        tx.sequence = Some(1);
        tx.fee_drops = Some(10);

        let blob = tx.serialize(&[0xEDu8; 33], None).unwrap();
        let hex_blob = hex::encode_upper(&blob);
        // TrustSet type code 20, then Flags before Sequence.
        assert!(hex_blob.starts_with("1200142200040000240000000163"));
    }

    #[test]
    fn signing_payload_and_hash_prefixes() {
        let account = encode_account_id(&[0x11u8; 20]);
        let mut tx = Transaction::new(&account, TxKind::AccountSet { set_flag: 8 });
        tx.sequence = Some(1);
        tx.fee_drops = Some(10);

        let payload = tx.signing_payload(&[0xEDu8; 33]).unwrap();
        assert_eq!(&payload[..4], &[0x53, 0x54, 0x58, 0x00]);

        let blob = tx.signed_blob(&[0xEDu8; 33], &[0u8; 64]).unwrap();
        let hash = tx_hash(&blob);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash.to_uppercase());
    }

    #[test]
    fn serialize_requires_autofill() {
        let account = encode_account_id(&[0x11u8; 20]);
        let tx = Transaction::new(&account, TxKind::AccountSet { set_flag: 8 });
        assert!(tx.serialize(&[0xEDu8; 33], None).is_err());
    }
}
