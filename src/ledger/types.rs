// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Ledger types and constants.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// XRP Ledger network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// JSON-RPC endpoint URL
    pub rpc_url: &'static str,
    /// Faucet endpoint URL (testnet only)
    pub faucet_url: Option<&'static str>,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// XRPL Testnet configuration.
pub const XRPL_TESTNET: NetworkConfig = NetworkConfig {
    name: "XRPL Testnet",
    rpc_url: "https://s.altnet.rippletest.net:51234/",
    faucet_url: Some("https://faucet.altnet.rippletest.net/accounts"),
    explorer_url: "https://testnet.xrpl.org",
};

/// XRPL Mainnet configuration. No faucet; issuance demos must not run here.
pub const XRPL_MAINNET: NetworkConfig = NetworkConfig {
    name: "XRP Ledger",
    rpc_url: "https://xrplcluster.com/",
    faucet_url: None,
    explorer_url: "https://livenet.xrpl.org",
};

/// Supported network identifier for this build.
pub const NETWORK_TESTNET: &str = "testnet";

/// Validate network input for the testnet-only runtime.
pub fn ensure_testnet_network(raw: Option<&str>) -> Result<(), String> {
    let value = raw.unwrap_or(NETWORK_TESTNET).trim().to_ascii_lowercase();
    if value == NETWORK_TESTNET {
        Ok(())
    } else {
        Err(format!(
            "Only `{NETWORK_TESTNET}` network is supported in this deployment."
        ))
    }
}

/// The one result code that means a transaction actually succeeded.
pub const TES_SUCCESS: &str = "tesSUCCESS";

/// AccountSet flag: allow rippling through this account's trust lines.
pub const ASF_DEFAULT_RIPPLE: u32 = 8;
/// AccountSet flag: trust lines to this account need explicit authorization.
pub const ASF_REQUIRE_AUTH: u32 = 2;

/// TrustSet flag: authorize the counterparty to hold our issued token.
pub const TF_SETF_AUTH: u32 = 0x0001_0000;
/// TrustSet flag: set the No Ripple flag on this trust line.
pub const TF_SET_NO_RIPPLE: u32 = 0x0002_0000;
/// TrustSet flag: clear the No Ripple flag on this trust line.
pub const TF_CLEAR_NO_RIPPLE: u32 = 0x0004_0000;

/// An issued-token amount: currency code, issuing account, decimal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IssuedAmount {
    /// Currency code ("TKA", or 40 hex characters for nonstandard codes)
    pub currency: String,
    /// Issuing account (classic address)
    pub issuer: String,
    /// Decimal value as a string
    pub value: String,
}

/// A ledger amount: native XRP in drops, or an issued token.
///
/// Matches the ledger's JSON representation, where native amounts are bare
/// strings of drops and issued amounts are objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Amount {
    /// Native XRP, in drops
    Drops(String),
    /// Issued token
    Issued(IssuedAmount),
}

impl Amount {
    /// Native amount from a drop count.
    pub fn drops(drops: u64) -> Self {
        Amount::Drops(drops.to_string())
    }

    /// Issued amount from parts.
    pub fn issued(currency: &str, issuer: &str, value: &str) -> Self {
        Amount::Issued(IssuedAmount {
            currency: currency.to_string(),
            issuer: issuer.to_string(),
            value: value.to_string(),
        })
    }
}

/// One trust line as reported by the `account_lines` method.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrustLine {
    /// Counterparty account
    pub account: String,
    /// Currency code
    pub currency: String,
    /// Balance from the perspective of the queried account
    pub balance: String,
    /// Limit the queried account is willing to hold
    pub limit: String,
    /// Whether the queried account has authorized the counterparty
    #[serde(default)]
    pub authorized: Option<bool>,
    /// Whether No Ripple is set on the queried account's side
    #[serde(default)]
    pub no_ripple: Option<bool>,
}

/// Outcome of a submitted transaction once it left the open ledger.
#[derive(Debug, Clone)]
pub struct TxOutcome {
    /// Transaction hash (uppercase hex)
    pub hash: String,
    /// Final (or preliminary, if never validated) engine result code
    pub result_code: String,
    /// Whether the transaction made it into a validated ledger
    pub validated: bool,
    /// Raw `tx` response for callers that need the full record
    pub raw: serde_json::Value,
}

impl TxOutcome {
    /// True when the transaction was validated with `tesSUCCESS`.
    pub fn succeeded(&self) -> bool {
        self.validated && self.result_code == TES_SUCCESS
    }
}

/// Parse a decimal XRP value ("1.5") into drops.
pub fn xrp_to_drops(amount: &str) -> Result<u64, String> {
    let parts: Vec<&str> = amount.split('.').collect();

    if parts.len() > 2 {
        return Err("Invalid amount format".to_string());
    }

    let whole = parts[0]
        .parse::<u64>()
        .map_err(|_| "Invalid whole number".to_string())?;

    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > 6 {
            return Err("Too many decimal places (max 6)".to_string());
        }
        // Pad with zeros to drop precision
        let padded = format!("{dec_str:0<6}");
        padded
            .parse::<u64>()
            .map_err(|_| "Invalid decimal".to_string())?
    } else {
        0u64
    };

    whole
        .checked_mul(1_000_000)
        .and_then(|w| w.checked_add(decimal_part))
        .ok_or_else(|| "Amount overflow".to_string())
}

/// Format a drop count as a decimal XRP string.
pub fn drops_to_xrp(drops: u64) -> String {
    let whole = drops / 1_000_000;
    let remainder = drops % 1_000_000;

    if remainder == 0 {
        whole.to_string()
    } else {
        let decimal_str = format!("{remainder:0>6}");
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xrp_to_drops() {
        assert_eq!(xrp_to_drops("1").unwrap(), 1_000_000);
        assert_eq!(xrp_to_drops("1.5").unwrap(), 1_500_000);
        assert_eq!(xrp_to_drops("0.000001").unwrap(), 1);
        assert_eq!(xrp_to_drops("100").unwrap(), 100_000_000);
        assert!(xrp_to_drops("1.0000001").is_err());
        assert!(xrp_to_drops("1.2.3").is_err());
        assert!(xrp_to_drops("abc").is_err());
    }

    #[test]
    fn test_drops_to_xrp() {
        assert_eq!(drops_to_xrp(1_000_000), "1");
        assert_eq!(drops_to_xrp(1_500_000), "1.5");
        assert_eq!(drops_to_xrp(1), "0.000001");
        assert_eq!(drops_to_xrp(0), "0");
    }

    #[test]
    fn amount_serializes_like_the_ledger() {
        let native = Amount::drops(1_000_000);
        assert_eq!(
            serde_json::to_string(&native).unwrap(),
            r#""1000000""#
        );

        let issued = Amount::issued("TKA", "rEXAMPLE", "2500");
        let json = serde_json::to_value(&issued).unwrap();
        assert_eq!(json["currency"], "TKA");
        assert_eq!(json["issuer"], "rEXAMPLE");
        assert_eq!(json["value"], "2500");
    }

    #[test]
    fn amount_deserializes_both_forms() {
        let native: Amount = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(native, Amount::drops(42));

        let issued: Amount = serde_json::from_str(
            r#"{"currency":"TKB","issuer":"rISSUER","value":"10"}"#,
        )
        .unwrap();
        assert_eq!(issued, Amount::issued("TKB", "rISSUER", "10"));
    }

    #[test]
    fn network_validation_is_testnet_only() {
        assert!(ensure_testnet_network(None).is_ok());
        assert!(ensure_testnet_network(Some("testnet")).is_ok());
        assert!(ensure_testnet_network(Some(" TESTNET ")).is_ok());
        assert!(ensure_testnet_network(Some("mainnet")).is_err());
    }
}
