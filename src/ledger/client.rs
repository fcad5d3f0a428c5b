// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! JSON-RPC client for the XRP Ledger testnet.
//!
//! Covers the request surface this service needs (`account_info`,
//! `account_lines`, `book_offers`, `fee`, `ledger_current`, `submit`, `tx`),
//! faucet funding, and the autofill → sign → submit-and-wait sequence.

use std::time::Duration;

use serde_json::{json, Value};

use super::codec::{self, Transaction};
use super::keys::Wallet;
use super::types::{NetworkConfig, TrustLine, TxOutcome, XRPL_TESTNET};
use super::LedgerError;

/// Safety margin added to the current ledger index for `LastLedgerSequence`.
const LAST_LEDGER_OFFSET: u32 = 20;

/// Minimum transaction fee in drops.
const MIN_FEE_DROPS: u64 = 10;
/// Cap on the open-ledger fee we are willing to pay, in drops.
const MAX_FEE_DROPS: u64 = 2_000;

/// How long to wait between validation polls.
const VALIDATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Account activation polling: attempts and delay between them.
const ACTIVATION_RETRIES: u32 = 15;
const ACTIVATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Basic account state from `account_info`.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// Next transaction sequence number
    pub sequence: u32,
    /// XRP balance in drops
    pub balance_drops: u64,
}

/// One side of a `book_offers` request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookSide {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl BookSide {
    /// The native-XRP side of a book.
    pub fn xrp() -> Self {
        Self {
            currency: "XRP".to_string(),
            issuer: None,
        }
    }

    /// An issued-token side of a book.
    pub fn issued(currency: &str, issuer: &str) -> Self {
        Self {
            currency: currency.to_string(),
            issuer: Some(issuer.to_string()),
        }
    }
}

/// XRP Ledger client.
pub struct LedgerClient {
    http: reqwest::Client,
    rpc_url: String,
    faucet_url: Option<String>,
    network: NetworkConfig,
}

impl LedgerClient {
    /// Create a client against explicit endpoints.
    pub fn new(rpc_url: String, faucet_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url,
            faucet_url,
            network: XRPL_TESTNET,
        }
    }

    /// Create a client for the public XRPL testnet.
    pub fn testnet() -> Self {
        Self::new(
            XRPL_TESTNET.rpc_url.to_string(),
            XRPL_TESTNET.faucet_url.map(str::to_string),
        )
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Issue one JSON-RPC request and unwrap the `result` envelope.
    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let body = json!({ "method": method, "params": [params] });

        let response = self.http.post(&self.rpc_url).json(&body).send().await?;
        let envelope: Value = response.json().await?;

        let result = envelope
            .get("result")
            .cloned()
            .ok_or_else(|| rpc_error(method, "malformed response: no result"))?;

        if let Some(error) = result.get("error").and_then(Value::as_str) {
            let message = result
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or(error);
            return Err(rpc_error(method, format!("{error}: {message}")));
        }

        Ok(result)
    }

    /// Account sequence and XRP balance from the validated ledger.
    pub async fn account_info(&self, address: &str) -> Result<AccountInfo, LedgerError> {
        let result = self
            .request(
                "account_info",
                json!({ "account": address, "ledger_index": "validated" }),
            )
            .await?;

        let data = &result["account_data"];
        let sequence = data["Sequence"]
            .as_u64()
            .ok_or_else(|| rpc_error("account_info", "missing Sequence"))?
            as u32;
        let balance_drops = data["Balance"]
            .as_str()
            .and_then(|b| b.parse().ok())
            .ok_or_else(|| rpc_error("account_info", "missing Balance"))?;

        Ok(AccountInfo {
            sequence,
            balance_drops,
        })
    }

    /// Trust lines of an account, optionally restricted to one counterparty.
    pub async fn account_lines(
        &self,
        address: &str,
        peer: Option<&str>,
    ) -> Result<Vec<TrustLine>, LedgerError> {
        let mut params = json!({ "account": address, "ledger_index": "validated" });
        if let Some(peer) = peer {
            params["peer"] = json!(peer);
        }

        let result = self.request("account_lines", params).await?;
        let lines = result
            .get("lines")
            .cloned()
            .unwrap_or_else(|| json!([]));

        serde_json::from_value(lines)
            .map_err(|e| rpc_error("account_lines", format!("bad lines payload: {e}")))
    }

    /// Raw order book between two currencies.
    pub async fn book_offers(
        &self,
        taker_gets: &BookSide,
        taker_pays: &BookSide,
        limit: u32,
    ) -> Result<Value, LedgerError> {
        self.request(
            "book_offers",
            json!({
                "taker_gets": taker_gets,
                "taker_pays": taker_pays,
                "limit": limit,
                "ledger_index": "validated",
            }),
        )
        .await
    }

    /// Open-ledger fee in drops, clamped to a sane range.
    pub async fn open_ledger_fee(&self) -> Result<u64, LedgerError> {
        let result = self.request("fee", json!({})).await?;
        let drops = result["drops"]["open_ledger_fee"]
            .as_str()
            .and_then(|d| d.parse().ok())
            .unwrap_or(MIN_FEE_DROPS);
        Ok(clamp_fee(drops))
    }

    /// Index of the current open ledger.
    pub async fn current_ledger_index(&self) -> Result<u32, LedgerError> {
        let result = self.request("ledger_current", json!({})).await?;
        result["ledger_current_index"]
            .as_u64()
            .map(|i| i as u32)
            .ok_or_else(|| rpc_error("ledger_current", "missing ledger_current_index"))
    }

    /// Fill in fee, sequence and the last-ledger cutoff.
    pub async fn autofill(&self, tx: &mut Transaction) -> Result<(), LedgerError> {
        if tx.fee_drops.is_none() {
            tx.fee_drops = Some(self.open_ledger_fee().await?);
        }
        if tx.sequence.is_none() {
            tx.sequence = Some(self.account_info(&tx.account).await?.sequence);
        }
        if tx.last_ledger_sequence.is_none() {
            let current = self.current_ledger_index().await?;
            tx.last_ledger_sequence = Some(current + LAST_LEDGER_OFFSET);
        }
        Ok(())
    }

    /// Submit a signed transaction blob; returns the preliminary result code.
    pub async fn submit(&self, tx_blob_hex: &str) -> Result<String, LedgerError> {
        let result = self
            .request("submit", json!({ "tx_blob": tx_blob_hex }))
            .await?;
        result["engine_result"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| rpc_error("submit", "missing engine_result"))
    }

    /// Look up a transaction by hash.
    pub async fn tx(&self, hash: &str) -> Result<Value, LedgerError> {
        self.request("tx", json!({ "transaction": hash, "binary": false }))
            .await
    }

    /// Autofill, sign, submit, then poll until the transaction is validated
    /// or its `LastLedgerSequence` has passed.
    pub async fn submit_and_wait(
        &self,
        wallet: &Wallet,
        mut tx: Transaction,
    ) -> Result<TxOutcome, LedgerError> {
        self.autofill(&mut tx).await?;

        let payload = tx.signing_payload(wallet.public_key())?;
        let signature = wallet.sign(&payload)?;
        let blob = tx.signed_blob(wallet.public_key(), &signature)?;
        let hash = codec::tx_hash(&blob);

        let engine_result = self.submit(&hex::encode_upper(&blob)).await?;
        tracing::debug!(
            tx_type = tx.type_name(),
            hash = %hash,
            engine_result = %engine_result,
            "submitted transaction"
        );

        // Malformed-class results never enter a ledger; stop waiting.
        if engine_result.starts_with("tem") {
            return Ok(TxOutcome {
                hash,
                result_code: engine_result,
                validated: false,
                raw: Value::Null,
            });
        }

        let cutoff = tx.last_ledger_sequence.unwrap_or(u32::MAX);
        loop {
            tokio::time::sleep(VALIDATION_POLL_INTERVAL).await;

            match self.tx(&hash).await {
                Ok(record) => {
                    if record["validated"].as_bool().unwrap_or(false) {
                        let code = final_result_code(&record)
                            .unwrap_or_else(|| engine_result.clone());
                        return Ok(TxOutcome {
                            hash,
                            result_code: code,
                            validated: true,
                            raw: record,
                        });
                    }
                }
                // Not found yet is normal while the ledger catches up.
                Err(LedgerError::Rpc { .. }) => {}
                Err(other) => return Err(other),
            }

            if self.current_ledger_index().await? > cutoff {
                return Ok(TxOutcome {
                    hash,
                    result_code: engine_result,
                    validated: false,
                    raw: Value::Null,
                });
            }
        }
    }

    /// Ask the faucet for a funded wallet.
    pub async fn fund_wallet(&self) -> Result<Wallet, LedgerError> {
        let faucet_url = self
            .faucet_url
            .as_ref()
            .ok_or_else(|| LedgerError::Faucet("no faucet on this network".to_string()))?;

        let response = self.http.post(faucet_url).json(&json!({})).send().await?;
        let body: Value = response.json().await?;

        let seed = faucet_seed(&body)
            .ok_or_else(|| LedgerError::Faucet("response carries no wallet seed".to_string()))?;
        Wallet::from_seed(seed)
    }

    /// Poll until a freshly funded account shows up in a validated ledger.
    pub async fn wait_for_activation(&self, address: &str) -> Result<(), LedgerError> {
        for _ in 0..ACTIVATION_RETRIES {
            if let Ok(info) = self.account_info(address).await {
                if info.balance_drops > 0 {
                    return Ok(());
                }
            }
            tokio::time::sleep(ACTIVATION_POLL_INTERVAL).await;
        }
        Err(LedgerError::ActivationTimeout(address.to_string()))
    }
}

fn rpc_error(method: &str, message: impl Into<String>) -> LedgerError {
    LedgerError::Rpc {
        method: method.to_string(),
        message: message.into(),
    }
}

fn clamp_fee(drops: u64) -> u64 {
    drops.clamp(MIN_FEE_DROPS, MAX_FEE_DROPS)
}

/// The authoritative result code of a validated transaction lives in the
/// metadata; fall back to nothing if the node omitted it.
fn final_result_code(record: &Value) -> Option<String> {
    record["meta"]["TransactionResult"]
        .as_str()
        .map(str::to_string)
}

/// The faucet has shipped both `{"account": {"secret": ...}}` and
/// `{"seed": ...}` shapes; accept either.
fn faucet_seed(body: &Value) -> Option<&str> {
    let account = body.get("account").unwrap_or(body);
    account
        .get("seed")
        .or_else(|| account.get("secret"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_clamping() {
        assert_eq!(clamp_fee(0), MIN_FEE_DROPS);
        assert_eq!(clamp_fee(12), 12);
        assert_eq!(clamp_fee(1_000_000), MAX_FEE_DROPS);
    }

    #[test]
    fn faucet_seed_accepts_both_shapes() {
        let nested = json!({ "account": { "address": "rX", "secret": "sEdSECRET" } });
        assert_eq!(faucet_seed(&nested), Some("sEdSECRET"));

        let nested_seed = json!({ "account": { "address": "rX", "seed": "sEdSEED" } });
        assert_eq!(faucet_seed(&nested_seed), Some("sEdSEED"));

        let flat = json!({ "seed": "sEdFLAT" });
        assert_eq!(faucet_seed(&flat), Some("sEdFLAT"));

        let empty = json!({});
        assert_eq!(faucet_seed(&empty), None);
    }

    #[test]
    fn final_result_code_reads_meta() {
        let record = json!({ "meta": { "TransactionResult": "tesSUCCESS" }, "validated": true });
        assert_eq!(final_result_code(&record), Some("tesSUCCESS".to_string()));

        let no_meta = json!({ "validated": false });
        assert_eq!(final_result_code(&no_meta), None);
    }

    #[test]
    fn book_side_serialization() {
        let xrp = serde_json::to_value(BookSide::xrp()).unwrap();
        assert_eq!(xrp, json!({ "currency": "XRP" }));

        let issued = serde_json::to_value(BookSide::issued("TKA", "rISSUER")).unwrap();
        assert_eq!(issued, json!({ "currency": "TKA", "issuer": "rISSUER" }));
    }
}
