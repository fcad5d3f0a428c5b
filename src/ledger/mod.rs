// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! XRP Ledger testnet integration.
//!
//! Public ledger nodes do not sign on the caller's behalf, so this module
//! carries the full client path: seed handling and signing (`keys`), the
//! canonical transaction serialization (`codec`), the address codec
//! (`address`), the JSON-RPC/faucet client (`client`), and the multi-step
//! trust-line and issuance choreography (`ops`).

pub mod address;
pub mod client;
pub mod codec;
pub mod keys;
pub mod ops;
pub mod types;

pub use client::{AccountInfo, LedgerClient};
pub use codec::{Transaction, TxKind};
pub use keys::Wallet;
pub use types::{
    ensure_testnet_network, Amount, IssuedAmount, TrustLine, TxOutcome, XRPL_TESTNET,
};

/// Errors from ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid or unsupported seed")]
    InvalidSeed,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Serialization error: {0}")]
    Codec(String),

    #[error("RPC error from `{method}`: {message}")]
    Rpc { method: String, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Faucet error: {0}")]
    Faucet(String),

    #[error("Transaction failed: {code} for {tx_type}")]
    TransactionFailed { code: String, tx_type: String },

    #[error("Timeout waiting account activation: {0}")]
    ActivationTimeout(String),
}
