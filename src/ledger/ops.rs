// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Multi-step trust-line and issuance choreography.
//!
//! Ordering between dependent submissions is enforced by fixed pauses, not by
//! any acknowledgment protocol. That fragility is inherited from the flow this
//! service reproduces and is deliberately left as-is.

use std::time::Duration;

use super::client::LedgerClient;
use super::codec::{Transaction, TxKind};
use super::keys::Wallet;
use super::types::{Amount, IssuedAmount, TxOutcome, TF_CLEAR_NO_RIPPLE, TF_SETF_AUTH};
use super::LedgerError;

/// Pause between dependent transaction submissions.
pub const INTER_TX_DELAY: Duration = Duration::from_millis(200);

/// Longer pause used between per-investor setup steps.
pub const INVESTOR_STEP_DELAY: Duration = Duration::from_millis(500);

/// Submit a transaction and fail unless it validated with `tesSUCCESS`.
pub async fn submit_tx(
    client: &LedgerClient,
    wallet: &Wallet,
    tx: Transaction,
) -> Result<TxOutcome, LedgerError> {
    let tx_type = tx.type_name();
    let outcome = client.submit_and_wait(wallet, tx).await?;
    if !outcome.succeeded() {
        return Err(LedgerError::TransactionFailed {
            code: outcome.result_code,
            tx_type: tx_type.to_string(),
        });
    }
    Ok(outcome)
}

/// Open an authorized trust line from `holder` to `issuer`.
///
/// Three steps: the holder sets the line with its limit, the holder clears
/// No Ripple on its side, and the issuer authorizes the holder (limit 0 with
/// `tfSetfAuth`). Issuers run with RequireAuth, so the third step is what
/// actually lets tokens move.
pub async fn set_trust_line(
    client: &LedgerClient,
    holder: &Wallet,
    issuer: &Wallet,
    currency: &str,
    limit: &str,
) -> Result<(), LedgerError> {
    let limit_amount = IssuedAmount {
        currency: currency.to_string(),
        issuer: issuer.address().to_string(),
        value: limit.to_string(),
    };

    submit_tx(
        client,
        holder,
        Transaction::new(
            holder.address(),
            TxKind::TrustSet {
                limit: limit_amount.clone(),
            },
        ),
    )
    .await?;

    tokio::time::sleep(INTER_TX_DELAY).await;

    submit_tx(
        client,
        holder,
        Transaction::new(
            holder.address(),
            TxKind::TrustSet {
                limit: limit_amount,
            },
        )
        .with_flags(TF_CLEAR_NO_RIPPLE),
    )
    .await?;

    tokio::time::sleep(INTER_TX_DELAY).await;

    submit_tx(
        client,
        issuer,
        Transaction::new(
            issuer.address(),
            TxKind::TrustSet {
                limit: IssuedAmount {
                    currency: currency.to_string(),
                    issuer: holder.address().to_string(),
                    value: "0".to_string(),
                },
            },
        )
        .with_flags(TF_SETF_AUTH),
    )
    .await?;

    Ok(())
}

/// Issue `value` units of `currency` from the issuer to `destination`.
pub async fn issue_tokens(
    client: &LedgerClient,
    issuer: &Wallet,
    destination: &str,
    currency: &str,
    value: &str,
) -> Result<TxOutcome, LedgerError> {
    submit_tx(
        client,
        issuer,
        Transaction::new(
            issuer.address(),
            TxKind::Payment {
                destination: destination.to_string(),
                amount: Amount::issued(currency, issuer.address(), value),
            },
        ),
    )
    .await
}

/// Balance a holder carries of `currency` on its trust line to `issuer`.
///
/// Returns `None` when no such line exists. The sign follows the ledger's
/// holder-side perspective; callers that only care about magnitude take the
/// absolute value.
pub async fn available_balance(
    client: &LedgerClient,
    holder_address: &str,
    currency: &str,
    issuer_address: &str,
) -> Result<Option<f64>, LedgerError> {
    let lines = client
        .account_lines(holder_address, Some(issuer_address))
        .await?;

    Ok(lines
        .iter()
        .find(|line| line.currency == currency && line.account == issuer_address)
        .and_then(|line| line.balance.parse::<f64>().ok()))
}
