// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! One-shot environment setup.
//!
//! Builds the whole demo world on the testnet: issuer and investor wallets
//! from the faucet, issuer account flags, bilateral authorized trust lines,
//! cross-issuance between issuers, investor allocations, and the initial
//! wrapped-token grants. Everything is then persisted so the other endpoints
//! can drive it. Re-running returns the existing state untouched.

use axum::{extract::State, Json};
use uuid::Uuid;

use crate::{
    error::ApiError,
    ledger::{
        ops,
        types::{ASF_DEFAULT_RIPPLE, ASF_REQUIRE_AUTH},
        Transaction, TxKind, Wallet,
    },
    state::AppState,
    storage::{
        self, CurrencyRepository, DashboardState, InvestorRepository, IssuerRepository,
        WrappedTokenRepository,
    },
};

use super::wallets::DEFAULT_TRUST_LIMIT;

/// How many issuers the demo environment creates.
const ISSUER_COUNT: usize = 2;
/// Investors funded per issuer.
const INVESTORS_PER_ISSUER: usize = 2;
/// Tokens each issuer grants every other issuer during setup.
const CROSS_ISSUANCE: u64 = 5_000;
/// Share of the cross-issued balance granted as wrapped tokens.
const WRAPPED_SHARE: u64 = 2;

/// Create the full demo environment. Idempotent: if state already exists it
/// is returned as-is.
#[utoipa::path(
    post,
    path = "/v1/setup",
    tag = "Setup",
    responses(
        (status = 200, description = "Environment ready", body = DashboardState),
        (status = 503, description = "Ledger, faucet or database unavailable")
    )
)]
pub async fn run_setup(
    State(state): State<AppState>,
) -> Result<Json<DashboardState>, ApiError> {
    if let Some(existing) = storage::load_state(&state.pool).await? {
        tracing::info!("setup already ran; returning existing state");
        return Ok(Json(existing));
    }

    tracing::info!("setting up demo environment on the testnet");
    let ledger = &state.ledger;

    // Fund issuer wallets and wait until each shows up in a validated ledger.
    let mut issuer_wallets: Vec<Wallet> = Vec::with_capacity(ISSUER_COUNT);
    for index in 0..ISSUER_COUNT {
        let wallet = ledger.fund_wallet().await?;
        ledger.wait_for_activation(wallet.address()).await?;
        tracing::info!(issuer = index, address = %wallet.address(), "issuer wallet funded");
        issuer_wallets.push(wallet);
    }

    // Fund investors per issuer.
    let mut investor_wallets: Vec<Vec<Wallet>> = Vec::with_capacity(ISSUER_COUNT);
    for (index, _) in issuer_wallets.iter().enumerate() {
        let mut investors = Vec::with_capacity(INVESTORS_PER_ISSUER);
        for _ in 0..INVESTORS_PER_ISSUER {
            let wallet = ledger.fund_wallet().await?;
            ledger.wait_for_activation(wallet.address()).await?;
            tracing::info!(issuer = index, address = %wallet.address(), "investor wallet funded");
            investors.push(wallet);
        }
        investor_wallets.push(investors);
    }

    // Issuer account flags: rippling on, incoming trust lines need auth.
    for wallet in &issuer_wallets {
        for flag in [ASF_DEFAULT_RIPPLE, ASF_REQUIRE_AUTH] {
            ops::submit_tx(
                ledger,
                wallet,
                Transaction::new(wallet.address(), TxKind::AccountSet { set_flag: flag }),
            )
            .await?;
            tokio::time::sleep(ops::INTER_TX_DELAY).await;
        }
        tracing::info!(address = %wallet.address(), "issuer account flags set");
    }

    // One token per issuer: TKA, TKB, ...
    let codes: Vec<Vec<String>> = (0..ISSUER_COUNT)
        .map(|index| vec![format!("TK{}", index_to_letters(index))])
        .collect();

    // Bilateral trust lines between issuers, then cross-issuance.
    for (index, issuer) in issuer_wallets.iter().enumerate() {
        for (other_index, other) in issuer_wallets.iter().enumerate() {
            if index == other_index {
                continue;
            }
            for code in &codes[other_index] {
                ops::set_trust_line(ledger, issuer, other, code, DEFAULT_TRUST_LIMIT).await?;
                tokio::time::sleep(ops::INTER_TX_DELAY).await;
            }
        }
    }
    tracing::info!("issuer trust lines created");

    for (index, issuer) in issuer_wallets.iter().enumerate() {
        for (other_index, other) in issuer_wallets.iter().enumerate() {
            if index == other_index {
                continue;
            }
            for code in &codes[other_index] {
                ops::issue_tokens(
                    ledger,
                    other,
                    issuer.address(),
                    code,
                    &CROSS_ISSUANCE.to_string(),
                )
                .await?;
                tokio::time::sleep(ops::INTER_TX_DELAY).await;
            }
        }
    }
    tracing::info!("cross-issuance between issuers done");

    // Investor trust lines and initial allocations: 1000, 2000, ...
    for (index, issuer) in issuer_wallets.iter().enumerate() {
        for (investor_index, investor) in investor_wallets[index].iter().enumerate() {
            let base = (investor_index as u64 + 1) * 1_000;
            for code in &codes[index] {
                ops::set_trust_line(ledger, investor, issuer, code, DEFAULT_TRUST_LIMIT).await?;
                tokio::time::sleep(ops::INVESTOR_STEP_DELAY).await;

                ops::issue_tokens(ledger, issuer, investor.address(), code, &base.to_string())
                    .await?;
                tokio::time::sleep(ops::INVESTOR_STEP_DELAY).await;
            }
        }
        tracing::info!(issuer = index, "investor allocations done");
    }

    // Persist issuers, currencies and investors.
    let issuer_repo = IssuerRepository::new(&state.pool);
    let currency_repo = CurrencyRepository::new(&state.pool);
    let investor_repo = InvestorRepository::new(&state.pool);

    let mut issuer_ids: Vec<Uuid> = Vec::with_capacity(ISSUER_COUNT);
    let mut currency_ids: Vec<Vec<Uuid>> = Vec::with_capacity(ISSUER_COUNT);
    let mut investor_number = 1usize;

    for (index, wallet) in issuer_wallets.iter().enumerate() {
        let name = index_to_letters(index);
        let issuer = issuer_repo
            .insert(
                &name,
                &format!("Admin-{name}"),
                wallet.address(),
                wallet.seed(),
            )
            .await?;
        issuer_ids.push(issuer.id);

        let mut ids = Vec::new();
        for code in &codes[index] {
            let currency = currency_repo.insert(code, issuer.id).await?;
            ids.push(currency.id);
        }
        currency_ids.push(ids);

        for investor in &investor_wallets[index] {
            investor_repo
                .insert(
                    &format!("Investor-{investor_number}"),
                    investor.address(),
                    investor.seed(),
                    issuer.id,
                )
                .await?;
            investor_number += 1;
        }
    }
    tracing::info!("issuers, currencies and investors persisted");

    // Wrapped-token grants: each issuer wraps the other issuers' tokens for
    // its investors. The first investor of each issuer is left out so the
    // dashboard has both cases to show.
    let wrapped_repo = WrappedTokenRepository::new(&state.pool);
    let wrapped_amount = CROSS_ISSUANCE / WRAPPED_SHARE;

    for (index, issuer) in issuer_wallets.iter().enumerate() {
        for (other_index, _) in issuer_wallets.iter().enumerate() {
            if index == other_index {
                continue;
            }
            for (code_index, code) in codes[other_index].iter().enumerate() {
                for (investor_index, investor) in investor_wallets[index].iter().enumerate() {
                    if investor_index == 0 {
                        continue;
                    }
                    ops::set_trust_line(ledger, investor, issuer, code, DEFAULT_TRUST_LIMIT)
                        .await?;
                    tokio::time::sleep(ops::INTER_TX_DELAY).await;

                    ops::issue_tokens(
                        ledger,
                        issuer,
                        investor.address(),
                        code,
                        &wrapped_amount.to_string(),
                    )
                    .await?;
                    tokio::time::sleep(ops::INTER_TX_DELAY).await;
                }

                wrapped_repo
                    .insert(
                        currency_ids[other_index][code_index],
                        code,
                        issuer_ids[index],
                    )
                    .await?;
                tracing::info!(
                    wrapping_issuer = index,
                    code = %code,
                    amount = wrapped_amount,
                    "wrapped token granted"
                );
            }
        }
    }

    let dashboard = storage::load_state(&state.pool)
        .await?
        .ok_or_else(|| ApiError::internal("Failed to load state"))?;

    tracing::info!("demo environment ready");
    Ok(Json(dashboard))
}

/// 0 -> "A", 1 -> "B", ..., 26 -> "AA".
fn index_to_letters(index: usize) -> String {
    let mut n = index as i64;
    let mut out = String::new();
    while n >= 0 {
        out.insert(0, (b'A' + (n % 26) as u8) as char);
        n = n / 26 - 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_follow_spreadsheet_naming() {
        assert_eq!(index_to_letters(0), "A");
        assert_eq!(index_to_letters(1), "B");
        assert_eq!(index_to_letters(25), "Z");
        assert_eq!(index_to_letters(26), "AA");
        assert_eq!(index_to_letters(27), "AB");
        assert_eq!(index_to_letters(51), "AZ");
        assert_eq!(index_to_letters(52), "BA");
    }
}
