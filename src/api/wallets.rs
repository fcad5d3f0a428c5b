// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Investor wallet creation.
//!
//! New wallets are funded by the testnet faucet, optionally wired to the
//! first issuer with authorized trust lines, and persisted for later flows.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::{ops, Wallet},
    state::AppState,
    storage::{models::Investor, InvestorRepository, IssuerRepository},
};

/// Default trust-line limit for newly opened lines.
pub const DEFAULT_TRUST_LIMIT: &str = "1000000";

/// Request to create a new investor wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// Display name for the investor.
    pub name: String,
    /// Currency codes to open trust lines for, against the first issuer.
    #[serde(default)]
    pub trust_lines: Vec<String>,
}

/// Response after creating a wallet.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateWalletResponse {
    /// The created investor profile.
    pub investor: Investor,
    /// Message indicating success.
    pub message: String,
}

/// Create a new investor wallet via the testnet faucet.
#[utoipa::path(
    post,
    path = "/v1/wallets",
    tag = "Wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created successfully", body = CreateWalletResponse),
        (status = 400, description = "Missing name"),
        (status = 404, description = "No issuer to attach the wallet to"),
        (status = 503, description = "Ledger or faucet unavailable")
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<CreateWalletResponse>), ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name_required"));
    }

    let issuer = IssuerRepository::new(&state.pool)
        .first()
        .await?
        .ok_or_else(|| ApiError::not_found("admin_not_found"))?;
    let issuer_wallet = Wallet::from_seed(&issuer.secret)?;

    let new_wallet = state.ledger.fund_wallet().await?;
    state.ledger.wait_for_activation(new_wallet.address()).await?;

    for currency in &request.trust_lines {
        ops::set_trust_line(
            &state.ledger,
            &new_wallet,
            &issuer_wallet,
            currency,
            DEFAULT_TRUST_LIMIT,
        )
        .await?;
        tokio::time::sleep(ops::INVESTOR_STEP_DELAY).await;
    }

    let investor = InvestorRepository::new(&state.pool)
        .insert(name, new_wallet.address(), new_wallet.seed(), issuer.id)
        .await?;

    tracing::info!(
        investor = %investor.name,
        address = %investor.address,
        trust_lines = request.trust_lines.len(),
        "created investor wallet"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateWalletResponse {
            investor,
            message: "Wallet created successfully".to_string(),
        }),
    ))
}
