// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Trust-line creation.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::{ops, Wallet},
    state::AppState,
    storage::{InvestorRepository, IssuerRepository},
};

use super::wallets::DEFAULT_TRUST_LIMIT;

/// Request to open a trust line from a stored investor wallet to an issuer.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTrustLineRequest {
    /// Investor wallet address
    pub wallet_address: String,
    /// Currency code
    pub currency: String,
    /// Issuer wallet address
    pub issuer: String,
    /// Trust limit; defaults to 1000000
    pub limit: Option<String>,
}

/// Trust-line creation outcome.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrustLineStatusResponse {
    /// "created" or "exists"
    pub status: String,
}

/// Open an authorized trust line from an investor to an issuer.
///
/// Idempotent: if the line already exists, reports `exists` without touching
/// the ledger again.
#[utoipa::path(
    post,
    path = "/v1/trustlines",
    tag = "TrustLines",
    request_body = CreateTrustLineRequest,
    responses(
        (status = 201, description = "Trust line created", body = TrustLineStatusResponse),
        (status = 200, description = "Trust line already exists", body = TrustLineStatusResponse),
        (status = 400, description = "Missing parameters or wallet mismatch"),
        (status = 404, description = "Unknown issuer or investor"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn create_trust_line(
    State(state): State<AppState>,
    Json(request): Json<CreateTrustLineRequest>,
) -> Result<(StatusCode, Json<TrustLineStatusResponse>), ApiError> {
    if request.wallet_address.is_empty() || request.currency.is_empty() || request.issuer.is_empty()
    {
        return Err(ApiError::bad_request("missing_parameters"));
    }
    let limit = request.limit.as_deref().unwrap_or(DEFAULT_TRUST_LIMIT);

    let issuer = IssuerRepository::new(&state.pool)
        .find_by_address(&request.issuer)
        .await?
        .ok_or_else(|| ApiError::not_found("admin_not_found"))?;

    let investor = InvestorRepository::new(&state.pool)
        .find_by_address(&request.wallet_address)
        .await?
        .ok_or_else(|| ApiError::not_found("investor_not_found"))?;

    let investor_wallet = Wallet::from_seed(&investor.secret)?;
    if investor_wallet.address() != investor.address {
        return Err(ApiError::bad_request("wallet_mismatch"));
    }

    // Idempotency check against the validated ledger.
    let existing = state
        .ledger
        .account_lines(investor_wallet.address(), Some(&request.issuer))
        .await?;
    let has_line = existing
        .iter()
        .any(|line| line.currency == request.currency && line.account == request.issuer);
    if has_line {
        return Ok((
            StatusCode::OK,
            Json(TrustLineStatusResponse {
                status: "exists".to_string(),
            }),
        ));
    }

    let issuer_wallet = Wallet::from_seed(&issuer.secret)?;
    ops::set_trust_line(
        &state.ledger,
        &investor_wallet,
        &issuer_wallet,
        &request.currency,
        limit,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TrustLineStatusResponse {
            status: "created".to_string(),
        }),
    ))
}
