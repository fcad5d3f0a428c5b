// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Balance lookups: native XRP plus the issued-token balance held against
//! whichever stored issuer carries the requested currency.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    ledger::types::{drops_to_xrp, ensure_testnet_network},
    state::AppState,
    storage::IssuerRepository,
};

/// Query parameters for a balance lookup.
#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceQuery {
    /// Account address to inspect
    pub address: String,
    /// Issued currency code to report alongside XRP
    pub currency: String,
    /// Network to query. Only "testnet" is supported.
    #[param(default = "testnet")]
    pub network: Option<String>,
}

/// Balance response.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// XRP balance as a decimal string
    pub xrp: String,
    /// Issued-token balance on the matching issuer trust line ("0" if none)
    pub iou: String,
}

/// Get the XRP and issued-token balance of an account.
#[utoipa::path(
    get,
    path = "/v1/balance",
    tag = "Balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balances retrieved", body = BalanceResponse),
        (status = 400, description = "Missing parameters"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    if query.address.is_empty() {
        return Err(ApiError::bad_request("address parameter required"));
    }
    if query.currency.is_empty() {
        return Err(ApiError::bad_request("currency parameter required"));
    }
    ensure_testnet_network(query.network.as_deref()).map_err(ApiError::bad_request)?;

    let issuers = IssuerRepository::new(&state.pool).list().await?;

    let info = state.ledger.account_info(&query.address).await?;
    let xrp = drops_to_xrp(info.balance_drops);

    let lines = state.ledger.account_lines(&query.address, None).await?;
    let iou = lines
        .iter()
        .find(|line| {
            line.currency == query.currency
                && issuers.iter().any(|issuer| issuer.address == line.account)
        })
        .map(|line| line.balance.clone())
        .unwrap_or_else(|| "0".to_string());

    Ok(Json(BalanceResponse { xrp, iou }))
}
