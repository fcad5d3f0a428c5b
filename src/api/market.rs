// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Market flows between issuers and investors.
//!
//! An issuer holds other issuers' tokens on authorized trust lines; investors
//! buy either the original token (issued straight from the original issuer)
//! or a wrapped representation minted by their own issuer. Both purchases are
//! paid in XRP to the selling issuer before the tokens are issued.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    ledger::{ops, Amount, LedgerError, Transaction, TxKind, Wallet},
    state::AppState,
    storage::{
        self, CurrencyRepository, InvestorRepository, IssuerRepository, WrappedTokenRepository,
    },
};

/// Query parameters for the holdings listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct HoldingsQuery {
    /// Issuer wallet whose cross-issuer holdings to list
    pub issuer_address: String,
}

/// One cross-issuer holding with its still-available amount.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoldingResponse {
    /// The original issuer's address
    pub account: String,
    /// Currency code
    pub currency: String,
    /// Trust-line balance
    pub balance: String,
    /// Trust limit
    pub limit: String,
    /// Amount still available for wrapping or resale
    pub available: f64,
}

/// Request to buy tokens on the market.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    /// Buying investor's address
    pub buyer_address: String,
    /// Token quantity to buy
    pub quantity: f64,
    /// Currency code
    pub currency: String,
    /// The issuer that originally minted the token
    pub original_issuer: String,
    /// The issuer selling (and, for wraps, minting) on this market
    pub admin_address: String,
    /// XRP price per token
    pub price_per_token: f64,
}

/// Result wrapper around the validated transaction record.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseResponse {
    /// Raw validated transaction record from the ledger
    pub result: Value,
}

/// List an issuer's holdings of other issuers' tokens.
#[utoipa::path(
    get,
    path = "/v1/market/holdings",
    tag = "Market",
    params(HoldingsQuery),
    responses(
        (status = 200, description = "Cross-issuer holdings", body = [HoldingResponse]),
        (status = 404, description = "Unknown issuer or setup has not run"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn list_holdings(
    State(state): State<AppState>,
    Query(query): Query<HoldingsQuery>,
) -> Result<Json<Vec<HoldingResponse>>, ApiError> {
    if query.issuer_address.is_empty() {
        return Err(ApiError::bad_request("issuer_address parameter required"));
    }

    storage::load_state(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("state_not_found"))?;

    let issuer_repo = IssuerRepository::new(&state.pool);
    let issuer = issuer_repo
        .find_by_address(&query.issuer_address)
        .await?
        .ok_or_else(|| ApiError::not_found("admin_not_found"))?;
    let other_issuers = issuer_repo.list_except(&query.issuer_address).await?;

    let currencies = CurrencyRepository::new(&state.pool).list().await?;
    let other_codes: Vec<&str> = currencies
        .iter()
        .filter(|currency| currency.issuer_id != issuer.id)
        .map(|currency| currency.code.as_str())
        .collect();

    let lines = state
        .ledger
        .account_lines(&query.issuer_address, None)
        .await?;

    let mut holdings = Vec::new();
    for line in lines {
        let from_other_issuer = other_issuers
            .iter()
            .any(|other| other.address == line.account);
        if !from_other_issuer || !other_codes.contains(&line.currency.as_str()) {
            continue;
        }

        let available = ops::available_balance(
            &state.ledger,
            &query.issuer_address,
            &line.currency,
            &line.account,
        )
        .await?
        .unwrap_or(0.0);

        holdings.push(HoldingResponse {
            account: line.account,
            currency: line.currency,
            balance: line.balance,
            limit: line.limit,
            available,
        });
    }

    Ok(Json(holdings))
}

/// Buy original tokens: pay the selling issuer in XRP, then receive the
/// tokens straight from their original issuer.
#[utoipa::path(
    post,
    path = "/v1/market/mint",
    tag = "Market",
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Tokens issued to the buyer", body = PurchaseResponse),
        (status = 400, description = "Missing parameters, nothing available, or a failed transaction"),
        (status = 404, description = "Unknown buyer or issuer"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn mint_tokens(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError> {
    validate_purchase(&request)?;

    let available = ops::available_balance(
        &state.ledger,
        &request.admin_address,
        &request.currency,
        &request.original_issuer,
    )
    .await?
    .ok_or_else(|| ApiError::bad_request("not_available"))?;

    if available.abs() < request.quantity {
        return Err(ApiError::bad_request("not_enough_available"));
    }

    let issuer = IssuerRepository::new(&state.pool)
        .find_by_address(&request.original_issuer)
        .await?
        .ok_or_else(|| ApiError::not_found("issuer_not_found"))?;
    let issuer_wallet = Wallet::from_seed(&issuer.secret)?;

    let buyer = InvestorRepository::new(&state.pool)
        .find_by_address(&request.buyer_address)
        .await?
        .ok_or_else(|| ApiError::not_found("buyer_not_found"))?;
    let buyer_wallet = Wallet::from_seed(&buyer.secret)?;

    pay_in_xrp(&state, &buyer_wallet, &request, "failed_to_mint").await?;

    let outcome = ops::issue_tokens(
        &state.ledger,
        &issuer_wallet,
        &request.buyer_address,
        &request.currency,
        &format_quantity(request.quantity),
    )
    .await
    .map_err(mint_failure)?;
    tokio::time::sleep(ops::INVESTOR_STEP_DELAY).await;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            result: outcome.raw,
        }),
    ))
}

/// Buy wrapped tokens: pay the wrapping issuer in XRP, receive its wrapped
/// representation, and record the wrap.
#[utoipa::path(
    post,
    path = "/v1/market/wrapped",
    tag = "Market",
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Wrapped tokens issued to the buyer", body = PurchaseResponse),
        (status = 400, description = "Missing parameters, nothing available, or a failed transaction"),
        (status = 404, description = "Unknown buyer, issuer, currency or trust line"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn buy_wrapped_tokens(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError> {
    validate_purchase(&request)?;

    let available = ops::available_balance(
        &state.ledger,
        &request.admin_address,
        &request.currency,
        &request.original_issuer,
    )
    .await?
    .ok_or_else(|| ApiError::bad_request("not_available"))?;

    if available < request.quantity {
        return Err(ApiError::bad_request("not_enough_available"));
    }

    let buyer = InvestorRepository::new(&state.pool)
        .find_by_address(&request.buyer_address)
        .await?
        .ok_or_else(|| ApiError::not_found("buyer_not_found"))?;
    let buyer_wallet = Wallet::from_seed(&buyer.secret)?;

    let issuer_repo = IssuerRepository::new(&state.pool);
    let admin = issuer_repo
        .find_by_address(&request.admin_address)
        .await?
        .ok_or_else(|| ApiError::not_found("admin_not_found"))?;
    let original = issuer_repo
        .find_by_address(&request.original_issuer)
        .await?
        .ok_or_else(|| ApiError::not_found("issuer_not_found"))?;

    let currency = CurrencyRepository::new(&state.pool)
        .find(&request.currency, original.id)
        .await?
        .ok_or_else(|| ApiError::not_found("currency_not_found"))?;

    // The wrapping issuer mints; the buyer needs a line to it first.
    let admin_wallet = Wallet::from_seed(&admin.secret)?;
    let lines = state
        .ledger
        .account_lines(buyer_wallet.address(), None)
        .await?;
    let has_line = lines
        .iter()
        .any(|line| line.currency == request.currency && line.account == admin_wallet.address());
    if !has_line {
        return Err(ApiError::not_found("trustline_not_found"));
    }

    pay_in_xrp(&state, &buyer_wallet, &request, "failed_to_buy").await?;

    let outcome = ops::issue_tokens(
        &state.ledger,
        &admin_wallet,
        buyer_wallet.address(),
        &request.currency,
        &format_quantity(request.quantity),
    )
    .await
    .map_err(|e| match e {
        LedgerError::TransactionFailed { code, .. } => {
            ApiError::bad_request(format!("failed_to_buy: {code}"))
        }
        other => other.into(),
    })?;

    WrappedTokenRepository::new(&state.pool)
        .insert(currency.id, &request.currency, admin.id)
        .await?;

    tracing::info!(
        buyer = %buyer.name,
        currency = %request.currency,
        quantity = request.quantity,
        wrapping_issuer = %admin.name,
        "issued wrapped tokens"
    );

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            result: outcome.raw,
        }),
    ))
}

fn validate_purchase(request: &PurchaseRequest) -> Result<(), ApiError> {
    if request.buyer_address.is_empty()
        || request.currency.is_empty()
        || request.original_issuer.is_empty()
        || request.admin_address.is_empty()
        || request.quantity <= 0.0
    {
        return Err(ApiError::bad_request("missing_parameters"));
    }
    Ok(())
}

/// XRP payment from the buyer to the selling issuer, priced per token.
async fn pay_in_xrp(
    state: &AppState,
    buyer_wallet: &Wallet,
    request: &PurchaseRequest,
    failure_tag: &str,
) -> Result<(), ApiError> {
    let amount_xrp = request.price_per_token * request.quantity;
    let drops = (amount_xrp * 1_000_000.0).round() as u64;

    let payment = Transaction::new(
        buyer_wallet.address(),
        TxKind::Payment {
            destination: request.admin_address.clone(),
            amount: Amount::drops(drops),
        },
    );

    let outcome = state.ledger.submit_and_wait(buyer_wallet, payment).await?;
    if !outcome.succeeded() {
        return Err(ApiError::bad_request(format!(
            "{failure_tag}: {}",
            outcome.result_code
        )));
    }
    Ok(())
}

fn mint_failure(err: LedgerError) -> ApiError {
    match err {
        LedgerError::TransactionFailed { code, .. } if code == "telINSUF_FEE_P" => {
            ApiError::bad_request("insufficient_fee")
        }
        LedgerError::TransactionFailed { code, .. } => {
            ApiError::bad_request(format!("failed_to_mint: {code}"))
        }
        other => other.into(),
    }
}

/// Render a quantity the way the ledger expects decimal values: no trailing
/// `.0` on whole numbers.
fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as u64)
    } else {
        format!("{quantity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_render_without_trailing_zero() {
        assert_eq!(format_quantity(2500.0), "2500");
        assert_eq!(format_quantity(0.5), "0.5");
        assert_eq!(format_quantity(1.25), "1.25");
    }

    #[test]
    fn purchase_validation() {
        let valid = PurchaseRequest {
            buyer_address: "rBUYER".to_string(),
            quantity: 10.0,
            currency: "TKA".to_string(),
            original_issuer: "rORIG".to_string(),
            admin_address: "rADMIN".to_string(),
            price_per_token: 0.5,
        };
        assert!(validate_purchase(&valid).is_ok());

        let mut missing = valid.clone();
        missing.currency = String::new();
        assert!(validate_purchase(&missing).is_err());

        let mut zero = valid;
        zero.quantity = 0.0;
        assert!(validate_purchase(&zero).is_err());
    }
}
