// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! DEX offer flow: order-book listing and offer creation.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::{
        client::BookSide,
        types::xrp_to_drops,
        Amount, IssuedAmount, Transaction, TxKind, Wallet,
    },
    state::AppState,
    storage::InvestorRepository,
};

/// Default number of offers returned from the book.
const DEFAULT_BOOK_LIMIT: u32 = 20;

/// Request for an order-book listing between two currencies.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListOffersRequest {
    /// Currency being sold ("XRP" or a token code)
    pub sell: String,
    /// Currency being bought ("XRP" or a token code)
    pub buy: String,
    /// Max offers to return; defaults to 20
    pub limit: Option<u32>,
    /// Issuer for the non-XRP side(s)
    pub issuer_address: String,
}

/// One side of an offer as submitted by the dashboard.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OfferAmount {
    /// "XRP" or a token code
    pub currency: String,
    /// Decimal value
    pub value: String,
    /// Issuer address; required for non-XRP currencies
    pub issuer: Option<String>,
}

/// Request to place an offer from a stored investor wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOfferRequest {
    /// Investor address placing the offer
    pub investor_address: String,
    /// What the taker receives (what the investor gives up)
    pub taker_gets: OfferAmount,
    /// What the taker pays (what the investor wants)
    pub taker_pays: OfferAmount,
}

/// Result wrapper around the validated transaction record.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOfferResponse {
    /// Raw validated transaction record from the ledger
    pub result: Value,
}

/// List the order book between two currencies.
#[utoipa::path(
    post,
    path = "/v1/offers",
    tag = "Offers",
    request_body = ListOffersRequest,
    responses(
        (status = 200, description = "Raw order book from the ledger"),
        (status = 400, description = "Missing parameters"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn list_offers(
    State(state): State<AppState>,
    Json(request): Json<ListOffersRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.sell.is_empty() || request.buy.is_empty() || request.issuer_address.is_empty() {
        return Err(ApiError::bad_request("missing_parameters"));
    }

    let taker_gets = book_side(&request.sell, &request.issuer_address);
    let taker_pays = book_side(&request.buy, &request.issuer_address);
    let limit = request.limit.unwrap_or(DEFAULT_BOOK_LIMIT);

    let book = state
        .ledger
        .book_offers(&taker_gets, &taker_pays, limit)
        .await?;
    Ok(Json(book))
}

/// Place a DEX offer from a stored investor wallet.
///
/// The `TakerGets` side is checked for funding first: XRP offers against the
/// account balance, token offers against the matching trust line.
#[utoipa::path(
    post,
    path = "/v1/offers/create",
    tag = "Offers",
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer submitted", body = CreateOfferResponse),
        (status = 400, description = "Missing parameters or insufficient balance"),
        (status = 404, description = "Unknown investor"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn create_offer(
    State(state): State<AppState>,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<CreateOfferResponse>), ApiError> {
    let investor = InvestorRepository::new(&state.pool)
        .find_by_address(&request.investor_address)
        .await?
        .ok_or_else(|| ApiError::not_found("investor_not_found"))?;
    let wallet = Wallet::from_seed(&investor.secret)?;

    let taker_gets = to_ledger_amount(&request.taker_gets)?;
    let taker_pays = to_ledger_amount(&request.taker_pays)?;

    check_can_fund_offer(&state, wallet.address(), &taker_gets).await?;

    let offer = Transaction::new(
        wallet.address(),
        TxKind::OfferCreate {
            taker_gets,
            taker_pays,
        },
    );

    let outcome = state.ledger.submit_and_wait(&wallet, offer).await?;
    if !outcome.succeeded() {
        return Err(ApiError::bad_request(format!(
            "failed_to_create_offer: {}",
            outcome.result_code
        )));
    }

    tracing::info!(
        investor = %investor.name,
        hash = %outcome.hash,
        "offer created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateOfferResponse {
            result: outcome.raw,
        }),
    ))
}

fn book_side(currency: &str, issuer: &str) -> BookSide {
    if currency == "XRP" {
        BookSide::xrp()
    } else {
        BookSide::issued(currency, issuer)
    }
}

/// Convert a dashboard amount into a ledger amount.
fn to_ledger_amount(amount: &OfferAmount) -> Result<Amount, ApiError> {
    if amount.currency == "XRP" {
        let drops = xrp_to_drops(&amount.value).map_err(ApiError::bad_request)?;
        Ok(Amount::drops(drops))
    } else {
        let issuer = amount
            .issuer
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("issuer required for token amounts"))?;
        Ok(Amount::Issued(IssuedAmount {
            currency: amount.currency.clone(),
            issuer: issuer.to_string(),
            value: amount.value.clone(),
        }))
    }
}

/// Verify the account can actually deliver `TakerGets` before submitting.
async fn check_can_fund_offer(
    state: &AppState,
    account: &str,
    taker_gets: &Amount,
) -> Result<(), ApiError> {
    match taker_gets {
        Amount::Drops(needed) => {
            let info = state.ledger.account_info(account).await?;
            let needed: u64 = needed
                .parse()
                .map_err(|_| ApiError::bad_request("invalid amount"))?;
            if info.balance_drops < needed {
                return Err(ApiError::bad_request(
                    "insufficient_balance: insufficient XRP for TakerGets",
                ));
            }
        }
        Amount::Issued(issued) => {
            let lines = state
                .ledger
                .account_lines(account, Some(&issued.issuer))
                .await?;
            let balance = lines
                .iter()
                .find(|line| line.currency == issued.currency)
                .and_then(|line| line.balance.parse::<f64>().ok())
                .unwrap_or(0.0);
            let needed = issued.value.parse::<f64>().unwrap_or(f64::MAX);
            if balance < needed {
                return Err(ApiError::bad_request(
                    "insufficient_balance: insufficient tokens for TakerGets",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_side_selection() {
        let xrp = book_side("XRP", "rISSUER");
        assert_eq!(xrp.currency, "XRP");
        assert!(xrp.issuer.is_none());

        let token = book_side("TKA", "rISSUER");
        assert_eq!(token.currency, "TKA");
        assert_eq!(token.issuer.as_deref(), Some("rISSUER"));
    }

    #[test]
    fn amounts_convert_per_currency() {
        let xrp = OfferAmount {
            currency: "XRP".to_string(),
            value: "1.5".to_string(),
            issuer: None,
        };
        assert_eq!(to_ledger_amount(&xrp).unwrap(), Amount::drops(1_500_000));

        let token = OfferAmount {
            currency: "TKA".to_string(),
            value: "100".to_string(),
            issuer: Some("rISSUER".to_string()),
        };
        assert_eq!(
            to_ledger_amount(&token).unwrap(),
            Amount::issued("TKA", "rISSUER", "100")
        );

        let missing_issuer = OfferAmount {
            currency: "TKA".to_string(),
            value: "100".to_string(),
            issuer: None,
        };
        assert!(to_ledger_amount(&missing_issuer).is_err());
    }
}
