// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod balance;
pub mod health;
pub mod issuers;
pub mod market;
pub mod offers;
pub mod setup;
pub mod state;
pub mod trustlines;
pub mod wallets;

pub fn router(app_state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/setup", post(setup::run_setup))
        .route("/state", get(state::get_state))
        .route("/issuers/{address}/summary", get(issuers::issuer_summary))
        .route("/wallets", post(wallets::create_wallet))
        .route("/trustlines", post(trustlines::create_trust_line))
        .route("/balance", get(balance::get_balance))
        .route("/market/holdings", get(market::list_holdings))
        .route("/market/mint", post(market::mint_tokens))
        .route("/market/wrapped", post(market::buy_wrapped_tokens))
        .route("/offers", post(offers::list_offers))
        .route("/offers/create", post(offers::create_offer));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::live))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(app_state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::live,
        setup::run_setup,
        state::get_state,
        issuers::issuer_summary,
        wallets::create_wallet,
        trustlines::create_trust_line,
        balance::get_balance,
        market::list_holdings,
        market::mint_tokens,
        market::buy_wrapped_tokens,
        offers::list_offers,
        offers::create_offer
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            crate::storage::models::DashboardState,
            crate::storage::models::Issuer,
            crate::storage::models::Investor,
            crate::storage::models::Currency,
            crate::storage::models::WrappedToken,
            crate::ledger::types::TrustLine,
            crate::ledger::types::Amount,
            crate::ledger::types::IssuedAmount,
            issuers::IssuerSummaryResponse,
            issuers::SummaryCounts,
            issuers::InvestorLine,
            wallets::CreateWalletRequest,
            wallets::CreateWalletResponse,
            trustlines::CreateTrustLineRequest,
            trustlines::TrustLineStatusResponse,
            balance::BalanceResponse,
            market::HoldingResponse,
            market::PurchaseRequest,
            market::PurchaseResponse,
            offers::ListOffersRequest,
            offers::OfferAmount,
            offers::CreateOfferRequest,
            offers::CreateOfferResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Setup", description = "One-shot environment setup"),
        (name = "State", description = "Dashboard state"),
        (name = "Issuers", description = "Issuer trust-line dashboards"),
        (name = "Wallets", description = "Investor wallet creation"),
        (name = "TrustLines", description = "Trust-line management"),
        (name = "Balance", description = "Balance lookups"),
        (name = "Market", description = "Token and wrapped-token purchases"),
        (name = "Offers", description = "DEX offer flow")
    )
)]
struct ApiDoc;
