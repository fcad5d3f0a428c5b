// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Issuer dashboard: trust lines against an issuer wallet, split by who
//! holds them and whether the currency is a wrapped representation.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::TrustLine,
    state::AppState,
    storage::{InvestorRepository, IssuerRepository, WrappedTokenRepository},
};

/// Counts shown at the top of the dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryCounts {
    /// Trust lines held by investor wallets
    pub total_trust_lines_investors: usize,
    /// Trust lines held by other issuers
    pub total_trust_lines_issuers: usize,
}

/// One investor's position in a currency.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvestorLine {
    /// Investor display name, when the address is known to us
    pub investor_name: Option<String>,
    /// Investor account address
    pub account: String,
    /// Balance from the issuer's perspective
    pub balance: String,
    /// Trust limit
    pub limit: String,
}

/// Issuer trust-line summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct IssuerSummaryResponse {
    /// Crowdfunding name ("A", "B", ...)
    pub crowdfunding_name: String,
    /// The issuer address inspected
    pub issuer: String,
    /// Headline counts
    pub summary: SummaryCounts,
    /// Lines held by other issuers in wrapped currencies
    pub wrapped_token_trust_lines: Vec<TrustLine>,
    /// Lines held by other issuers in original currencies
    pub original_token_trust_lines: Vec<TrustLine>,
    /// Investor lines grouped by currency; wrapped codes are labelled
    /// "<code> Wrapped"
    pub investor_trust_lines_by_currency: BTreeMap<String, Vec<InvestorLine>>,
}

/// Trust-line dashboard for one issuer wallet.
#[utoipa::path(
    get,
    path = "/v1/issuers/{address}/summary",
    tag = "Issuers",
    params(
        ("address" = String, Path, description = "Issuer wallet address")
    ),
    responses(
        (status = 200, description = "Trust-line summary", body = IssuerSummaryResponse),
        (status = 404, description = "Unknown issuer"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn issuer_summary(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<IssuerSummaryResponse>, ApiError> {
    let issuer_repo = IssuerRepository::new(&state.pool);
    let issuer = issuer_repo
        .find_by_address(&address)
        .await?
        .ok_or_else(|| ApiError::not_found("admin_not_found"))?;

    let issuers = issuer_repo.list().await?;
    let investors = InvestorRepository::new(&state.pool).list().await?;
    let wrapped_codes: Vec<String> = WrappedTokenRepository::new(&state.pool)
        .list_for_issuer(issuer.id)
        .await?
        .into_iter()
        .map(|token| token.code)
        .collect();

    let lines = state.ledger.account_lines(&address, None).await?;

    let is_issuer_line =
        |line: &TrustLine| issuers.iter().any(|other| other.address == line.account);

    let wrapped_token_trust_lines: Vec<TrustLine> = lines
        .iter()
        .filter(|line| is_issuer_line(line) && wrapped_codes.contains(&line.currency))
        .cloned()
        .collect();

    let original_token_trust_lines: Vec<TrustLine> = lines
        .iter()
        .filter(|line| is_issuer_line(line) && !wrapped_codes.contains(&line.currency))
        .cloned()
        .collect();

    let investor_lines: Vec<&TrustLine> =
        lines.iter().filter(|line| !is_issuer_line(line)).collect();

    let mut investor_trust_lines_by_currency: BTreeMap<String, Vec<InvestorLine>> =
        BTreeMap::new();
    for line in &investor_lines {
        let label = if wrapped_codes.contains(&line.currency) {
            format!("{} Wrapped", line.currency)
        } else {
            line.currency.clone()
        };

        let investor_name = investors
            .iter()
            .find(|investor| investor.address == line.account)
            .map(|investor| investor.name.clone());

        investor_trust_lines_by_currency
            .entry(label)
            .or_default()
            .push(InvestorLine {
                investor_name,
                account: line.account.clone(),
                balance: line.balance.clone(),
                limit: line.limit.clone(),
            });
    }

    let summary = SummaryCounts {
        total_trust_lines_investors: investor_lines.len(),
        total_trust_lines_issuers: wrapped_token_trust_lines.len()
            + original_token_trust_lines.len(),
    };

    Ok(Json(IssuerSummaryResponse {
        crowdfunding_name: issuer.name,
        issuer: address,
        summary,
        wrapped_token_trust_lines,
        original_token_trust_lines,
        investor_trust_lines_by_currency,
    }))
}
