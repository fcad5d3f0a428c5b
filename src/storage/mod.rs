// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Postgres-backed storage.
//!
//! One repository per table over a shared [`sqlx::PgPool`]; migrations are
//! embedded and applied at startup. [`load_state`] assembles the dashboard
//! state and reports absence when setup has not run yet.

pub mod models;
pub mod repository;

pub use models::{Currency, DashboardState, Investor, Issuer, WrappedToken};
pub use repository::{
    CurrencyRepository, InvestorRepository, IssuerRepository, WrappedTokenRepository,
};

use sqlx::PgPool;

use crate::ledger::types::NETWORK_TESTNET;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Embedded migrations, applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Load the full dashboard state.
///
/// Returns `None` until setup has produced issuers, investors and
/// currencies; a partially seeded database reads as "not set up".
pub async fn load_state(pool: &PgPool) -> StorageResult<Option<DashboardState>> {
    let issuers = IssuerRepository::new(pool).list().await?;
    if issuers.is_empty() {
        return Ok(None);
    }

    let investors = InvestorRepository::new(pool).list().await?;
    let currencies = CurrencyRepository::new(pool).list().await?;
    let wrapped_tokens = WrappedTokenRepository::new(pool).list().await?;

    if investors.is_empty() || currencies.is_empty() {
        return Ok(None);
    }

    Ok(Some(DashboardState {
        network: NETWORK_TESTNET.to_string(),
        issuers,
        investors,
        currencies,
        wrapped_tokens,
        distributed: true,
    }))
}
