// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Currency repository.

use sqlx::PgPool;
use uuid::Uuid;

use super::super::{models::Currency, StorageResult};

/// Repository for token definitions.
pub struct CurrencyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CurrencyRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All currencies.
    pub async fn list(&self) -> StorageResult<Vec<Currency>> {
        let currencies =
            sqlx::query_as::<_, Currency>("SELECT id, code, issuer_id FROM currencies")
                .fetch_all(self.pool)
                .await?;
        Ok(currencies)
    }

    /// Look up one issuer's currency by code.
    pub async fn find(&self, code: &str, issuer_id: Uuid) -> StorageResult<Option<Currency>> {
        let currency = sqlx::query_as::<_, Currency>(
            "SELECT id, code, issuer_id FROM currencies WHERE code = $1 AND issuer_id = $2",
        )
        .bind(code)
        .bind(issuer_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(currency)
    }

    /// Insert a currency, tolerating re-runs: on conflict the existing row is
    /// returned instead.
    pub async fn insert(&self, code: &str, issuer_id: Uuid) -> StorageResult<Currency> {
        let inserted = sqlx::query_as::<_, Currency>(
            "INSERT INTO currencies (id, code, issuer_id) VALUES ($1, $2, $3) \
             ON CONFLICT (code, issuer_id) DO NOTHING \
             RETURNING id, code, issuer_id",
        )
        .bind(Uuid::new_v4())
        .bind(code)
        .bind(issuer_id)
        .fetch_optional(self.pool)
        .await?;

        match inserted {
            Some(currency) => Ok(currency),
            None => {
                let existing = self.find(code, issuer_id).await?;
                existing.ok_or_else(|| {
                    super::super::StorageError::NotFound(format!("currency {code}"))
                })
            }
        }
    }
}
