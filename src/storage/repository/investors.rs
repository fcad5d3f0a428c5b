// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Investor repository.

use sqlx::PgPool;
use uuid::Uuid;

use super::super::{models::Investor, StorageResult};

/// Repository for investor wallet rows.
pub struct InvestorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InvestorRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All investors, oldest first.
    pub async fn list(&self) -> StorageResult<Vec<Investor>> {
        let investors = sqlx::query_as::<_, Investor>(
            "SELECT id, name, address, secret, issuer_id, created_at \
             FROM investors ORDER BY created_at ASC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(investors)
    }

    /// Look up an investor by its ledger address.
    pub async fn find_by_address(&self, address: &str) -> StorageResult<Option<Investor>> {
        let investor = sqlx::query_as::<_, Investor>(
            "SELECT id, name, address, secret, issuer_id, created_at \
             FROM investors WHERE address = $1",
        )
        .bind(address)
        .fetch_optional(self.pool)
        .await?;
        Ok(investor)
    }

    /// Insert a new investor row.
    pub async fn insert(
        &self,
        name: &str,
        address: &str,
        secret: &str,
        issuer_id: Uuid,
    ) -> StorageResult<Investor> {
        let investor = sqlx::query_as::<_, Investor>(
            "INSERT INTO investors (id, name, address, secret, issuer_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, address, secret, issuer_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(address)
        .bind(secret)
        .bind(issuer_id)
        .fetch_one(self.pool)
        .await?;
        Ok(investor)
    }
}
