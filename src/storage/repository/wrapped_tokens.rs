// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Wrapped-token repository.

use sqlx::PgPool;
use uuid::Uuid;

use super::super::{models::WrappedToken, StorageResult};

/// Repository for wrapped-token records: a wrapped code linked to its
/// originating currency and the issuer minting the wrapped representation.
pub struct WrappedTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WrappedTokenRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All wrapped-token records, oldest first.
    pub async fn list(&self) -> StorageResult<Vec<WrappedToken>> {
        let tokens = sqlx::query_as::<_, WrappedToken>(
            "SELECT id, currency_id, code, issuer_id, created_at \
             FROM wrapped_tokens ORDER BY created_at ASC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(tokens)
    }

    /// Wrapped-token records minted by one issuer.
    pub async fn list_for_issuer(&self, issuer_id: Uuid) -> StorageResult<Vec<WrappedToken>> {
        let tokens = sqlx::query_as::<_, WrappedToken>(
            "SELECT id, currency_id, code, issuer_id, created_at \
             FROM wrapped_tokens WHERE issuer_id = $1 ORDER BY created_at ASC",
        )
        .bind(issuer_id)
        .fetch_all(self.pool)
        .await?;
        Ok(tokens)
    }

    /// Record a wrapped token; repeated purchases of the same wrap are a
    /// no-op on the record.
    pub async fn insert(
        &self,
        currency_id: Uuid,
        code: &str,
        issuer_id: Uuid,
    ) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO wrapped_tokens (id, currency_id, code, issuer_id) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (currency_id, code, issuer_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(currency_id)
        .bind(code)
        .bind(issuer_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}
