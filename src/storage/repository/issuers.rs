// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Issuer repository.

use sqlx::PgPool;
use uuid::Uuid;

use super::super::{models::Issuer, StorageResult};

/// Repository for issuer ("admin") wallet rows.
pub struct IssuerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IssuerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All issuers, oldest first.
    pub async fn list(&self) -> StorageResult<Vec<Issuer>> {
        let issuers = sqlx::query_as::<_, Issuer>(
            "SELECT id, name, admin_name, address, secret, created_at \
             FROM issuers ORDER BY created_at ASC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(issuers)
    }

    /// Look up an issuer by its ledger address.
    pub async fn find_by_address(&self, address: &str) -> StorageResult<Option<Issuer>> {
        let issuer = sqlx::query_as::<_, Issuer>(
            "SELECT id, name, admin_name, address, secret, created_at \
             FROM issuers WHERE address = $1",
        )
        .bind(address)
        .fetch_optional(self.pool)
        .await?;
        Ok(issuer)
    }

    /// All issuers except the one at `address`, oldest first.
    pub async fn list_except(&self, address: &str) -> StorageResult<Vec<Issuer>> {
        let issuers = sqlx::query_as::<_, Issuer>(
            "SELECT id, name, admin_name, address, secret, created_at \
             FROM issuers WHERE address <> $1 ORDER BY created_at ASC",
        )
        .bind(address)
        .fetch_all(self.pool)
        .await?;
        Ok(issuers)
    }

    /// The oldest issuer; new investor wallets attach to it by default.
    pub async fn first(&self) -> StorageResult<Option<Issuer>> {
        let issuer = sqlx::query_as::<_, Issuer>(
            "SELECT id, name, admin_name, address, secret, created_at \
             FROM issuers ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;
        Ok(issuer)
    }

    /// Insert a new issuer row.
    pub async fn insert(
        &self,
        name: &str,
        admin_name: &str,
        address: &str,
        secret: &str,
    ) -> StorageResult<Issuer> {
        let issuer = sqlx::query_as::<_, Issuer>(
            "INSERT INTO issuers (id, name, admin_name, address, secret) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, admin_name, address, secret, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(admin_name)
        .bind(address)
        .bind(secret)
        .fetch_one(self.pool)
        .await?;
        Ok(issuer)
    }
}
