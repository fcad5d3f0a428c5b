// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

use std::sync::Arc;

use sqlx::PgPool;

use crate::ledger::LedgerClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub ledger: Arc<LedgerClient>,
}

impl AppState {
    pub fn new(pool: PgPool, ledger: LedgerClient) -> Self {
        Self {
            pool,
            ledger: Arc::new(ledger),
        }
    }
}
