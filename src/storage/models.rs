// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Database row types.
//!
//! Rows are written once by the setup flow (plus one conflict-ignored insert
//! path for wrapped-token records) and read thereafter. Wallet seeds live in
//! plaintext columns: this is a testnet-only demo and the dashboard's forms
//! need them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A crowdfunding issuer ("admin") wallet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Issuer {
    /// Unique identifier
    pub id: Uuid,
    /// Crowdfunding name ("A", "B", ...)
    pub name: String,
    /// Display name of the operator ("Admin-A")
    pub admin_name: String,
    /// Classic ledger address
    pub address: String,
    /// Wallet seed
    pub secret: String,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// An investor wallet, attached to the issuer whose campaign it joined.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Investor {
    /// Unique identifier
    pub id: Uuid,
    /// Display name ("Investor-1")
    pub name: String,
    /// Classic ledger address
    pub address: String,
    /// Wallet seed
    pub secret: String,
    /// Owning issuer
    pub issuer_id: Uuid,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// A token an issuer mints for its campaign.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Currency {
    /// Unique identifier
    pub id: Uuid,
    /// Currency code ("TKA")
    pub code: String,
    /// Issuing campaign
    pub issuer_id: Uuid,
}

/// A wrapped representation of another issuer's token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WrappedToken {
    /// Unique identifier
    pub id: Uuid,
    /// The original currency this token wraps
    pub currency_id: Uuid,
    /// Wrapped currency code as it appears on the ledger
    pub code: String,
    /// The issuer minting the wrapped representation
    pub issuer_id: Uuid,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Everything the dashboard needs in one payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardState {
    /// Network identifier (always "testnet")
    pub network: String,
    /// Issuer wallets
    pub issuers: Vec<Issuer>,
    /// Investor wallets
    pub investors: Vec<Investor>,
    /// Token definitions
    pub currencies: Vec<Currency>,
    /// Wrapped-token records
    pub wrapped_tokens: Vec<WrappedToken>,
    /// Whether initial distribution has happened
    pub distributed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn dashboard_state_serializes_flat() {
        let issuer = Issuer {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            admin_name: "Admin-A".to_string(),
            address: "rISSUER".to_string(),
            secret: "sEdSEED".to_string(),
            created_at: Utc::now(),
        };

        let state = DashboardState {
            network: "testnet".to_string(),
            issuers: vec![issuer],
            investors: vec![],
            currencies: vec![],
            wrapped_tokens: vec![],
            distributed: true,
        };

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["network"], "testnet");
        assert_eq!(json["distributed"], true);
        assert_eq!(json["issuers"][0]["name"], "A");
        // The dashboard forms need the seed back; it must survive the trip.
        assert_eq!(json["issuers"][0]["secret"], "sEdSEED");
    }
}
