// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Repository layer providing typed access to the database.
//!
//! Each repository covers one table, borrowing the shared connection pool.

pub mod currencies;
pub mod investors;
pub mod issuers;
pub mod wrapped_tokens;

pub use currencies::CurrencyRepository;
pub use investors::InvestorRepository;
pub use issuers::IssuerRepository;
pub use wrapped_tokens::WrappedTokenRepository;
