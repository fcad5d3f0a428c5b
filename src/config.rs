// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_URL` | Postgres connection string | Required |
//! | `XRPL_RPC_URL` | Ledger JSON-RPC endpoint | Public testnet |
//! | `XRPL_FAUCET_URL` | Faucet endpoint | Public testnet faucet |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use url::Url;

use crate::ledger::types::XRPL_TESTNET;

/// Environment variable name for the Postgres connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string
    pub database_url: String,
    /// Ledger JSON-RPC endpoint
    pub rpc_url: String,
    /// Faucet endpoint for funding new wallets
    pub faucet_url: String,
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// `json` or `pretty` log output
    pub log_json: bool,
}

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var(DATABASE_URL_ENV).map_err(|_| ConfigError::Missing(DATABASE_URL_ENV))?;

        let rpc_url =
            env::var("XRPL_RPC_URL").unwrap_or_else(|_| XRPL_TESTNET.rpc_url.to_string());
        let faucet_url = env::var("XRPL_FAUCET_URL").unwrap_or_else(|_| {
            XRPL_TESTNET
                .faucet_url
                .expect("testnet config carries a faucet")
                .to_string()
        });

        Url::parse(&rpc_url).map_err(|source| ConfigError::InvalidUrl {
            name: "XRPL_RPC_URL",
            source,
        })?;
        Url::parse(&faucet_url).map_err(|source| ConfigError::InvalidUrl {
            name: "XRPL_FAUCET_URL",
            source,
        })?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let log_json = env::var("LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            rpc_url,
            faucet_url,
            host,
            port,
            log_json,
        })
    }
}
