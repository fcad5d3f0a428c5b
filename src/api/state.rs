// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Fundbridge Contributors

//! Dashboard state endpoint.

use axum::{extract::State, Json};

use crate::{error::ApiError, state::AppState, storage};

/// Get the full dashboard state: issuers, investors, currencies and wrapped
/// tokens. 404 until setup has run.
#[utoipa::path(
    get,
    path = "/v1/state",
    tag = "State",
    responses(
        (status = 200, description = "Current environment state", body = storage::DashboardState),
        (status = 404, description = "Setup has not run yet")
    )
)]
pub async fn get_state(
    State(state): State<AppState>,
) -> Result<Json<storage::DashboardState>, ApiError> {
    let dashboard = storage::load_state(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("state_not_found"))?;
    Ok(Json(dashboard))
}
