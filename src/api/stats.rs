//! Dashboard statistics endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, penalty};

use super::AuthenticatedUser;

/// Statistics query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct StatsQuery {
    /// Compute counters as of this date (YYYY-MM-DD, default: today).
    /// Mainly for deterministic testing.
    pub as_of: Option<String>,
}

/// Shelf counters shown on the dashboard
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct StatsResponse {
    /// All entries
    pub total: i64,
    /// Currently out (includes due-soon and overdue)
    pub borrowed: i64,
    /// Returned entries
    pub returned: i64,
    /// Due within the next 3 days
    pub due_soon: i64,
    /// Past deadline
    pub overdue: i64,
    /// Penalty units accrued across books still out; the client attaches
    /// the currency symbol
    pub total_penalty: i64,
}

/// Get shelf statistics for the current user
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(StatsQuery),
    responses(
        (status = 200, description = "Shelf statistics", body = StatsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<StatsResponse>> {
    let as_of = match query.as_of.as_deref() {
        Some(s) => penalty::parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let stats = state.services.stats.get_stats(claims.user_id, as_of).await?;
    Ok(Json(stats))
}
