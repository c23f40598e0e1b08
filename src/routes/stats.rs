//! Dashboard statistics route

use crate::error::ApiResult;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use crate::workflow::stats::DashboardStats;
use axum::{extract::State, Json};

/// Proposal counts per scheme and stage totals by status
pub async fn get_stats(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<DashboardStats>>> {
    let proposals = state.proposals.list().await;
    let stats = DashboardStats::collect(state.proposals.schemes(), &proposals);

    Ok(Json(SuccessResponse::with_data("Statistics computed", stats)))
}
