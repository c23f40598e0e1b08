//! Scheme catalog route handlers

use crate::error::{not_found_error, ApiResult};
use crate::models::{SchemeListResponse, SuccessResponse};
use crate::state::SharedState;
use crate::workflow::Scheme;
use axum::{
    extract::{Path, State},
    Json,
};

/// List every scheme in catalog order
pub async fn list_schemes(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<SchemeListResponse>>> {
    let schemes = state.proposals.schemes().to_vec();

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} schemes", schemes.len()),
        SchemeListResponse { schemes },
    )))
}

/// Get a single scheme with its stage templates
pub async fn get_scheme(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<Scheme>>> {
    let scheme = state
        .proposals
        .scheme(&id)
        .cloned()
        .ok_or_else(|| not_found_error(format!("Scheme '{}' not found", id)))?;

    Ok(Json(SuccessResponse::with_data("Scheme retrieved", scheme)))
}
