//! Proposal workflow route handlers
//!
//! Thin wrappers over the proposal store: validate the request, call one
//! store operation, wrap the result.

use crate::error::{validation_error, ApiResult};
use crate::models::{
    ActiveProposalResponse, AddCommentRequest, AdvanceStageRequest, CommentAddedResponse,
    CreateProposalRequest, InsightsResponse, ProposalListQuery, ProposalListResponse,
    ProposalView, SetActiveProposalRequest, SkipStageRequest, SuccessResponse,
};
use crate::state::SharedState;
use crate::workflow::{insights, stats};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

/// Number of vendors shown alongside a recommendation
const VENDOR_SHORTLIST: usize = 5;

// =============================================================================
// READS
// =============================================================================

/// List proposals in creation order, optionally filtered by title
pub async fn list_proposals(
    State(state): State<SharedState>,
    Query(query): Query<ProposalListQuery>,
) -> ApiResult<Json<SuccessResponse<ProposalListResponse>>> {
    let all = state.proposals.list().await;
    let proposals: Vec<ProposalView> = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => stats::search(&all, q)
            .into_iter()
            .cloned()
            .map(ProposalView::from)
            .collect(),
        _ => all.into_iter().map(ProposalView::from).collect(),
    };

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} proposals", proposals.len()),
        ProposalListResponse { proposals },
    )))
}

/// Get a proposal by ID
pub async fn get_proposal(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<ProposalView>>> {
    let proposal = state.proposals.get(id).await?;
    Ok(Json(SuccessResponse::with_data("Proposal retrieved", proposal.into())))
}

/// Canned recommendation for the current stage plus a vendor shortlist
pub async fn get_insights(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse<InsightsResponse>>> {
    let proposal = state.proposals.get(id).await?;
    let scheme = state.proposals.scheme(&proposal.scheme_id);

    Ok(Json(SuccessResponse::with_data(
        "Insights generated",
        InsightsResponse {
            recommendation: insights::recommendation(&proposal, scheme),
            vendors: insights::vendor_recommendations(VENDOR_SHORTLIST),
        },
    )))
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Create a new proposal from a scheme
pub async fn create_proposal(
    State(state): State<SharedState>,
    Json(req): Json<CreateProposalRequest>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<ProposalView>>)> {
    req.validate().map_err(|e| validation_error(e.to_string()))?;

    let proposal = state
        .proposals
        .create(req.title.trim(), req.description.trim(), &req.scheme_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data("Proposal created", proposal.into())),
    ))
}

/// Approve the active stage, or record feedback when not approved
pub async fn advance_stage(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdvanceStageRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalView>>> {
    req.validate().map_err(|e| validation_error(e.to_string()))?;
    debug!("Advance request for proposal {} (approved: {})", id, req.approved);

    let proposal = state.proposals.advance(id, &req.comment, req.approved).await?;
    let message = if !req.approved {
        "Feedback recorded"
    } else if proposal.is_completed() {
        "Proposal completed"
    } else {
        "Stage approved"
    };

    Ok(Json(SuccessResponse::with_data(message, proposal.into())))
}

/// Skip ahead to a later stage
pub async fn skip_to_stage(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SkipStageRequest>,
) -> ApiResult<Json<SuccessResponse<ProposalView>>> {
    req.validate().map_err(|e| validation_error(e.to_string()))?;

    let proposal = state
        .proposals
        .skip_to(id, req.target_stage_index, &req.comment)
        .await?;

    Ok(Json(SuccessResponse::with_data("Stages skipped", proposal.into())))
}

/// Add a comment or a reply to a stage
pub async fn add_comment(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> ApiResult<Json<SuccessResponse<CommentAddedResponse>>> {
    req.validate().map_err(|e| validation_error(e.to_string()))?;

    let (proposal, comment) = state
        .proposals
        .add_comment(
            id,
            req.stage_id.as_deref(),
            &req.text,
            req.approved,
            req.parent_comment_id,
        )
        .await?;

    Ok(Json(SuccessResponse::with_data(
        if comment.parent_id.is_some() { "Reply added" } else { "Comment added" },
        CommentAddedResponse {
            comment_id: comment.id,
            proposal: proposal.into(),
        },
    )))
}

// =============================================================================
// ACTIVE PROPOSAL
// =============================================================================

pub async fn get_active_proposal(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<ActiveProposalResponse>>> {
    let proposal = state.proposals.active().await.map(ProposalView::from);
    let message = if proposal.is_some() { "Active proposal" } else { "No active proposal" };

    Ok(Json(SuccessResponse::with_data(
        message,
        ActiveProposalResponse { proposal },
    )))
}

/// Select (or clear, with a null id) the proposal being viewed
pub async fn set_active_proposal(
    State(state): State<SharedState>,
    Json(req): Json<SetActiveProposalRequest>,
) -> ApiResult<Json<SuccessResponse<ActiveProposalResponse>>> {
    let proposal = state
        .proposals
        .set_active(req.proposal_id)
        .await?
        .map(ProposalView::from);

    Ok(Json(SuccessResponse::with_data(
        "Active proposal updated",
        ActiveProposalResponse { proposal },
    )))
}
