//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains all request/response structures used by the API.

use crate::workflow::{Proposal, Scheme};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

// ==================== Requests ====================

/// Request to instantiate a scheme as a new proposal
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Scheme is required"))]
    pub scheme_id: String,
}

/// Approve (advance) or send feedback on the active stage
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceStageRequest {
    #[validate(length(min = 1, message = "Please provide a comment before proceeding"))]
    pub comment: String,

    pub approved: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SkipStageRequest {
    pub target_stage_index: usize,

    #[validate(length(min = 1, message = "A reason is required to skip stages"))]
    pub comment: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    /// Defaults to the current stage when absent or empty
    #[serde(default)]
    pub stage_id: Option<String>,

    #[validate(length(min = 1, message = "Comment text is required"))]
    pub text: String,

    #[serde(default)]
    pub approved: bool,

    #[serde(default)]
    pub parent_comment_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveProposalRequest {
    pub proposal_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProposalListQuery {
    /// Case-insensitive title filter
    pub q: Option<String>,
}

// ==================== Responses ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeListResponse {
    pub schemes: Vec<Scheme>,
}

/// Proposal plus the derived values the dashboard renders next to it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalView {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub progress_percent: u8,
    pub is_completed: bool,
}

impl From<Proposal> for ProposalView {
    fn from(proposal: Proposal) -> Self {
        Self {
            progress_percent: crate::workflow::stats::progress_percent(&proposal),
            is_completed: proposal.is_completed(),
            proposal,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAddedResponse {
    pub comment_id: Uuid,
    pub proposal: ProposalView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub recommendation: String,
    pub vendors: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProposalResponse {
    pub proposal: Option<ProposalView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateProposalRequest {
            title: "Radar".to_string(),
            description: "Coastal".to_string(),
            scheme_id: "tdf".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty_title = CreateProposalRequest {
            title: String::new(),
            ..ok
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_add_comment_defaults() {
        let req: AddCommentRequest = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(req.stage_id, None);
        assert!(!req.approved);
        assert_eq!(req.parent_comment_id, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_skip_request_requires_reason() {
        let req: SkipStageRequest =
            serde_json::from_str(r#"{"targetStageIndex":3,"comment":""}"#).unwrap();
        assert_eq!(req.target_stage_index, 3);
        assert!(req.validate().is_err());
    }
}
