//! Workflow error types
//!
//! Every store operation either succeeds or fails with one of these, leaving
//! the store untouched.

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Scheme '{0}' not found")]
    UnknownScheme(String),

    #[error("Proposal {0} not found")]
    ProposalNotFound(Uuid),

    #[error("Stage '{stage_id}' not found in proposal {proposal_id}")]
    StageNotFound { proposal_id: Uuid, stage_id: String },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Parent comment {parent_id} not found in stage '{stage_id}'")]
    UnknownParent { stage_id: String, parent_id: Uuid },

    #[error("Invalid scheme definition: {0}")]
    InvalidScheme(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
