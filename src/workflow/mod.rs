//! Proposal workflow - the heart of the dashboard
//!
//! Schemes define ordered stages; proposals instantiate a scheme and advance
//! stage by stage, collecting comments and approvals along the way.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod insights;
pub mod models;
pub mod notify;
pub mod stats;
mod store;

pub use catalog::SchemeCatalog;
pub use error::WorkflowError;
pub use models::*;
pub use store::ProposalStore;
