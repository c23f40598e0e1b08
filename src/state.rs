//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::Settings;
use crate::workflow::{ProposalStore, SchemeCatalog};
use std::sync::Arc;
use tracing::info;

/// Application state shared across all handlers
pub struct AppState {
    /// Scheme catalog and proposals (has internal locking)
    pub proposals: ProposalStore,
}

impl AppState {
    pub fn new(proposals: ProposalStore) -> Self {
        Self { proposals }
    }

    /// Build state with the built-in scheme catalog
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let state = Self::new(ProposalStore::new(SchemeCatalog::builtin()?));

        if settings.workflow.seed_demo_proposal {
            let proposal = state
                .proposals
                .create(
                    "Indigenous Loitering Munition",
                    "Prototype development of a loitering munition with 70% government funding",
                    "make-i",
                )
                .await?;
            info!("Seeded demo proposal {}", proposal.id);
        }

        Ok(state)
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
