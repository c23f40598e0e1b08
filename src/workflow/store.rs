//! Proposal Workflow Store
//!
//! Owns the scheme catalog and every proposal. Each operation holds the
//! write lock for its whole duration, so it either applies completely or
//! (on error) not at all.

use crate::workflow::catalog::SchemeCatalog;
use crate::workflow::clock::{Clock, SystemClock};
use crate::workflow::error::{WorkflowError, WorkflowResult};
use crate::workflow::models::{Comment, Proposal, Scheme};
use crate::workflow::notify::{Notification, Notifier, Operation, Outcome, TracingNotifier};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Thread-safe proposal store
pub struct ProposalStore {
    catalog: SchemeCatalog,
    /// Proposals in creation order
    proposals: Arc<RwLock<Vec<Proposal>>>,
    /// Proposal currently selected in the dashboard
    active: Arc<RwLock<Option<Uuid>>>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl ProposalStore {
    pub fn new(catalog: SchemeCatalog) -> Self {
        Self::with_dependencies(catalog, Arc::new(SystemClock), Arc::new(TracingNotifier))
    }

    pub fn with_dependencies(
        catalog: SchemeCatalog,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            catalog,
            proposals: Arc::new(RwLock::new(Vec::new())),
            active: Arc::new(RwLock::new(None)),
            clock,
            notifier,
        }
    }

    // ==================== Reads ====================

    pub fn schemes(&self) -> &[Scheme] {
        self.catalog.all()
    }

    pub fn scheme(&self, id: &str) -> Option<&Scheme> {
        self.catalog.get(id)
    }

    /// All proposals in creation order
    pub async fn list(&self) -> Vec<Proposal> {
        self.proposals.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> WorkflowResult<Proposal> {
        let proposals = self.proposals.read().await;
        proposals
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(WorkflowError::ProposalNotFound(id))
    }

    // ==================== Active proposal ====================

    /// Select the proposal being viewed; `None` clears the selection
    pub async fn set_active(&self, id: Option<Uuid>) -> WorkflowResult<Option<Proposal>> {
        let result: WorkflowResult<Option<Proposal>> = async {
            let proposals = self.proposals.read().await;
            let selected = match id {
                Some(id) => Some(
                    proposals
                        .iter()
                        .find(|p| p.id == id)
                        .cloned()
                        .ok_or(WorkflowError::ProposalNotFound(id))?,
                ),
                None => None,
            };
            *self.active.write().await = id;
            Ok(selected)
        }
        .await;

        self.report(Operation::SetActiveProposal, result, |selected| match selected {
            Some(p) => format!("Viewing proposal '{}'", p.title),
            None => "Cleared active proposal".to_string(),
        })
    }

    /// Current snapshot of the selected proposal
    pub async fn active(&self) -> Option<Proposal> {
        let proposals = self.proposals.read().await;
        let active = self.active.read().await;
        active.and_then(|id| proposals.iter().find(|p| p.id == id).cloned())
    }

    // ==================== Mutations ====================

    /// Instantiate a scheme as a new proposal with its first stage active
    pub async fn create(&self, title: &str, description: &str, scheme_id: &str) -> WorkflowResult<Proposal> {
        let result = match self.catalog.get(scheme_id) {
            Some(scheme) => Proposal::from_scheme(scheme, title, description, self.clock.now()),
            None => Err(WorkflowError::UnknownScheme(scheme_id.to_string())),
        };

        let result = match result {
            Ok(proposal) => {
                self.proposals.write().await.push(proposal.clone());
                debug!(
                    "Created proposal {} on scheme '{}' with {} stages",
                    proposal.id,
                    scheme_id,
                    proposal.stages.len()
                );
                Ok(proposal)
            }
            Err(e) => Err(e),
        };

        self.report(Operation::CreateProposal, result, |p| {
            format!("Proposal '{}' created", p.title)
        })
    }

    /// Approve the active stage and move on, or (when not approved) only
    /// record the comment as feedback on the current stage.
    pub async fn advance(&self, proposal_id: Uuid, comment: &str, approved: bool) -> WorkflowResult<Proposal> {
        if !approved {
            let result = self
                .mutate(proposal_id, |proposal, now| {
                    proposal.add_comment(None, comment, false, None, now)
                })
                .await
                .map(|(proposal, _)| proposal);
            return self.report(Operation::AdvanceStage, result, |p| {
                format!("Feedback recorded on stage '{}'", p.current_stage().name)
            });
        }

        let result = self
            .mutate(proposal_id, |proposal, now| proposal.approve_current(comment, now))
            .await
            .map(|(proposal, _)| proposal);

        self.report(Operation::AdvanceStage, result, |p| {
            if p.is_completed() {
                format!("Proposal '{}' completed all stages", p.title)
            } else {
                format!("Proposal '{}' advanced to '{}'", p.title, p.current_stage().name)
            }
        })
    }

    /// Fast-forward to a later stage, completing everything in between
    pub async fn skip_to(&self, proposal_id: Uuid, target_stage_index: usize, comment: &str) -> WorkflowResult<Proposal> {
        let result = self
            .mutate(proposal_id, |proposal, now| {
                proposal.skip_to(target_stage_index, comment, now)
            })
            .await
            .map(|(proposal, _)| proposal);

        self.report(Operation::SkipToStage, result, |p| {
            format!("Proposal '{}' skipped to '{}'", p.title, p.current_stage().name)
        })
    }

    /// Add a comment or reply. An empty `stage_id` targets the current stage.
    pub async fn add_comment(
        &self,
        proposal_id: Uuid,
        stage_id: Option<&str>,
        text: &str,
        approved: bool,
        parent_comment_id: Option<Uuid>,
    ) -> WorkflowResult<(Proposal, Comment)> {
        let stage_id = stage_id.filter(|s| !s.is_empty());
        let result = self
            .mutate(proposal_id, |proposal, now| {
                proposal.add_comment(stage_id, text, approved, parent_comment_id, now)
            })
            .await;

        self.report(Operation::AddComment, result, |(_, comment)| {
            if comment.parent_id.is_some() {
                "Reply added".to_string()
            } else {
                "Comment added".to_string()
            }
        })
    }

    /// Apply `f` to a working copy of the proposal and commit it only on success
    async fn mutate<T>(
        &self,
        proposal_id: Uuid,
        f: impl FnOnce(&mut Proposal, chrono::DateTime<chrono::Utc>) -> WorkflowResult<T>,
    ) -> WorkflowResult<(Proposal, T)> {
        let mut proposals = self.proposals.write().await;
        let slot = proposals
            .iter_mut()
            .find(|p| p.id == proposal_id)
            .ok_or(WorkflowError::ProposalNotFound(proposal_id))?;

        let mut working = slot.clone();
        let value = f(&mut working, self.clock.now())?;
        *slot = working.clone();
        Ok((working, value))
    }

    fn report<T>(
        &self,
        operation: Operation,
        result: WorkflowResult<T>,
        message: impl FnOnce(&T) -> String,
    ) -> WorkflowResult<T> {
        let (outcome, message) = match &result {
            Ok(value) => (Outcome::Succeeded, message(value)),
            Err(e) => (Outcome::Failed, e.to_string()),
        };
        self.notifier.notify(&Notification {
            operation,
            outcome,
            message,
        });
        result
    }
}
