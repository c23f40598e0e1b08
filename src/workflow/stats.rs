//! Dashboard statistics
//!
//! Read-only projections over a snapshot of proposals.

use crate::workflow::models::{Proposal, Scheme, StageStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeUsage {
    pub scheme_id: String,
    pub name: String,
    pub proposals: usize,
}

/// Stage totals across all proposals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageStatusCounts {
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_proposals: usize,
    pub completed_proposals: usize,
    pub per_scheme: Vec<SchemeUsage>,
    pub stage_status: StageStatusCounts,
    /// Completed stages as a share of pending, active and completed stages
    pub completion_rate: u8,
    pub active_rate: u8,
}

impl DashboardStats {
    pub fn collect(schemes: &[Scheme], proposals: &[Proposal]) -> Self {
        let stage_status = stage_status_counts(proposals);
        let tracked = stage_status.pending + stage_status.active + stage_status.completed;

        Self {
            total_proposals: proposals.len(),
            completed_proposals: proposals.iter().filter(|p| p.is_completed()).count(),
            per_scheme: proposals_per_scheme(schemes, proposals),
            completion_rate: rounded_percent(stage_status.completed, tracked),
            active_rate: rounded_percent(stage_status.active, tracked),
            stage_status,
        }
    }
}

/// Proposal count for every scheme, in catalog order (zero counts included)
pub fn proposals_per_scheme(schemes: &[Scheme], proposals: &[Proposal]) -> Vec<SchemeUsage> {
    schemes
        .iter()
        .map(|scheme| SchemeUsage {
            scheme_id: scheme.id.clone(),
            name: scheme.name.clone(),
            proposals: proposals.iter().filter(|p| p.scheme_id == scheme.id).count(),
        })
        .collect()
}

pub fn stage_status_counts(proposals: &[Proposal]) -> StageStatusCounts {
    let mut counts = StageStatusCounts::default();
    for stage in proposals.iter().flat_map(|p| p.stages.iter()) {
        match stage.status {
            StageStatus::Pending => counts.pending += 1,
            StageStatus::Active => counts.active += 1,
            StageStatus::Completed => counts.completed += 1,
            StageStatus::Rejected => counts.rejected += 1,
        }
    }
    counts
}

/// Position of the current stage along the workflow, 0..=100
pub fn progress_percent(proposal: &Proposal) -> u8 {
    if proposal.is_completed() {
        return 100;
    }
    let last = proposal.stages.len().saturating_sub(1);
    if last == 0 {
        return 0;
    }
    rounded_percent(proposal.current_stage_index, last)
}

/// `part / whole` as a percentage rounded half up, 0 when `whole` is 0
fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (2 * whole)).min(100) as u8
}

/// Case-insensitive title search
pub fn search<'a>(proposals: &'a [Proposal], query: &str) -> Vec<&'a Proposal> {
    let needle = query.to_lowercase();
    proposals
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .collect()
}
