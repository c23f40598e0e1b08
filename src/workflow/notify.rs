//! Operation notifications
//!
//! The store reports the outcome of every mutation through a [`Notifier`] so
//! the dashboard can surface success/failure messages.

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Store operations that produce notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateProposal,
    AdvanceStage,
    SkipToStage,
    AddComment,
    SetActiveProposal,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CreateProposal => "create_proposal",
            Operation::AdvanceStage => "advance_stage",
            Operation::SkipToStage => "skip_to_stage",
            Operation::AddComment => "add_comment",
            Operation::SetActiveProposal => "set_active_proposal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// "Operation X succeeded/failed with message M"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub operation: Operation,
    pub outcome: Outcome,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Emits notifications as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: &Notification) {
        match n.outcome {
            Outcome::Succeeded => info!(operation = %n.operation, "{}", n.message),
            Outcome::Failed => warn!(operation = %n.operation, "{}", n.message),
        }
    }
}

/// Keeps every notification in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: std::sync::Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen.lock().unwrap().push(notification.clone());
    }
}
