//! Workflow data models
//!
//! Schemes are immutable blueprints; proposals own a deep copy of their
//! scheme's stages and move through them one transition at a time.

use crate::workflow::error::{WorkflowError, WorkflowResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text recorded on every stage passed over by a skip
pub const SKIPPED_COMMENT: &str = "Skipped";

/// Stage lifecycle: pending -> active -> completed | rejected
///
/// `Rejected` is part of the model but no operation produces it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Rejected,
}

/// Blueprint for one stage of a scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl StageTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A named, ordered list of stage templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display color used by the dashboard
    pub color: String,
    pub stages: Vec<StageTemplate>,
}

/// A threaded annotation on a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    /// True when the comment records an approval
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    /// None for top-level comments
    pub parent_id: Option<Uuid>,
    /// Ids of comments replying to this one
    pub replies: Vec<Uuid>,
}

impl Comment {
    pub fn new(text: impl Into<String>, approved: bool, parent_id: Option<Uuid>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            approved,
            created_at: now,
            parent_id,
            replies: Vec::new(),
        }
    }
}

/// One step of a proposal's workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: StageStatus,
    pub comments: Vec<Comment>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Stage {
    fn from_template(template: &StageTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            status: StageStatus::Pending,
            comments: Vec::new(),
            started_at: None,
            completed_at: None,
        }
    }

    fn activate(&mut self, now: DateTime<Utc>) {
        self.status = StageStatus::Active;
        self.started_at = Some(now);
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        self.status = StageStatus::Completed;
        self.completed_at = Some(now);
    }
}

/// A stateful instance of a scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub scheme_id: String,
    pub created_at: DateTime<Utc>,
    /// Points at the active stage, or the last stage once everything is completed
    pub current_stage_index: usize,
    pub stages: Vec<Stage>,
}

impl Proposal {
    /// Instantiate a scheme: copy its templates and activate the first stage
    pub fn from_scheme(
        scheme: &Scheme,
        title: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> WorkflowResult<Self> {
        let mut stages: Vec<Stage> = scheme.stages.iter().map(Stage::from_template).collect();
        let first = stages.first_mut().ok_or_else(|| {
            WorkflowError::InvalidScheme(format!("scheme '{}' has no stages", scheme.id))
        })?;
        first.activate(now);

        Ok(Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            scheme_id: scheme.id.clone(),
            created_at: now,
            current_stage_index: 0,
            stages,
        })
    }

    pub fn current_stage(&self) -> &Stage {
        &self.stages[self.current_stage_index]
    }

    /// The stage awaiting action, if the workflow is not finished
    pub fn active_stage(&self) -> Option<&Stage> {
        Some(self.current_stage()).filter(|s| s.status == StageStatus::Active)
    }

    /// Last stage completed and nothing left active
    pub fn is_completed(&self) -> bool {
        self.stages
            .last()
            .is_some_and(|s| s.status == StageStatus::Completed)
            && self.active_stage().is_none()
    }

    pub fn stage_index(&self, stage_id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.id == stage_id)
    }

    /// Record an approval on the active stage, complete it and activate the next one.
    pub(crate) fn approve_current(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> WorkflowResult<()> {
        let current = self.current_stage_index;
        if self.stages[current].status != StageStatus::Active {
            return Err(WorkflowError::InvalidTransition(format!(
                "proposal {} has no active stage to approve",
                self.id
            )));
        }

        let stage = &mut self.stages[current];
        stage.comments.push(Comment::new(text, true, None, now));
        stage.complete(now);

        if let Some(next) = self.stages.get_mut(current + 1) {
            next.activate(now);
            self.current_stage_index = current + 1;
        }
        Ok(())
    }

    /// Complete every stage from the current one up to (not including) `target`
    /// and activate `target`.
    pub(crate) fn skip_to(&mut self, target: usize, reason: &str, now: DateTime<Utc>) -> WorkflowResult<()> {
        let current = self.current_stage_index;
        let len = self.stages.len();
        if target <= current || target >= len {
            return Err(WorkflowError::InvalidTransition(format!(
                "cannot skip from stage {} to stage {} (proposal has {} stages)",
                current, target, len
            )));
        }
        if self.stages[current].status != StageStatus::Active {
            return Err(WorkflowError::InvalidTransition(format!(
                "proposal {} has no active stage to skip from",
                self.id
            )));
        }

        let note = format!(
            "Skipped to stage {} ({}): {}",
            target + 1,
            self.stages[target].name,
            reason
        );
        let stage = &mut self.stages[current];
        stage.comments.push(Comment::new(note, true, None, now));
        stage.complete(now);

        for stage in &mut self.stages[current + 1..target] {
            stage.activate(now);
            stage.comments.push(Comment::new(SKIPPED_COMMENT, false, None, now));
            stage.complete(now);
        }

        self.stages[target].activate(now);
        self.current_stage_index = target;
        Ok(())
    }

    /// Append a comment to a stage (the current one when `stage_id` is None),
    /// linking it under `parent_id` when given.
    pub(crate) fn add_comment(
        &mut self,
        stage_id: Option<&str>,
        text: impl Into<String>,
        approved: bool,
        parent_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> WorkflowResult<Comment> {
        let index = match stage_id {
            Some(id) => self.stage_index(id).ok_or_else(|| WorkflowError::StageNotFound {
                proposal_id: self.id,
                stage_id: id.to_string(),
            })?,
            None => self.current_stage_index,
        };

        let stage = &mut self.stages[index];
        let comment = Comment::new(text, approved, parent_id, now);

        if let Some(parent_id) = parent_id {
            let parent = stage
                .comments
                .iter_mut()
                .find(|c| c.id == parent_id)
                .ok_or_else(|| WorkflowError::UnknownParent {
                    stage_id: stage.id.clone(),
                    parent_id,
                })?;
            parent.replies.push(comment.id);
        }

        stage.comments.push(comment.clone());
        Ok(comment)
    }
}
