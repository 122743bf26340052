//! Approval data model — queued items, decisions, and broadcast events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dialogue::subject::SubjectRecord;

/// Status of an item in the approval queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Waiting for a decision.
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// An approval item tracked by the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalItem {
    pub subject: SubjectRecord,
    pub status: ApprovalStatus,
    /// Actor label of whoever decided the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApprovalItem {
    /// Wrap a subject as a new pending item.
    pub fn new(subject: SubjectRecord) -> Self {
        let now = Utc::now();
        Self {
            subject,
            status: ApprovalStatus::Pending,
            decided_by: None,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.subject.id
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

/// A decision handed to the approval recorder when a dialogue completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub subject_id: String,
    pub approved: bool,
    pub actor_label: String,
    pub comment: String,
    pub decided_at: DateTime<Utc>,
}

impl ApprovalDecision {
    pub fn new(
        subject_id: impl Into<String>,
        approved: bool,
        actor_label: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            approved,
            actor_label: actor_label.into(),
            comment: comment.into(),
            decided_at: Utc::now(),
        }
    }

    /// Queue status this decision moves an item to.
    pub fn status(&self) -> ApprovalStatus {
        if self.approved {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        }
    }
}

/// Events broadcast by the approval queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApprovalEvent {
    /// A new item entered the queue.
    ItemQueued { item: ApprovalItem },
    /// An item was approved or rejected.
    ItemDecided {
        id: String,
        status: ApprovalStatus,
        actor_label: String,
    },
    /// Pending count after every change.
    PendingCount { pending: usize, total: usize },
}
