//! Dialogue stage machine — tracks where the approval conversation is.

use serde::{Deserialize, Serialize};

/// The stages of the scripted approval conversation.
///
/// Progresses Initial → AwaitingReviewConsent → AwaitingDecision → Complete,
/// with a declined shortcut Initial → Complete and retry self-loops at
/// Initial and AwaitingDecision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStage {
    #[default]
    Initial,
    AwaitingReviewConsent,
    AwaitingDecision,
    Complete,
}

impl DialogueStage {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: DialogueStage) -> bool {
        use DialogueStage::*;
        matches!(
            (self, target),
            (Initial, Initial)
                | (Initial, AwaitingReviewConsent)
                | (Initial, Complete)
                | (AwaitingReviewConsent, AwaitingDecision)
                | (AwaitingDecision, AwaitingDecision)
                | (AwaitingDecision, Complete)
        )
    }

    /// Whether this stage is terminal (the session is over).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for DialogueStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Initial => "initial",
            Self::AwaitingReviewConsent => "awaiting_review_consent",
            Self::AwaitingDecision => "awaiting_decision",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// How a completed dialogue ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueOutcome {
    /// The user approved the subject.
    Approved,
    /// The user rejected the subject.
    Rejected,
    /// The user declined to review it at all.
    Declined,
}

impl DialogueOutcome {
    /// Whether this outcome produces an approval decision to record.
    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for DialogueOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Declined => write!(f, "declined"),
        }
    }
}
