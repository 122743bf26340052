//! Keyword intent classification for spoken or typed utterances.
//!
//! Classification is plain case-insensitive substring containment. Affirm
//! keywords are always checked before deny keywords, so "no, but yes"
//! classifies as `Affirm`.

use serde::{Deserialize, Serialize};

use super::stage::DialogueStage;

/// Affirm keywords used outside the decision stage.
pub const AFFIRM_KEYWORDS: &[&str] = &["yes", "sure", "okay"];
/// Deny keywords used outside the decision stage.
pub const DENY_KEYWORDS: &[&str] = &["no", "not now", "later"];
/// Deny keywords while waiting for an approve/reject decision.
pub const DECISION_DENY_KEYWORDS: &[&str] = &["reject", "no", "denied"];

/// What the user meant, as far as keyword matching can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Affirm,
    Deny,
    Unclear,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Affirm => write!(f, "affirm"),
            Self::Deny => write!(f, "deny"),
            Self::Unclear => write!(f, "unclear"),
        }
    }
}

/// Result of classifying one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: Intent,
    /// Keyword that decided the intent; `None` for `Unclear`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
}

impl IntentClassification {
    pub fn affirm(keyword: impl Into<String>) -> Self {
        Self {
            intent: Intent::Affirm,
            matched_keyword: Some(keyword.into()),
        }
    }

    pub fn deny(keyword: impl Into<String>) -> Self {
        Self {
            intent: Intent::Deny,
            matched_keyword: Some(keyword.into()),
        }
    }

    pub fn unclear() -> Self {
        Self {
            intent: Intent::Unclear,
            matched_keyword: None,
        }
    }
}

/// A pair of keyword sets checked in order: affirm first, then deny.
#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    affirm: &'static [&'static str],
    deny: &'static [&'static str],
}

impl IntentClassifier {
    /// Keyword sets for consent questions ("shall we review it?").
    pub const fn general() -> Self {
        Self {
            affirm: AFFIRM_KEYWORDS,
            deny: DENY_KEYWORDS,
        }
    }

    /// Keyword sets for the approve/reject question.
    pub const fn decision() -> Self {
        Self {
            affirm: AFFIRM_KEYWORDS,
            deny: DECISION_DENY_KEYWORDS,
        }
    }

    /// Pick the keyword sets that apply while the dialogue is at `stage`.
    pub fn for_stage(stage: DialogueStage) -> Self {
        match stage {
            DialogueStage::AwaitingDecision => Self::decision(),
            _ => Self::general(),
        }
    }

    /// Classify an utterance. Pure: same input, same output.
    pub fn classify(&self, utterance: &str) -> IntentClassification {
        let lower = utterance.to_lowercase();

        if let Some(keyword) = self.affirm.iter().find(|k| lower.contains(*k)) {
            return IntentClassification::affirm(*keyword);
        }
        if let Some(keyword) = self.deny.iter().find(|k| lower.contains(*k)) {
            return IntentClassification::deny(*keyword);
        }
        IntentClassification::unclear()
    }
}

/// Classify an utterance with the general keyword sets. For a running
/// dialogue use `DialogueTracker::classify`, which picks the sets of the
/// current stage.
pub fn classify_intent(utterance: &str) -> IntentClassification {
    IntentClassifier::general().classify(utterance)
}
