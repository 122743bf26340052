//! Dialogue session — one run of the scripted approval conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::{DialogueOutcome, DialogueStage};
use super::subject::SubjectRecord;

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One line of the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// State of one conversation about one subject.
///
/// The stage only moves along the transitions `DialogueStage` allows, and an
/// outcome is set exactly when the stage becomes `Complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueSession {
    pub id: Uuid,
    stage: DialogueStage,
    subject: SubjectRecord,
    transcript: Vec<TranscriptEntry>,
    last_utterance: Option<String>,
    outcome: Option<DialogueOutcome>,
    pub created_at: DateTime<Utc>,
}

impl DialogueSession {
    /// Start a new session about `subject`.
    pub fn new(subject: SubjectRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: DialogueStage::default(),
            subject,
            transcript: Vec::new(),
            last_utterance: None,
            outcome: None,
            created_at: Utc::now(),
        }
    }

    pub fn stage(&self) -> DialogueStage {
        self.stage
    }

    pub fn subject(&self) -> &SubjectRecord {
        &self.subject
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn last_utterance(&self) -> Option<&str> {
        self.last_utterance.as_deref()
    }

    pub fn outcome(&self) -> Option<DialogueOutcome> {
        self.outcome
    }

    pub fn is_complete(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Append what the user said and remember it as the latest utterance.
    pub fn record_user(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.last_utterance = Some(text.clone());
        self.push_entry(Speaker::User, text);
    }

    /// Append what the assistant said.
    pub fn record_assistant(&mut self, text: impl Into<String>) {
        self.push_entry(Speaker::Assistant, text.into());
    }

    /// Move to `target`. `outcome` must be `Some` exactly when `target` is
    /// `Complete`. Returns false and leaves the session untouched otherwise.
    pub fn enter(&mut self, target: DialogueStage, outcome: Option<DialogueOutcome>) -> bool {
        if !self.stage.can_transition_to(target) {
            tracing::error!(
                session_id = %self.id,
                from = %self.stage,
                to = %target,
                "Refusing invalid dialogue transition"
            );
            return false;
        }
        if target.is_terminal() != outcome.is_some() {
            tracing::error!(
                session_id = %self.id,
                to = %target,
                outcome = ?outcome,
                "Outcome does not match target stage"
            );
            return false;
        }

        if self.stage != target {
            tracing::debug!(session_id = %self.id, from = %self.stage, to = %target, "Stage change");
        }
        self.stage = target;
        self.outcome = outcome;
        true
    }

    fn push_entry(&mut self, speaker: Speaker, text: String) {
        self.transcript.push(TranscriptEntry {
            speaker,
            text,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DialogueSession {
        DialogueSession::new(SubjectRecord::new("APR-1", "Buy more tokens"))
    }

    #[test]
    fn new_session_starts_initial() {
        let s = session();
        assert_eq!(s.stage(), DialogueStage::Initial);
        assert!(s.transcript().is_empty());
        assert!(s.last_utterance().is_none());
        assert!(s.outcome().is_none());
        assert!(!s.is_complete());
    }

    #[test]
    fn transcript_is_append_only_and_ordered() {
        let mut s = session();
        s.record_assistant("hello");
        s.record_user("yes");
        s.record_assistant("summary");
        s.record_user("no thanks");

        let speakers: Vec<Speaker> = s.transcript().iter().map(|e| e.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::Assistant, Speaker::User, Speaker::Assistant, Speaker::User]
        );
        assert_eq!(s.last_utterance(), Some("no thanks"));
        assert!(s.transcript()[0].timestamp <= s.transcript()[3].timestamp);
    }

    #[test]
    fn enter_follows_allowed_transitions() {
        let mut s = session();
        assert!(s.enter(DialogueStage::AwaitingReviewConsent, None));
        assert!(s.enter(DialogueStage::AwaitingDecision, None));
        assert!(s.enter(DialogueStage::Complete, Some(DialogueOutcome::Approved)));
        assert!(s.is_complete());
        assert_eq!(s.outcome(), Some(DialogueOutcome::Approved));
    }

    #[test]
    fn enter_refuses_skips_and_restarts() {
        let mut s = session();
        assert!(!s.enter(DialogueStage::AwaitingDecision, None));
        assert_eq!(s.stage(), DialogueStage::Initial);

        assert!(s.enter(DialogueStage::Complete, Some(DialogueOutcome::Declined)));
        assert!(!s.enter(DialogueStage::Initial, None));
        assert_eq!(s.stage(), DialogueStage::Complete);
        assert_eq!(s.outcome(), Some(DialogueOutcome::Declined));
    }

    #[test]
    fn enter_requires_outcome_only_for_complete() {
        let mut s = session();
        assert!(!s.enter(DialogueStage::Complete, None));
        assert!(!s.enter(DialogueStage::AwaitingReviewConsent, Some(DialogueOutcome::Approved)));
        assert_eq!(s.stage(), DialogueStage::Initial);
        assert!(s.outcome().is_none());
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(session().id, session().id);
    }
}
