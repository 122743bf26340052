//! Conversations the runner can drive: the approval dialogue and the
//! scripted Q&A.

use std::sync::Arc;

use async_trait::async_trait;

use super::qa::QaScript;
use super::responses::ResponseSelector;
use super::session::{DialogueSession, Speaker, TranscriptEntry};
use super::stage::DialogueStage;
use super::tracker::DialogueTracker;

/// Phrases that end a Q&A conversation.
const QA_FAREWELL_KEYWORDS: &[&str] = &["bye", "that's all", "that is all"];

/// A turn-based conversation with an opening line.
#[async_trait]
pub trait Conversation: Send {
    /// The first line the assistant says, before any input.
    fn opening(&mut self) -> String;

    /// Reply to one utterance.
    async fn reply(&mut self, utterance: &str) -> String;

    /// Whether the conversation has reached its end.
    fn is_finished(&self) -> bool;

    /// Current dialogue stage, for conversations that have one.
    fn stage(&self) -> Option<DialogueStage> {
        None
    }
}

/// The approval dialogue about one subject.
pub struct ApprovalConversation {
    tracker: Arc<DialogueTracker>,
    session: DialogueSession,
}

impl ApprovalConversation {
    pub fn new(tracker: Arc<DialogueTracker>, session: DialogueSession) -> Self {
        Self { tracker, session }
    }

    pub fn session(&self) -> &DialogueSession {
        &self.session
    }

    /// Hand back the session, e.g. to inspect the transcript after a run.
    pub fn into_session(self) -> DialogueSession {
        self.session
    }
}

#[async_trait]
impl Conversation for ApprovalConversation {
    fn opening(&mut self) -> String {
        self.tracker.open(&mut self.session)
    }

    async fn reply(&mut self, utterance: &str) -> String {
        self.tracker.respond(&mut self.session, utterance).await.response
    }

    fn is_finished(&self) -> bool {
        self.session.is_complete()
    }

    fn stage(&self) -> Option<DialogueStage> {
        Some(self.session.stage())
    }
}

/// Keyword-matched Q&A until the user says goodbye.
pub struct QaConversation {
    script: Arc<QaScript>,
    selector: Box<dyn ResponseSelector>,
    transcript: Vec<TranscriptEntry>,
    finished: bool,
}

impl QaConversation {
    pub fn new(script: Arc<QaScript>, selector: Box<dyn ResponseSelector>) -> Self {
        Self {
            script,
            selector,
            transcript: Vec::new(),
            finished: false,
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    fn push(&mut self, speaker: Speaker, text: &str) {
        self.transcript.push(TranscriptEntry {
            speaker,
            text: text.to_string(),
            timestamp: chrono::Utc::now(),
        });
    }
}

#[async_trait]
impl Conversation for QaConversation {
    fn opening(&mut self) -> String {
        let greeting = self.script.greeting.clone();
        self.push(Speaker::Assistant, &greeting);
        greeting
    }

    async fn reply(&mut self, utterance: &str) -> String {
        self.push(Speaker::User, utterance);

        let lower = utterance.to_lowercase();
        let answer = if QA_FAREWELL_KEYWORDS.iter().any(|k| lower.contains(k)) {
            self.finished = true;
            "Goodbye! I'll be here if you need anything else.".to_string()
        } else {
            self.script.answer(utterance, self.selector.as_ref())
        };

        self.push(Speaker::Assistant, &answer);
        answer
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::responses::FixedTemplate;

    fn qa() -> QaConversation {
        QaConversation::new(Arc::new(QaScript::tilo_default("Tilo")), Box::new(FixedTemplate))
    }

    #[tokio::test]
    async fn qa_answers_until_goodbye() {
        let mut conversation = qa();
        assert!(conversation.opening().contains("Tilo"));
        assert!(conversation.stage().is_none());

        let answer = conversation.reply("How is compliance looking?").await;
        assert!(answer.contains("94%"));
        assert!(!conversation.is_finished());

        conversation.reply("ok, that's all").await;
        assert!(conversation.is_finished());

        // greeting + 2 × (user, assistant)
        assert_eq!(conversation.transcript().len(), 5);
    }
}
