//! Dialogue stage tracker — classifies each utterance, picks the scripted
//! reply and moves the session to its next stage.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::approvals::model::ApprovalDecision;
use crate::approvals::recorder::ApprovalRecorder;
use crate::config::{ActorContext, AssistantConfig};

use super::intent::{Intent, IntentClassification, IntentClassifier};
use super::responses::{
    RandomFromSet, ResponseKind, ResponseSelector, TemplateContext, choose, selector_for,
};
use super::session::DialogueSession;
use super::stage::{DialogueOutcome, DialogueStage};

/// Where one (stage, intent) pair leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: DialogueStage,
    pub kind: ResponseKind,
    pub outcome: Option<DialogueOutcome>,
}

/// The transition table of the approval dialogue.
///
/// At `AwaitingReviewConsent` every intent moves on to the decision: hearing
/// the details is optional, so deny and unclear only shorten the prompt.
pub fn next_step(stage: DialogueStage, intent: Intent) -> Step {
    use DialogueStage::*;

    let (next, kind, outcome) = match (stage, intent) {
        (Initial, Intent::Affirm) => (AwaitingReviewConsent, ResponseKind::Summary, None),
        (Initial, Intent::Deny) => (Complete, ResponseKind::Farewell, Some(DialogueOutcome::Declined)),
        (Initial, Intent::Unclear) => (Initial, ResponseKind::Clarify, None),

        (AwaitingReviewConsent, Intent::Affirm) => (AwaitingDecision, ResponseKind::FullDetail, None),
        (AwaitingReviewConsent, _) => (AwaitingDecision, ResponseKind::AbbreviatedPrompt, None),

        (AwaitingDecision, Intent::Affirm) => (Complete, ResponseKind::Approved, Some(DialogueOutcome::Approved)),
        (AwaitingDecision, Intent::Deny) => (Complete, ResponseKind::Rejected, Some(DialogueOutcome::Rejected)),
        (AwaitingDecision, Intent::Unclear) => (AwaitingDecision, ResponseKind::DecisionReprompt, None),

        (Complete, _) => (Complete, ResponseKind::SessionClosed, None),
    };

    Step { next, kind, outcome }
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub response: String,
    pub kind: ResponseKind,
    pub intent: Intent,
    pub from: DialogueStage,
    pub to: DialogueStage,
    /// Set on the turn that completes the session.
    pub outcome: Option<DialogueOutcome>,
}

impl Turn {
    /// Whether the stage stayed the same (a retry prompt or a closed session).
    pub fn is_retry(&self) -> bool {
        self.from == self.to
    }
}

/// Drives `DialogueSession`s through the scripted approval conversation.
pub struct DialogueTracker {
    assistant_name: String,
    actor: ActorContext,
    selector: Box<dyn ResponseSelector>,
    recorder: Arc<dyn ApprovalRecorder>,
}

impl DialogueTracker {
    /// Create a tracker with random response selection.
    pub fn new(
        assistant_name: impl Into<String>,
        actor: ActorContext,
        recorder: Arc<dyn ApprovalRecorder>,
    ) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            actor,
            selector: Box::new(RandomFromSet),
            recorder,
        }
    }

    /// Create a tracker from the assistant configuration.
    pub fn from_config(config: &AssistantConfig, recorder: Arc<dyn ApprovalRecorder>) -> Self {
        Self {
            assistant_name: config.assistant_name.clone(),
            actor: config.actor.clone(),
            selector: selector_for(config.response_mode),
            recorder,
        }
    }

    /// Replace the response selection strategy.
    pub fn with_selector(mut self, selector: impl ResponseSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn actor(&self) -> &ActorContext {
        &self.actor
    }

    /// Produce the opening line for a fresh session.
    pub fn open(&self, session: &mut DialogueSession) -> String {
        let greeting = self.render(session, ResponseKind::Greeting);
        session.record_assistant(greeting.clone());
        info!(
            session_id = %session.id,
            subject_id = %session.subject().id,
            "Dialogue opened"
        );
        greeting
    }

    /// Handle one user utterance: log it, classify it for the current stage
    /// and advance.
    pub async fn respond(&self, session: &mut DialogueSession, utterance: &str) -> Turn {
        session.record_user(utterance);
        let classification = self.classify(session, utterance);
        debug!(
            session_id = %session.id,
            stage = %session.stage(),
            intent = %classification.intent,
            keyword = ?classification.matched_keyword,
            "Utterance classified"
        );
        self.advance(session, &classification).await
    }

    /// Classify an utterance with the keyword sets of the session's current
    /// stage. At `AwaitingDecision` this uses the decision sets, where
    /// "reject" denies and "later" is unclear.
    pub fn classify(&self, session: &DialogueSession, utterance: &str) -> IntentClassification {
        IntentClassifier::for_stage(session.stage()).classify(utterance)
    }

    /// Apply a classification to the session and produce the reply.
    ///
    /// The classification must come from [`DialogueTracker::classify`] (or
    /// `IntentClassifier::for_stage(session.stage())`). `classify_intent`
    /// uses the general sets and misreads decision-stage answers.
    ///
    /// Leaving `AwaitingDecision` for `Complete` records the decision exactly
    /// once, before the reply is produced. Recorder failures are logged only.
    pub async fn advance(
        &self,
        session: &mut DialogueSession,
        classification: &IntentClassification,
    ) -> Turn {
        let from = session.stage();
        let step = next_step(from, classification.intent);

        if step.next != from || step.outcome.is_some() {
            session.enter(step.next, step.outcome);
        }

        if from == DialogueStage::AwaitingDecision
            && let Some(outcome) = step.outcome
            && outcome.is_decision()
        {
            self.record_decision(session, outcome).await;
        }

        if let Some(outcome) = step.outcome {
            info!(
                session_id = %session.id,
                subject_id = %session.subject().id,
                outcome = %outcome,
                "Dialogue complete"
            );
        }

        let response = self.render(session, step.kind);
        session.record_assistant(response.clone());

        Turn {
            response,
            kind: step.kind,
            intent: classification.intent,
            from,
            to: session.stage(),
            outcome: step.outcome,
        }
    }

    async fn record_decision(&self, session: &DialogueSession, outcome: DialogueOutcome) {
        let approved = outcome == DialogueOutcome::Approved;
        let verb = if approved { "Approved" } else { "Rejected" };
        let comment = format!(
            "{} by voice: \"{}\"",
            verb,
            session.last_utterance().unwrap_or_default()
        );
        let decision = ApprovalDecision::new(
            session.subject().id.clone(),
            approved,
            self.actor.label.clone(),
            comment,
        );

        if let Err(e) = self.recorder.record(&decision).await {
            warn!(
                session_id = %session.id,
                subject_id = %decision.subject_id,
                error = %e,
                "Failed to record approval decision"
            );
        }
    }

    fn render(&self, session: &DialogueSession, kind: ResponseKind) -> String {
        let template = choose(self.selector.as_ref(), kind.templates())
            .copied()
            .unwrap_or_default();
        TemplateContext {
            assistant: &self.assistant_name,
            subject: session.subject(),
        }
        .render(template)
    }
}
