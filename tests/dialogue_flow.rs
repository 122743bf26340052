//! End-to-end dialogue scenarios through the public tracker API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tilo_assist::approvals::{ApprovalDecision, ApprovalQueue, ApprovalRecorder, ApprovalStatus};
use tilo_assist::config::{ActorContext, Role};
use tilo_assist::dialogue::responses::ResponseKind;
use tilo_assist::dialogue::{
    DialogueOutcome, DialogueSession, DialogueStage, DialogueTracker, FixedTemplate, SubjectRecord,
};
use tilo_assist::error::RecorderError;

#[derive(Default)]
struct CountingRecorder {
    decisions: Mutex<Vec<ApprovalDecision>>,
}

impl CountingRecorder {
    fn calls(&self) -> Vec<ApprovalDecision> {
        self.decisions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApprovalRecorder for CountingRecorder {
    async fn record(&self, decision: &ApprovalDecision) -> Result<(), RecorderError> {
        self.decisions.lock().unwrap().push(decision.clone());
        Ok(())
    }
}

fn subject() -> SubjectRecord {
    SubjectRecord::new("APR-7", "Renew the observability contract for another year.")
        .with_title("Observability renewal")
        .with_requester("Nova (Infrastructure Agent)")
}

fn tracker(recorder: Arc<dyn ApprovalRecorder>) -> DialogueTracker {
    DialogueTracker::new("Tilo", ActorContext::for_role(Role::Ceo, "Tilo"), recorder)
        .with_selector(FixedTemplate)
}

/// A session already waiting for the decision.
async fn at_decision(tracker: &DialogueTracker) -> DialogueSession {
    let mut session = DialogueSession::new(subject());
    tracker.open(&mut session);
    tracker.respond(&mut session, "yes").await;
    tracker.respond(&mut session, "yes").await;
    assert_eq!(session.stage(), DialogueStage::AwaitingDecision);
    session
}

#[tokio::test]
async fn agreeing_to_review_moves_to_consent() {
    let recorder = Arc::new(CountingRecorder::default());
    let tracker = tracker(recorder.clone());
    let mut session = DialogueSession::new(subject());

    let turn = tracker.respond(&mut session, "Sure, let's do it").await;

    assert_eq!(turn.to, DialogueStage::AwaitingReviewConsent);
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn declining_up_front_ends_without_recording() {
    let recorder = Arc::new(CountingRecorder::default());
    let tracker = tracker(recorder.clone());
    let mut session = DialogueSession::new(subject());

    let turn = tracker.respond(&mut session, "not right now").await;

    assert_eq!(turn.to, DialogueStage::Complete);
    assert_eq!(session.outcome(), Some(DialogueOutcome::Declined));
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn approving_records_once() {
    let recorder = Arc::new(CountingRecorder::default());
    let tracker = tracker(recorder.clone());
    let mut session = at_decision(&tracker).await;

    let turn = tracker.respond(&mut session, "yes I approve").await;

    assert_eq!(turn.to, DialogueStage::Complete);
    assert_eq!(session.outcome(), Some(DialogueOutcome::Approved));
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].approved);
    assert_eq!(calls[0].subject_id, "APR-7");
}

#[tokio::test]
async fn rejecting_records_once() {
    let recorder = Arc::new(CountingRecorder::default());
    let tracker = tracker(recorder.clone());
    let mut session = at_decision(&tracker).await;

    let turn = tracker.respond(&mut session, "please reject this").await;

    assert_eq!(turn.to, DialogueStage::Complete);
    assert_eq!(session.outcome(), Some(DialogueOutcome::Rejected));
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].approved);
}

#[tokio::test]
async fn unclear_decision_reprompts() {
    let recorder = Arc::new(CountingRecorder::default());
    let tracker = tracker(recorder.clone());
    let mut session = at_decision(&tracker).await;

    let turn = tracker.respond(&mut session, "maybe later").await;

    assert_eq!(turn.to, DialogueStage::AwaitingDecision);
    assert_eq!(turn.kind, ResponseKind::DecisionReprompt);
    assert_eq!(
        turn.response,
        ResponseKind::DecisionReprompt.templates()[0].replace("{title}", "Observability renewal")
    );
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn queue_records_the_decision() {
    let queue = ApprovalQueue::with_subjects([subject()]);
    let mut events = queue.subscribe();
    let tracker = tracker(queue.clone());
    let mut session = at_decision(&tracker).await;

    tracker.respond(&mut session, "okay, go ahead").await;

    let item = queue.get("APR-7").await.unwrap();
    assert_eq!(item.status, ApprovalStatus::Approved);
    assert_eq!(item.decided_by.as_deref(), Some("CEO via Tilo voice"));
    assert_eq!(
        item.comment.as_deref(),
        Some("Approved by voice: \"okay, go ahead\"")
    );
    assert!(queue.pending().await.is_empty());

    let event = events.recv().await.unwrap();
    assert!(matches!(
        event,
        tilo_assist::approvals::ApprovalEvent::ItemDecided { ref id, status: ApprovalStatus::Approved, .. }
            if id == "APR-7"
    ));
}

#[tokio::test]
async fn recording_for_unknown_item_keeps_dialogue_going() {
    // Queue without the subject: the recorder fails, the dialogue still completes
    let queue = ApprovalQueue::new();
    let tracker = tracker(queue.clone());
    let mut session = at_decision(&tracker).await;

    let turn = tracker.respond(&mut session, "no").await;

    assert_eq!(turn.kind, ResponseKind::Rejected);
    assert_eq!(session.outcome(), Some(DialogueOutcome::Rejected));
    assert!(queue.is_empty().await);
}
