//! Runner behaviour over a scripted channel, with paused time.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use tilo_assist::approvals::{ApprovalQueue, ApprovalStatus};
use tilo_assist::channels::{ScriptedChannel, StatusUpdate};
use tilo_assist::config::{ActorContext, Role};
use tilo_assist::dialogue::qa::QaScript;
use tilo_assist::dialogue::{
    ApprovalConversation, Conversation, DialogueSession, DialogueStage, DialogueTracker,
    FixedTemplate, QaConversation, SubjectRecord,
};
use tilo_assist::runner::{ConversationRunner, RunEnd};

const THINKING: Duration = Duration::from_millis(800);
const TEARDOWN: Duration = Duration::from_millis(3000);

fn subject() -> SubjectRecord {
    SubjectRecord::new("APR-9", "Extend the analytics agent's data retention to 18 months.")
        .with_title("Retention extension")
}

fn approval(queue: &Arc<ApprovalQueue>) -> ApprovalConversation {
    let tracker = DialogueTracker::new(
        "Tilo",
        ActorContext::for_role(Role::Admin, "Tilo"),
        queue.clone(),
    )
    .with_selector(FixedTemplate);
    ApprovalConversation::new(Arc::new(tracker), DialogueSession::new(subject()))
}

fn runner() -> ConversationRunner {
    ConversationRunner::new(THINKING, TEARDOWN)
}

#[tokio::test(start_paused = true)]
async fn approval_runs_to_completion() {
    let queue = ApprovalQueue::with_subjects([subject()]);
    let mut conversation = approval(&queue);
    let channel = ScriptedChannel::new(["yes", "yes please", "sure, approve it"]).hold_open();

    let report = runner()
        .run(&mut conversation, &channel, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.end, RunEnd::Completed);
    assert_eq!(report.turns, 3);
    assert!(channel.is_shut_down());

    // Opening line plus one reply per turn
    assert_eq!(channel.responses().await.len(), 4);

    let statuses = channel.statuses().await;
    let thinking = statuses
        .iter()
        .filter(|s| matches!(s, StatusUpdate::Thinking(_)))
        .count();
    assert_eq!(thinking, 3);
    assert!(statuses.contains(&StatusUpdate::StageChanged {
        from: "awaiting_decision".to_string(),
        to: "complete".to_string(),
    }));

    let item = queue.get("APR-9").await.unwrap();
    assert_eq!(item.status, ApprovalStatus::Approved);
    assert_eq!(item.decided_by.as_deref(), Some("Admin via Tilo voice"));
}

#[tokio::test(start_paused = true)]
async fn input_ending_early_leaves_item_pending() {
    let queue = ApprovalQueue::with_subjects([subject()]);
    let mut conversation = approval(&queue);
    let channel = ScriptedChannel::new(["yes"]);

    let report = runner()
        .run(&mut conversation, &channel, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.end, RunEnd::InputClosed);
    assert_eq!(report.turns, 1);
    assert_eq!(
        conversation.session().stage(),
        DialogueStage::AwaitingReviewConsent
    );
    assert_eq!(queue.pending().await.len(), 1);
    assert!(channel.is_shut_down());
}

#[tokio::test(start_paused = true)]
async fn quit_command_stops_the_run() {
    let queue = ApprovalQueue::with_subjects([subject()]);
    let mut conversation = approval(&queue);
    let channel = ScriptedChannel::new(["yes", "/quit", "yes", "yes"]);

    let report = runner()
        .run(&mut conversation, &channel, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.end, RunEnd::Quit);
    assert_eq!(report.turns, 1);
    assert_eq!(queue.pending().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancelling_while_thinking_drops_the_turn() {
    let queue = ApprovalQueue::with_subjects([subject()]);
    let mut conversation = approval(&queue);
    let channel = ScriptedChannel::new(["yes", "yes", "yes"]).hold_open();

    // First turn finishes at 800ms; the second is still thinking at 1000ms
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            cancel.cancel();
        });
    }

    let report = runner()
        .run(&mut conversation, &channel, &cancel)
        .await
        .unwrap();

    assert_eq!(report.end, RunEnd::Cancelled);
    assert_eq!(report.turns, 1);
    assert_eq!(
        conversation.session().stage(),
        DialogueStage::AwaitingReviewConsent
    );
    // Greeting and the first reply only
    assert_eq!(channel.responses().await.len(), 2);
    assert_eq!(queue.pending().await.len(), 1);
    assert!(channel.is_shut_down());
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_input_still_greets() {
    let queue = ApprovalQueue::with_subjects([subject()]);
    let mut conversation = approval(&queue);
    let channel = ScriptedChannel::new(["yes"]).hold_open();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = runner()
        .run(&mut conversation, &channel, &cancel)
        .await
        .unwrap();

    assert_eq!(report.end, RunEnd::Cancelled);
    assert_eq!(report.turns, 0);
    assert_eq!(channel.responses().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn teardown_waits_before_returning() {
    let queue = ApprovalQueue::with_subjects([subject()]);
    let mut conversation = approval(&queue);
    let channel = ScriptedChannel::new(["no thanks"]).hold_open();

    let started = tokio::time::Instant::now();
    let report = runner()
        .run(&mut conversation, &channel, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.end, RunEnd::Completed);
    assert!(started.elapsed() >= THINKING + TEARDOWN);
    // Declining never touches the queue
    assert_eq!(queue.pending().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn qa_conversation_over_channel() {
    let mut conversation: Box<dyn Conversation> = Box::new(QaConversation::new(
        Arc::new(QaScript::tilo_default("Tilo")),
        Box::new(FixedTemplate),
    ));
    let channel = ScriptedChannel::new(["How is compliance looking?", "thanks, bye"]).hold_open();

    let report = runner()
        .run(conversation.as_mut(), &channel, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.end, RunEnd::Completed);
    assert_eq!(report.turns, 2);
    let responses = channel.responses().await;
    assert!(responses[1].contains("94%"));
    // Q&A has no stages to report
    assert!(
        !channel
            .statuses()
            .await
            .iter()
            .any(|s| matches!(s, StatusUpdate::StageChanged { .. }))
    );
}
