use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use tilo_assist::approvals::ApprovalQueue;
use tilo_assist::approvals::seed::demo_subjects;
use tilo_assist::channels::CliChannel;
use tilo_assist::config::{AssistantConfig, AssistantMode};
use tilo_assist::dialogue::conversation::{ApprovalConversation, Conversation, QaConversation};
use tilo_assist::dialogue::qa::QaScript;
use tilo_assist::dialogue::responses::selector_for;
use tilo_assist::dialogue::subject::load_subjects;
use tilo_assist::dialogue::{DialogueSession, DialogueTracker};
use tilo_assist::error::Result;
use tilo_assist::runner::{ConversationRunner, RunEnd};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AssistantConfig::from_env()?;
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        eprintln!("  export TILO_ROLE=ceo   (or TILO_MODE=qa)");
        std::process::exit(1);
    }

    eprintln!("🎙  Tilo Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Assistant: {}", config.assistant_name);
    eprintln!("   Acting as: {}", config.actor.label);
    eprintln!("   Mode: {:?}", config.mode);

    // ── Approval queue ──────────────────────────────────────────────────
    let subjects = match &config.approvals_path {
        Some(path) => {
            let loaded = load_subjects(path).await?;
            eprintln!("   Approvals: {} loaded from {}", loaded.len(), path.display());
            loaded
        }
        None => {
            let seeded = demo_subjects();
            eprintln!("   Approvals: {} demo items", seeded.len());
            seeded
        }
    };
    let queue = ApprovalQueue::with_subjects(subjects);

    // ── Conversation ────────────────────────────────────────────────────
    let mut conversation: Box<dyn Conversation> = match config.mode {
        AssistantMode::Approval => {
            let Some(item) = queue.next_pending().await else {
                eprintln!("   Nothing is waiting for approval.\n");
                return Ok(());
            };
            eprintln!("   Reviewing: {} ({})", item.subject.title, item.id());

            let tracker = DialogueTracker::from_config(&config, queue.clone());
            tracing::info!(actor = %tracker.actor().label, role = %tracker.actor().role, "Approval dialogue ready");
            let tracker = Arc::new(tracker);
            Box::new(ApprovalConversation::new(
                tracker,
                DialogueSession::new(item.subject),
            ))
        }
        AssistantMode::Qa => Box::new(QaConversation::new(
            Arc::new(QaScript::tilo_default(&config.assistant_name)),
            selector_for(config.response_mode),
        )),
    };
    eprintln!("   Type a reply and press Enter. /quit to exit.\n");

    // Ctrl-C cancels the session, including any pending delay
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let channel = CliChannel::new(config.assistant_name.clone());
    let runner = ConversationRunner::from_config(&config);
    let report = runner
        .run(conversation.as_mut(), &channel, &cancel)
        .await?;

    if report.end == RunEnd::Completed {
        for item in queue.pending().await {
            tracing::info!(subject_id = %item.id(), "Still pending");
        }
    }
    eprintln!(
        "\n   Session ended ({:?}) after {} turn(s).",
        report.end, report.turns
    );

    // The stdin reader thread is detached; returning here exits even while
    // it is still waiting for a line.

    Ok(())
}
