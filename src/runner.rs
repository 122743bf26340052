//! Conversation runner — feeds utterances from a channel into a
//! conversation and sends the replies back.
//!
//! Each reply is preceded by a cosmetic "thinking" delay, and a finished
//! conversation is torn down after a fixed delay. Both delays race the
//! session's cancellation token: cancelling during a thinking delay drops
//! the pending reply without applying the turn.

use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::channels::{Channel, IncomingMessage, OutgoingResponse, StatusUpdate};
use crate::config::AssistantConfig;
use crate::dialogue::conversation::Conversation;
use crate::error::ChannelError;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// The conversation finished and was torn down.
    Completed,
    /// The session was cancelled before the conversation finished.
    Cancelled,
    /// The input stream ended first.
    InputClosed,
    /// The user typed a quit command.
    Quit,
}

/// Summary of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Utterances that were answered.
    pub turns: usize,
    pub end: RunEnd,
}

/// Drives one conversation over one channel.
#[derive(Debug, Clone)]
pub struct ConversationRunner {
    thinking_delay: Duration,
    teardown_delay: Duration,
}

impl ConversationRunner {
    pub fn new(thinking_delay: Duration, teardown_delay: Duration) -> Self {
        Self {
            thinking_delay,
            teardown_delay,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.thinking_delay, config.teardown_delay)
    }

    /// Run `conversation` until it finishes, the input ends, the user quits
    /// or `cancel` fires. The channel is always shut down afterwards.
    pub async fn run<C>(
        &self,
        conversation: &mut C,
        channel: &dyn Channel,
        cancel: &CancellationToken,
    ) -> Result<RunReport, ChannelError>
    where
        C: Conversation + ?Sized,
    {
        let mut stream = channel.start().await?;
        info!(channel = channel.name(), "Conversation started");

        let opening = conversation.opening();
        deliver(channel, None, opening).await;

        let mut turns = 0;
        let end = loop {
            let message = tokio::select! {
                biased;
                _ = cancel.cancelled() => break RunEnd::Cancelled,
                msg = stream.next() => match msg {
                    Some(m) => m,
                    None => break RunEnd::InputClosed,
                },
            };

            if is_quit_command(&message.content) {
                break RunEnd::Quit;
            }

            notify(channel, StatusUpdate::Thinking("Thinking…".to_string())).await;
            if !pause(self.thinking_delay, cancel).await {
                debug!(message_id = %message.id, "Cancelled while thinking, dropping reply");
                break RunEnd::Cancelled;
            }

            let before = conversation.stage();
            let reply = conversation.reply(&message.content).await;
            turns += 1;

            if let (Some(from), Some(to)) = (before, conversation.stage())
                && from != to
            {
                notify(
                    channel,
                    StatusUpdate::StageChanged {
                        from: from.to_string(),
                        to: to.to_string(),
                    },
                )
                .await;
            }

            deliver(channel, Some(&message), reply).await;

            if conversation.is_finished() {
                // A cancelled teardown only shortens the wait.
                pause(self.teardown_delay, cancel).await;
                break RunEnd::Completed;
            }
        };

        if let Err(e) = channel.shutdown().await {
            warn!(channel = channel.name(), error = %e, "Channel shutdown failed");
        }
        info!(channel = channel.name(), turns, end = ?end, "Conversation ended");

        Ok(RunReport { turns, end })
    }
}

/// Sleep for `delay` unless `cancel` fires first. Returns false if cancelled.
async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

fn is_quit_command(content: &str) -> bool {
    matches!(content.trim().to_lowercase().as_str(), "/quit" | "/exit")
}

/// Output delivery is best-effort; failures are logged.
async fn deliver(channel: &dyn Channel, msg: Option<&IncomingMessage>, text: String) {
    if let Err(e) = channel.respond(msg, OutgoingResponse::text(text)).await {
        warn!(channel = channel.name(), error = %e, "Failed to deliver response");
    }
}

async fn notify(channel: &dyn Channel, status: StatusUpdate) {
    if let Err(e) = channel.send_status(status).await {
        debug!(channel = channel.name(), error = %e, "Failed to send status");
    }
}
