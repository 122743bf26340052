//! Channel trait and the message types that flow through it.
//!
//! A channel is both the utterance source (speech-to-text or typed input)
//! and the response sink (text-to-speech or on-screen transcript).

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

use crate::error::ChannelError;

/// Stream of utterances produced by a channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// One final utterance received from the user.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Name of the channel that produced it.
    pub channel: String,
    pub user_id: String,
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(
        channel: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            user_id: user_id.into(),
            content: content.into(),
            received_at: Utc::now(),
        }
    }
}

/// A reply to display and optionally speak.
#[derive(Debug, Clone)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Transient status shown while the assistant works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The assistant is "thinking" before it replies.
    Thinking(String),
    /// The dialogue changed stage.
    StageChanged { from: String, to: String },
    /// Free-form status line.
    Status(String),
}

/// Utterance source and response sink.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name, used in logs and on incoming messages.
    fn name(&self) -> &str;

    /// Start producing utterances.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Deliver a response. `msg` is the utterance being answered, or `None`
    /// for unprompted lines such as the greeting.
    async fn respond(
        &self,
        msg: Option<&IncomingMessage>,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    /// Show a status update. Delivery is best-effort.
    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError>;

    /// Release channel resources.
    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
