//! ScriptedChannel — replays a fixed list of utterances and captures every
//! reply. Used for demos and tests.
//!
//! - `start()` yields the scripted utterances in order, then either ends the
//!   stream or, with `hold_open`, keeps it pending until the runner stops.
//! - `respond()` and `send_status()` append to in-memory logs.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use tokio::sync::Mutex;

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate};
use crate::error::ChannelError;

/// A channel driven by a predefined script of utterances.
pub struct ScriptedChannel {
    utterances: Vec<String>,
    hold_open: bool,
    started: AtomicBool,
    responses: Mutex<Vec<String>>,
    statuses: Mutex<Vec<StatusUpdate>>,
    shut_down: AtomicBool,
}

impl ScriptedChannel {
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            utterances: utterances.into_iter().map(Into::into).collect(),
            hold_open: false,
            started: AtomicBool::new(false),
            responses: Mutex::new(Vec::new()),
            statuses: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Keep the stream open after the last utterance instead of ending it.
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Every response delivered so far, in order.
    pub async fn responses(&self) -> Vec<String> {
        self.responses.lock().await.clone()
    }

    /// Every status update delivered so far, in order.
    pub async fn statuses(&self) -> Vec<StatusUpdate> {
        self.statuses.lock().await.clone()
    }

    /// Whether `shutdown()` was called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ChannelError::AlreadyStarted {
                name: self.name().to_string(),
            });
        }

        let messages: Vec<IncomingMessage> = self
            .utterances
            .iter()
            .map(|u| IncomingMessage::new("scripted", "scripted-user", u))
            .collect();
        let scripted = stream::iter(messages);

        if self.hold_open {
            Ok(Box::pin(scripted.chain(stream::pending())))
        } else {
            Ok(Box::pin(scripted))
        }
    }

    async fn respond(
        &self,
        _msg: Option<&IncomingMessage>,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        self.responses.lock().await.push(response.content);
        Ok(())
    }

    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError> {
        self.statuses.lock().await.push(status);
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}
