//! CLI channel — stdin/stdout REPL standing in for speech capture and
//! synthesis.
//!
//! Stdin is read on a detached OS thread rather than tokio's blocking pool.
//! A read still pending when the conversation ends would otherwise keep the
//! runtime from shutting down, and the process would only exit on the next
//! line of input.

use std::io::BufRead;

use async_trait::async_trait;
use futures::stream;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate};
use crate::error::ChannelError;

/// A CLI channel that reads utterances from stdin and writes replies to stdout.
pub struct CliChannel {
    assistant_name: String,
}

impl CliChannel {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
        }
    }
}

/// Stream the non-blank, trimmed lines of `reader` as CLI messages. The
/// stream ends at EOF or on a read error.
fn line_stream<R>(reader: R) -> std::io::Result<MessageStream>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("cli-stdin".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        let msg = IncomingMessage::new("cli", "local-user", line);
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        })?;

    let stream = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|msg| (msg, rx))
    });

    Ok(Box::pin(stream))
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        line_stream(std::io::BufReader::new(std::io::stdin())).map_err(|e| {
            ChannelError::StartupFailed {
                name: self.name().to_string(),
                reason: e.to_string(),
            }
        })
    }

    async fn respond(
        &self,
        _msg: Option<&IncomingMessage>,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let line = format!("\n{}: {}\n\n", self.assistant_name, response.content);
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: self.name().to_string(),
                reason: e.to_string(),
            })?;
        stdout.flush().await.map_err(|e| ChannelError::SendFailed {
            name: self.name().to_string(),
            reason: e.to_string(),
        })?;
        eprint!("> ");
        Ok(())
    }

    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError> {
        match status {
            StatusUpdate::Thinking(msg) => eprintln!("⏳ {}", msg),
            StatusUpdate::StageChanged { from, to } => {
                tracing::debug!(%from, %to, "Stage changed");
            }
            StatusUpdate::Status(msg) => eprintln!("ℹ️  {}", msg),
        }
        Ok(())
    }
}
