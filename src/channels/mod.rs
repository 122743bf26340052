//! Channel abstraction for utterance input and response output.

pub mod channel;
pub mod cli;
pub mod scripted;

pub use channel::*;
pub use cli::CliChannel;
pub use scripted::ScriptedChannel;
