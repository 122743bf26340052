//! Error types for Tilo Assist.

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Role {role} is not allowed to {action}")]
    NotPermitted { role: String, action: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Channel {name} was already started")]
    AlreadyStarted { name: String },
}

/// Errors raised while turning loosely shaped input into a subject record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid record {id}: {reason}")]
    Invalid { id: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the approval-recording collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Approval item {id} not found")]
    NotFound { id: String },

    #[error("Approval item {id} already {status}")]
    AlreadyDecided { id: String, status: String },

    #[error("Recorder unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
