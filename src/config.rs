//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dashboard role of the person talking to the assistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Ceo,
    Admin,
    Manager,
    Client,
    Viewer,
}

impl Role {
    /// Whether this role may approve or reject queued items.
    pub fn can_decide_approvals(&self) -> bool {
        matches!(self, Self::Ceo | Self::Admin)
    }

    /// Human-readable title used in actor labels.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Ceo => "CEO",
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Client => "Client",
            Self::Viewer => "Viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ceo => "ceo",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Client => "client",
            Self::Viewer => "viewer",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ceo" => Ok(Self::Ceo),
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "client" => Ok(Self::Client),
            "viewer" => Ok(Self::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Who is speaking to the assistant. Passed explicitly to the tracker and
/// the approval recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    pub role: Role,
    /// Label recorded alongside every decision.
    pub label: String,
}

impl ActorContext {
    /// Build the default label for a role, e.g. "CEO via Tilo voice".
    pub fn for_role(role: Role, assistant_name: &str) -> Self {
        Self {
            role,
            label: format!("{} via {} voice", role.title(), assistant_name),
        }
    }
}

/// How scripted responses are picked from their pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Always the first template (deterministic).
    Fixed,
    /// A uniformly random template.
    Random,
}

impl std::str::FromStr for ResponseMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "random" => Ok(Self::Random),
            other => Err(format!("Unknown response mode: {}", other)),
        }
    }
}

/// Which conversation the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantMode {
    /// Walk through a pending approval item.
    Approval,
    /// Keyword-matched questions and answers.
    Qa,
}

impl std::str::FromStr for AssistantMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approval" => Ok(Self::Approval),
            "qa" => Ok(Self::Qa),
            other => Err(format!("Unknown mode: {}", other)),
        }
    }
}

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Name the assistant uses for itself.
    pub assistant_name: String,
    /// Role and actor label of the current user.
    pub actor: ActorContext,
    /// Cosmetic delay before every reply.
    pub thinking_delay: Duration,
    /// Delay between completing a dialogue and tearing it down.
    pub teardown_delay: Duration,
    pub response_mode: ResponseMode,
    pub mode: AssistantMode,
    /// Optional JSON file of approval items (seeded items when unset).
    pub approvals_path: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        let assistant_name = "Tilo".to_string();
        Self {
            actor: ActorContext::for_role(Role::default(), &assistant_name),
            assistant_name,
            thinking_delay: Duration::from_millis(800),
            teardown_delay: Duration::from_millis(3000),
            response_mode: ResponseMode::Random,
            mode: AssistantMode::Approval,
            approvals_path: None,
        }
    }
}

impl AssistantConfig {
    /// Read configuration from `TILO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let assistant_name = lookup("TILO_ASSISTANT_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.assistant_name);

        let role = match lookup("TILO_ROLE") {
            Some(raw) => raw.parse::<Role>().map_err(|message| ConfigError::InvalidValue {
                key: "TILO_ROLE".to_string(),
                message,
            })?,
            None => Role::default(),
        };

        let mut actor = ActorContext::for_role(role, &assistant_name);
        if let Some(label) = lookup("TILO_ACTOR_LABEL").filter(|s| !s.trim().is_empty()) {
            actor.label = label.trim().to_string();
        }

        let thinking_delay =
            parse_millis(&lookup, "TILO_THINKING_DELAY_MS")?.unwrap_or(defaults.thinking_delay);
        let teardown_delay =
            parse_millis(&lookup, "TILO_TEARDOWN_DELAY_MS")?.unwrap_or(defaults.teardown_delay);

        let response_mode = match lookup("TILO_RESPONSE_MODE") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "TILO_RESPONSE_MODE".to_string(),
                message,
            })?,
            None => defaults.response_mode,
        };

        let mode = match lookup("TILO_MODE") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "TILO_MODE".to_string(),
                message,
            })?,
            None => defaults.mode,
        };

        let approvals_path = lookup("TILO_APPROVALS_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            assistant_name,
            actor,
            thinking_delay,
            teardown_delay,
            response_mode,
            mode,
            approvals_path,
        })
    }

    /// Reject role/mode combinations the dashboard would not render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == AssistantMode::Approval && !self.actor.role.can_decide_approvals() {
            return Err(ConfigError::NotPermitted {
                role: self.actor.role.to_string(),
                action: "decide approvals".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}
