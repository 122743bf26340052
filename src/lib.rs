//! Tilo Assist — scripted voice assistant for the agent-organization
//! dashboard.

pub mod approvals;
pub mod channels;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod runner;
