//! Scripted voice dialogue — the approval walkthrough and the Q&A demo.
//!
//! The approval dialogue is a small state machine. Each utterance is
//! classified by keyword, the stage tracker picks a scripted reply and the
//! next stage, and the decision is handed to an approval recorder when the
//! user approves or rejects.

pub mod conversation;
pub mod intent;
pub mod qa;
pub mod responses;
pub mod session;
pub mod stage;
pub mod subject;
pub mod tracker;

pub use conversation::{ApprovalConversation, Conversation, QaConversation};
pub use intent::{Intent, IntentClassification, IntentClassifier, classify_intent};
pub use qa::{QaRule, QaScript};
pub use responses::{FixedTemplate, RandomFromSet, ResponseKind, ResponseSelector};
pub use session::{DialogueSession, Speaker, TranscriptEntry};
pub use stage::{DialogueOutcome, DialogueStage};
pub use subject::SubjectRecord;
pub use tracker::{DialogueTracker, Turn};
