//! Approval queue — the pending items the assistant talks about and the
//! sink its decisions are recorded into.

pub mod model;
pub mod queue;
pub mod recorder;
pub mod seed;

pub use model::{ApprovalDecision, ApprovalEvent, ApprovalItem, ApprovalStatus};
pub use queue::ApprovalQueue;
pub use recorder::ApprovalRecorder;
