//! Approval-recording collaborator.

use async_trait::async_trait;

use crate::error::RecorderError;

use super::model::ApprovalDecision;

/// Write-only sink for approval decisions made in a dialogue.
///
/// Called once per completed decision. Callers log failures and move on; a
/// recorder error never changes the dialogue outcome.
#[async_trait]
pub trait ApprovalRecorder: Send + Sync {
    async fn record(&self, decision: &ApprovalDecision) -> Result<(), RecorderError>;
}
