//! Approval queue — in-memory queue of approval items with broadcast to
//! subscribers.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::dialogue::subject::SubjectRecord;
use crate::error::RecorderError;

use super::model::{ApprovalDecision, ApprovalEvent, ApprovalItem};
use super::recorder::ApprovalRecorder;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// In-memory approval queue backed by a broadcast channel for fan-out.
pub struct ApprovalQueue {
    items: RwLock<VecDeque<ApprovalItem>>,
    tx: broadcast::Sender<ApprovalEvent>,
}

impl ApprovalQueue {
    /// Create an empty queue.
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            items: RwLock::new(VecDeque::new()),
            tx,
        })
    }

    /// Create a queue pre-filled with pending items, without broadcasting.
    pub fn with_subjects(subjects: impl IntoIterator<Item = SubjectRecord>) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        let items: VecDeque<ApprovalItem> = subjects.into_iter().map(ApprovalItem::new).collect();
        Arc::new(Self {
            items: RwLock::new(items),
            tx,
        })
    }

    /// Subscribe to queue events.
    pub fn subscribe(&self) -> broadcast::Receiver<ApprovalEvent> {
        self.tx.subscribe()
    }

    /// Queue a new pending item and broadcast it. Returns false if an item
    /// with the same id is already queued.
    pub async fn push(&self, subject: SubjectRecord) -> bool {
        let mut items = self.items.write().await;

        if items.iter().any(|i| i.subject.id == subject.id) {
            warn!(subject_id = %subject.id, "Approval item already queued");
            return false;
        }

        let item = ApprovalItem::new(subject);
        info!(
            subject_id = %item.subject.id,
            requested_by = %item.subject.requested_by,
            category = %item.subject.category,
            "Approval item queued"
        );

        // Ok if no receivers are listening
        let _ = self.tx.send(ApprovalEvent::ItemQueued { item: item.clone() });
        items.push_back(item);
        self.broadcast_counts(&items);
        true
    }

    /// Look up an item by subject id.
    pub async fn get(&self, id: &str) -> Option<ApprovalItem> {
        let items = self.items.read().await;
        items.iter().find(|i| i.subject.id == id).cloned()
    }

    /// All pending items, oldest first.
    pub async fn pending(&self) -> Vec<ApprovalItem> {
        let items = self.items.read().await;
        items.iter().filter(|i| i.is_pending()).cloned().collect()
    }

    /// The oldest pending item, if any.
    pub async fn next_pending(&self) -> Option<ApprovalItem> {
        let items = self.items.read().await;
        items.iter().find(|i| i.is_pending()).cloned()
    }

    /// Apply a decision to a pending item. Returns the updated item.
    pub async fn decide(&self, decision: &ApprovalDecision) -> Result<ApprovalItem, RecorderError> {
        let mut items = self.items.write().await;

        let item = items
            .iter_mut()
            .find(|i| i.subject.id == decision.subject_id)
            .ok_or_else(|| RecorderError::NotFound {
                id: decision.subject_id.clone(),
            })?;

        if !item.is_pending() {
            debug!(subject_id = %decision.subject_id, status = %item.status, "Cannot decide non-pending item");
            return Err(RecorderError::AlreadyDecided {
                id: decision.subject_id.clone(),
                status: item.status.to_string(),
            });
        }

        let status = decision.status();
        item.status = status;
        item.decided_by = Some(decision.actor_label.clone());
        item.comment = Some(decision.comment.clone());
        item.updated_at = decision.decided_at;
        let decided = item.clone();

        info!(
            subject_id = %decision.subject_id,
            status = %status,
            actor = %decision.actor_label,
            "Approval item decided"
        );

        let _ = self.tx.send(ApprovalEvent::ItemDecided {
            id: decision.subject_id.clone(),
            status,
            actor_label: decision.actor_label.clone(),
        });
        self.broadcast_counts(&items);

        Ok(decided)
    }

    /// Total number of items (all statuses).
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn broadcast_counts(&self, items: &VecDeque<ApprovalItem>) {
        let pending = items.iter().filter(|i| i.is_pending()).count();
        let _ = self.tx.send(ApprovalEvent::PendingCount {
            pending,
            total: items.len(),
        });
    }
}

#[async_trait]
impl ApprovalRecorder for ApprovalQueue {
    async fn record(&self, decision: &ApprovalDecision) -> Result<(), RecorderError> {
        self.decide(decision).await.map(|_| ())
    }
}
