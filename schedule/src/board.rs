//! Admin-facing read model over the reservation store.
//!
//! The board is a disposable cache: the store owns persisted state, and the
//! board is rebuilt from it on mount and on every change notification. After
//! a confirmed mutation the caller feeds the returned row back through
//! [`RequestBoard::apply_update`] instead of patching fields optimistically.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::model::{Reservation, ReservationStatus};
use crate::store::ReservationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardStatistics {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

pub struct RequestBoard<S: ReservationStore> {
    store: Arc<S>,
    requests: Arc<Mutex<Vec<Reservation>>>,
}

impl<S: ReservationStore> RequestBoard<S> {
    /// Initialize a fresh board from the store.
    pub async fn new(store: Arc<S>) -> anyhow::Result<Self> {
        let board = Self {
            store,
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        board.reload().await?;
        Ok(board)
    }

    /// Refetch the full request list from the store (newest first).
    pub async fn reload(&self) -> anyhow::Result<()> {
        let all = self.store.list_all().await?;
        *self.requests.lock().await = all;
        Ok(())
    }

    /// Replace the cached row matching a confirmed store mutation.
    ///
    /// Unknown ids are appended; the next reload reorders.
    pub async fn apply_update(&self, updated: Reservation) {
        let mut guard = self.requests.lock().await;
        match guard.iter_mut().find(|r| r.id == updated.id) {
            Some(slot) => *slot = updated,
            None => guard.push(updated),
        }
    }

    pub async fn all(&self) -> Vec<Reservation> {
        self.requests.lock().await.clone()
    }

    /// Requests awaiting a decision.
    pub async fn pending(&self) -> Vec<Reservation> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.status == ReservationStatus::Pending)
            .cloned()
            .collect()
    }

    /// Requests already decided (approved or rejected).
    pub async fn processed(&self) -> Vec<Reservation> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.status != ReservationStatus::Pending)
            .cloned()
            .collect()
    }

    pub async fn statistics(&self) -> BoardStatistics {
        let guard = self.requests.lock().await;
        let mut stats = BoardStatistics {
            total: guard.len(),
            ..Default::default()
        };

        for r in guard.iter() {
            match r.status {
                ReservationStatus::Pending => stats.pending += 1,
                ReservationStatus::Approved => stats.approved += 1,
                ReservationStatus::Rejected => stats.rejected += 1,
            }
        }

        stats
    }
}
