pub mod sqlite_store;

use chrono::NaiveDate;
use tokio::sync::broadcast;

use crate::model::{
    DeliveryCategory, NewReservation, Reservation, ReservationId, ReservationStatus, SlotLabel,
};

/// Row-level change signal for the `schedules` relation.
///
/// Delivered at-least-once; consumers treat every event as "recompute now"
/// without inspecting the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub id: ReservationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Updated,
}

#[async_trait::async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persist a new booking as pending. The store assigns id and created_at.
    async fn insert(&self, new: NewReservation) -> anyhow::Result<Reservation>;

    async fn get(&self, id: ReservationId) -> anyhow::Result<Option<Reservation>>;

    /// Every reservation, newest first. Feeds the admin read model.
    async fn list_all(&self) -> anyhow::Result<Vec<Reservation>>;

    /// Active (pending or approved) reservations for a date. A category
    /// filter scopes occupancy to that category; `None` counts everything.
    async fn active_on(
        &self,
        date: NaiveDate,
        category: Option<DeliveryCategory>,
    ) -> anyhow::Result<Vec<Reservation>>;

    /// Active reservations for an exact supplier name on a date.
    async fn active_for_supplier(
        &self,
        supplier: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<Reservation>>;

    /// Atomic single-row status transition. `None` if the row is missing.
    async fn apply_decision(
        &self,
        id: ReservationId,
        status: ReservationStatus,
        rejection_reason: Option<String>,
    ) -> anyhow::Result<Option<Reservation>>;

    /// Atomic single-row reschedule: new date/slot, status forced to
    /// approved, rejection reason cleared. `None` if the row is missing.
    async fn apply_reschedule(
        &self,
        id: ReservationId,
        new_date: NaiveDate,
        new_slot: SlotLabel,
    ) -> anyhow::Result<Option<Reservation>>;

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
