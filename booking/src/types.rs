//! Common types and boundary traits used by the booking subsystem.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use schedule::model::{DeliveryCategory, Reservation, ReservationId, SlotLabel};

/// Admin outcome for a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A supplier-facing booking submission, before validation.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub supplier_name: String,
    pub vehicle_type: String,
    pub category: DeliveryCategory,
    pub purchase_order: String,
    pub pallet_quantity: u32,
    pub observations: Option<String>,
    pub requester_id: String,
    pub date: NaiveDate,
    pub time_slot: SlotLabel,
}

/// Errors surfaced by the booking paths.
///
/// None of these are fatal: validation and conflicts re-prompt the user,
/// store errors are visible and retried by user action, and notification
/// failures never undo a committed decision.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("pallet quantity must be positive")]
    InvalidPalletQuantity,

    #[error("time slot {0} is not in the slot catalog")]
    UnknownSlot(String),

    #[error("supplier '{supplier}' already has an active booking on {date}")]
    Conflict { supplier: String, date: NaiveDate },

    #[error("reservation {0} not found")]
    NotFound(ReservationId),

    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("notification dispatch failed: {0}")]
    Notification(String),
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct NotifyError(pub String);

/// Outcome of a committed lifecycle transition.
///
/// `notify_error` carries the dispatch failure, if any, as a warning for the
/// caller; the transition itself has already been persisted.
#[derive(Debug)]
pub struct DecisionReceipt {
    pub reservation: Reservation,
    pub notify_error: Option<String>,
}

/// Boundary to the outbound notification channel (email or similar).
///
/// Invoked after the state transition commits. Fire-and-forget with respect
/// to correctness: failures are reported, never retried here, and never roll
/// back the decision.
#[async_trait]
pub trait DecisionNotifier: Send + Sync {
    async fn notify(
        &self,
        id: ReservationId,
        outcome: Decision,
        reason: Option<&str>,
    ) -> Result<(), NotifyError>;
}
