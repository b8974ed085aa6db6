//! The request lifecycle controller.
//!
//! Transitions: pending → approved | rejected, plus reschedule, which moves
//! a booking to a new date/slot and forces approved regardless of its prior
//! status. Rejected is terminal — a rejected request needs a brand-new
//! submission.
//!
//! Every operation commits the transition first and notifies second, so the
//! authoritative state never depends on the best-effort side effect.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::Instrument;

use common::logger::{TraceId, root_span};
use schedule::model::{ReservationId, ReservationStatus, SlotLabel};
use schedule::store::ReservationStore;

use crate::types::{BookingError, Decision, DecisionNotifier, DecisionReceipt};

pub struct LifecycleController<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S: ReservationStore, N: DecisionNotifier> LifecycleController<S, N> {
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Approve or reject a request.
    ///
    /// The rejection reason is stored as given (an empty reason is accepted;
    /// requiring one is a UI concern). Approval clears any stored reason so
    /// `rejection_reason` is present exactly when the status is rejected.
    pub async fn decide(
        &self,
        id: ReservationId,
        outcome: Decision,
        reason: Option<String>,
    ) -> Result<DecisionReceipt, BookingError> {
        let trace = TraceId::new();
        let span = root_span("decide", &trace);

        async {
            let (status, reason) = match outcome {
                Decision::Approved => (ReservationStatus::Approved, None),
                Decision::Rejected => (ReservationStatus::Rejected, reason),
            };

            let reservation = self
                .store
                .apply_decision(id, status, reason)
                .await
                .map_err(BookingError::Store)?
                .ok_or(BookingError::NotFound(id))?;

            tracing::info!(id, outcome = %outcome, "decision committed");

            let notify_error = self
                .dispatch(id, outcome, reservation.rejection_reason.as_deref())
                .await;

            Ok(DecisionReceipt {
                reservation,
                notify_error,
            })
        }
        .instrument(span)
        .await
    }

    /// Move a booking to a new date and slot.
    ///
    /// A reschedule is an implicit approval, whatever the prior status. The
    /// caller is responsible for having checked availability for the target
    /// slot; the controller does not re-validate it, accepting the narrow
    /// race window between that read and this write.
    pub async fn reschedule(
        &self,
        id: ReservationId,
        new_date: NaiveDate,
        new_slot: SlotLabel,
    ) -> Result<DecisionReceipt, BookingError> {
        let trace = TraceId::new();
        let span = root_span("reschedule", &trace);

        async {
            let reservation = self
                .store
                .apply_reschedule(id, new_date, new_slot)
                .await
                .map_err(BookingError::Store)?
                .ok_or(BookingError::NotFound(id))?;

            tracing::info!(
                id,
                date = %reservation.date,
                slot = %reservation.time_slot,
                "reschedule committed"
            );

            let notify_error = self.dispatch(id, Decision::Approved, None).await;

            Ok(DecisionReceipt {
                reservation,
                notify_error,
            })
        }
        .instrument(span)
        .await
    }

    /// Fire the post-commit notification. Failure is a warning, never a
    /// rollback.
    async fn dispatch(
        &self,
        id: ReservationId,
        outcome: Decision,
        reason: Option<&str>,
    ) -> Option<String> {
        match self.notifier.notify(id, outcome, reason).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(id, error = %e, "notification dispatch failed after commit");
                Some(e.to_string())
            }
        }
    }
}
