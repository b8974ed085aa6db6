//! Supplier-facing submission path: validate, run the conflict guard, then
//! persist the request as pending.

use std::sync::Arc;

use availability::catalog::SlotCatalog;
use schedule::model::{NewReservation, Reservation};
use schedule::store::ReservationStore;

use crate::guard::check_conflict;
use crate::types::{BookingError, BookingRequest};

pub struct SubmissionService<S> {
    store: Arc<S>,
    catalog: SlotCatalog,
}

impl<S: ReservationStore> SubmissionService<S> {
    pub fn new(store: Arc<S>, catalog: SlotCatalog) -> Self {
        Self { store, catalog }
    }

    /// Validate and persist a new booking request.
    ///
    /// Validation failures and conflicts are caught before any write. The
    /// guard is advisory: a submission racing another one for the same
    /// supplier/day can pass it and then lose at the store's unique index,
    /// which surfaces as a `Store` error.
    pub async fn submit(&self, request: BookingRequest) -> Result<Reservation, BookingError> {
        let supplier_name = request.supplier_name.trim().to_string();

        if supplier_name.is_empty() {
            return Err(BookingError::MissingField("supplier_name"));
        }
        if request.vehicle_type.trim().is_empty() {
            return Err(BookingError::MissingField("vehicle_type"));
        }
        if request.purchase_order.trim().is_empty() {
            return Err(BookingError::MissingField("purchase_order"));
        }
        if request.requester_id.trim().is_empty() {
            return Err(BookingError::MissingField("requester_id"));
        }
        if request.pallet_quantity == 0 {
            return Err(BookingError::InvalidPalletQuantity);
        }
        if !self.catalog.contains(&request.time_slot) {
            return Err(BookingError::UnknownSlot(request.time_slot.to_string()));
        }

        if check_conflict(self.store.as_ref(), &supplier_name, Some(request.date)).await? {
            return Err(BookingError::Conflict {
                supplier: supplier_name,
                date: request.date,
            });
        }

        let observations = request
            .observations
            .filter(|notes| !notes.trim().is_empty());

        let reservation = self
            .store
            .insert(NewReservation {
                supplier_name,
                vehicle_type: request.vehicle_type,
                category: request.category,
                purchase_order: request.purchase_order,
                pallet_quantity: request.pallet_quantity,
                observations,
                requester_id: request.requester_id,
                date: request.date,
                time_slot: request.time_slot,
            })
            .await
            .map_err(BookingError::Store)?;

        tracing::info!(
            id = reservation.id,
            supplier = %reservation.supplier_name,
            date = %reservation.date,
            slot = %reservation.time_slot,
            "booking request submitted"
        );

        Ok(reservation)
    }
}
