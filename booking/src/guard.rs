//! The Booking Conflict Guard: at most one active booking per supplier per
//! day. Advisory at submission time — two concurrent submissions can both
//! pass this check; the store's partial unique index is the backstop.

use chrono::NaiveDate;

use schedule::store::ReservationStore;

use crate::types::BookingError;

/// True if `supplier` already has a pending or approved booking on `date`.
///
/// Matching is exact-string on the trimmed supplier name, no normalization.
/// An empty supplier or an unset date degrades safely to "no conflict";
/// callers are expected not to ask that early.
pub async fn check_conflict<S: ReservationStore>(
    store: &S,
    supplier: &str,
    date: Option<NaiveDate>,
) -> Result<bool, BookingError> {
    let supplier = supplier.trim();

    let Some(date) = date else {
        return Ok(false);
    };
    if supplier.is_empty() {
        return Ok(false);
    }

    let existing = store
        .active_for_supplier(supplier, date)
        .await
        .map_err(BookingError::Store)?;

    Ok(!existing.is_empty())
}
