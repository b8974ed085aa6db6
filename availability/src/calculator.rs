//! Computes slot availability for one date from the reservations on it.
//
//  This module is deliberately pure: no async, no IO, no memory of prior
//  calls. Callers re-invoke it on every refresh trigger.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use schedule::model::{Reservation, SlotLabel};

use crate::catalog::SlotCatalog;

/// A booking above this pallet count spills into the next catalog slot.
pub const ADJACENCY_PALLET_THRESHOLD: u32 = 50;

/// Projection of the store state for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    /// Bookable labels, in catalog order. Excludes occupied labels and, for
    /// the current day, labels not strictly after the wall clock.
    pub available: Vec<SlotLabel>,
    /// Unavailable labels, in catalog order. Past-but-occupied labels stay
    /// here so they can still be displayed as taken.
    pub occupied: Vec<SlotLabel>,
}

/// Project `reservations` for `date` onto the catalog.
///
/// Rules:
///   - only active (pending/approved) reservations occupy a slot
///   - stored times are normalized to the canonical label width first
///   - a reservation above [`ADJACENCY_PALLET_THRESHOLD`] pallets also
///     occupies the next catalog slot, if one exists (no wraparound)
///   - when `date` is `now`'s day, a label is available only if its time is
///     strictly after `now`'s time-of-day; other dates ignore the clock
///
/// Stored labels that are not in the catalog never panic; they simply do not
/// appear in the output.
pub fn compute_availability(
    catalog: &SlotCatalog,
    now: NaiveDateTime,
    date: NaiveDate,
    reservations: &[Reservation],
) -> Availability {
    let mut taken: HashSet<SlotLabel> = HashSet::new();

    for r in reservations.iter().filter(|r| r.is_active()) {
        let slot = SlotLabel::from_stored(r.time_slot.as_str());

        if r.pallet_quantity > ADJACENCY_PALLET_THRESHOLD {
            if let Some(next) = catalog.next_after(&slot) {
                taken.insert(next.clone());
            }
        }

        taken.insert(slot);
    }

    let is_today = date == now.date();
    let now_time = now.time();

    let occupied: Vec<SlotLabel> = catalog
        .labels()
        .iter()
        .filter(|l| taken.contains(*l))
        .cloned()
        .collect();

    let available: Vec<SlotLabel> = catalog
        .labels()
        .iter()
        .filter(|l| !taken.contains(*l))
        .filter(|l| !is_today || l.time().map(|t| t > now_time).unwrap_or(false))
        .cloned()
        .collect();

    Availability {
        available,
        occupied,
    }
}
