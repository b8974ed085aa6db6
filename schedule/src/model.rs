use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned surrogate key. Autoincrement, so later rows sort higher.
pub type ReservationId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

impl FromStr for ReservationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "approved" => Ok(ReservationStatus::Approved),
            "rejected" => Ok(ReservationStatus::Rejected),
            other => Err(anyhow::anyhow!("Invalid reservation status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryCategory {
    RawMaterials,
    Flammable,
    Other,
}

impl fmt::Display for DeliveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryCategory::RawMaterials => "raw-materials",
            DeliveryCategory::Flammable => "flammable",
            DeliveryCategory::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for DeliveryCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw-materials" => Ok(DeliveryCategory::RawMaterials),
            "flammable" => Ok(DeliveryCategory::Flammable),
            "other" => Ok(DeliveryCategory::Other),
            other => Err(anyhow::anyhow!("Invalid delivery category: {}", other)),
        }
    }
}

/// Canonical `HH:MM` time label.
///
/// Stored values may carry seconds (`HH:MM:SS`); [`SlotLabel::from_stored`]
/// normalizes them to the canonical width. Lexicographic order coincides
/// with chronological order for zero-padded labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotLabel(String);

impl SlotLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Normalize a stored time value to the canonical `HH:MM` width.
    pub fn from_stored(raw: &str) -> Self {
        Self(raw.get(..5).unwrap_or(raw).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Time-of-day for wall-clock comparisons. `None` for malformed labels.
    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.0, "%H:%M").ok()
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A dock booking request as persisted in the `schedules` relation.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,

    // Who and what
    pub supplier_name: String,
    pub vehicle_type: String,
    pub category: DeliveryCategory,
    pub purchase_order: String,
    pub pallet_quantity: u32,
    pub observations: Option<String>,
    pub requester_id: String,

    // When
    pub date: NaiveDate,
    pub time_slot: SlotLabel,

    // Lifecycle
    pub status: ReservationStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Active reservations occupy a slot; rejected ones free it immediately.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Pending | ReservationStatus::Approved
        )
    }
}

/// Insert shape for a new booking submission. The store assigns the id and
/// `created_at`; the submission path always starts a booking as pending.
#[derive(Debug, Clone)]
pub struct NewReservation {
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
