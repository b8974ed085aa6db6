//! SqliteReservationStore
//! ----------------------
//! SQLite-backed implementation of the `ReservationStore` trait. It owns the
//! one `schedules` relation of the system and is responsible for:
//!
//!  - schema creation on startup
//!  - atomic single-row inserts and status/reschedule updates
//!  - the partial unique index backing supplier/day exclusivity
//!  - publishing a change event after every committed mutation
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tokio::sync::broadcast;

use super::{ChangeEvent, ChangeKind, ReservationStore};
use crate::model::{
    DeliveryCategory, NewReservation, Reservation, ReservationId, ReservationStatus, SlotLabel,
};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

pub struct SqliteReservationStore {
    pool: SqlitePool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl SqliteReservationStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { pool, changes }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a new SQLite-backed store and ensure schema exists.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(path).await?;
        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `schedules` relation and its indexes if missing.
    ///
    /// The partial unique index enforces at most one pending/approved
    /// reservation per (supplier_name, scheduled_date). Rejected rows fall
    /// outside it, so a rejected supplier/day can be re-submitted.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                supplier_name TEXT NOT NULL,
                scheduled_date TEXT NOT NULL,
                scheduled_time TEXT NOT NULL,
                vehicle_type TEXT NOT NULL,
                delivery_type TEXT NOT NULL,
                purchase_order TEXT NOT NULL,
                pallet_quantity INTEGER NOT NULL CHECK (pallet_quantity > 0),
                observations TEXT,
                status TEXT NOT NULL,
                rejection_reason TEXT,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_schedules_active_supplier_day
            ON schedules (supplier_name, scheduled_date)
            WHERE status IN ('pending', 'approved');
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn publish(&self, kind: ChangeKind, id: ReservationId) {
        // No subscribers is fine; the feed may not be running.
        let _ = self.changes.send(ChangeEvent { kind, id });
    }

    async fn fetch(&self, id: ReservationId) -> anyhow::Result<Option<Reservation>> {
        let row = sqlx::query("SELECT * FROM schedules WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_reservation(&r)).transpose()
    }
}

fn row_to_reservation(row: &SqliteRow) -> anyhow::Result<Reservation> {
    let date_str: String = row.get("scheduled_date");
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid scheduled_date '{}': {}", date_str, e))?;

    let time_str: String = row.get("scheduled_time");

    let status_str: String = row.get("status");
    let status = ReservationStatus::from_str(&status_str)?;

    let category_str: String = row.get("delivery_type");
    let category = DeliveryCategory::from_str(&category_str)?;

    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| anyhow::anyhow!("Invalid created_at '{}': {}", created_at_str, e))?
        .with_timezone(&Utc);

    let updated_at = row
        .get::<Option<String>, _>("updated_at")
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| anyhow::anyhow!("Invalid updated_at '{}': {}", s, e))
        })
        .transpose()?;

    let pallet_raw: i64 = row.get("pallet_quantity");
    let pallet_quantity = u32::try_from(pallet_raw)
        .map_err(|e| anyhow::anyhow!("Invalid pallet_quantity '{}': {}", pallet_raw, e))?;

    Ok(Reservation {
        id: row.get("id"),
        supplier_name: row.get("supplier_name"),
        vehicle_type: row.get("vehicle_type"),
        category,
        purchase_order: row.get("purchase_order"),
        pallet_quantity,
        observations: row.get("observations"),
        requester_id: row.get("user_id"),
        date,
        time_slot: SlotLabel::from_stored(&time_str),
        status,
        rejection_reason: row.get("rejection_reason"),
        created_at,
        updated_at,
    })
}

#[async_trait]
impl ReservationStore for SqliteReservationStore {
    async fn insert(&self, new: NewReservation) -> anyhow::Result<Reservation> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO schedules (
                supplier_name, scheduled_date, scheduled_time,
                vehicle_type, delivery_type, purchase_order,
                pallet_quantity, observations, status,
                rejection_reason, user_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', NULL, ?, ?, NULL);
        "#,
        )
        .bind(&new.supplier_name)
        .bind(new.date.format("%Y-%m-%d").to_string())
        .bind(new.time_slot.as_str())
        .bind(&new.vehicle_type)
        .bind(new.category.to_string())
        .bind(&new.purchase_order)
        .bind(new.pallet_quantity as i64)
        .bind(&new.observations)
        .bind(&new.requester_id)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.publish(ChangeKind::Inserted, id);

        Ok(Reservation {
            id,
            supplier_name: new.supplier_name,
            vehicle_type: new.vehicle_type,
            category: new.category,
            purchase_order: new.purchase_order,
            pallet_quantity: new.pallet_quantity,
            observations: new.observations,
            requester_id: new.requester_id,
            date: new.date,
            time_slot: new.time_slot,
            status: ReservationStatus::Pending,
            rejection_reason: None,
            created_at,
            updated_at: None,
        })
    }

    async fn get(&self, id: ReservationId) -> anyhow::Result<Option<Reservation>> {
        self.fetch(id).await
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Reservation>> {
        let rows = sqlx::query("SELECT * FROM schedules ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_reservation).collect()
    }

    async fn active_on(
        &self,
        date: NaiveDate,
        category: Option<DeliveryCategory>,
    ) -> anyhow::Result<Vec<Reservation>> {
        let date_str = date.format("%Y-%m-%d").to_string();

        let rows = match category {
            Some(cat) => {
                sqlx::query(
                    r#"
                    SELECT * FROM schedules
                    WHERE scheduled_date = ?
                      AND status IN ('pending', 'approved')
                      AND delivery_type = ?
                    ORDER BY scheduled_time;
                "#,
                )
                .bind(&date_str)
                .bind(cat.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT * FROM schedules
                    WHERE scheduled_date = ?
                      AND status IN ('pending', 'approved')
                    ORDER BY scheduled_time;
                "#,
                )
                .bind(&date_str)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(row_to_reservation).collect()
    }

    async fn active_for_supplier(
        &self,
        supplier: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<Reservation>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM schedules
            WHERE supplier_name = ?
              AND scheduled_date = ?
              AND status IN ('pending', 'approved');
        "#,
        )
        .bind(supplier)
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_reservation).collect()
    }

    async fn apply_decision(
        &self,
        id: ReservationId,
        status: ReservationStatus,
        rejection_reason: Option<String>,
    ) -> anyhow::Result<Option<Reservation>> {
        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET status = ?, rejection_reason = ?, updated_at = ?
            WHERE id = ?;
        "#,
        )
        .bind(status.to_string())
        .bind(&rejection_reason)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.publish(ChangeKind::Updated, id);
        self.fetch(id).await
    }

    async fn apply_reschedule(
        &self,
        id: ReservationId,
        new_date: NaiveDate,
        new_slot: SlotLabel,
    ) -> anyhow::Result<Option<Reservation>> {
        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET scheduled_date = ?, scheduled_time = ?,
                status = 'approved', rejection_reason = NULL, updated_at = ?
            WHERE id = ?;
        "#,
        )
        .bind(new_date.format("%Y-%m-%d").to_string())
        .bind(new_slot.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.publish(ChangeKind::Updated, id);
        self.fetch(id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
