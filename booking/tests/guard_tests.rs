use chrono::{NaiveDate, Utc};

use booking::guard::check_conflict;
use schedule::model::{DeliveryCategory, Reservation, ReservationStatus, SlotLabel};

use mock_store::InMemoryReservationStore;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn booking_row(supplier: &str, d: u32, status: ReservationStatus) -> Reservation {
    Reservation {
        id: 1,
        supplier_name: supplier.into(),
        vehicle_type: "van".into(),
        category: DeliveryCategory::Other,
        purchase_order: "PO-1".into(),
        pallet_quantity: 10,
        observations: None,
        requester_id: "user-1".into(),
        date: day(d),
        time_slot: SlotLabel::new("10:00"),
        status,
        rejection_reason: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[tokio::test]
async fn pending_booking_conflicts() -> anyhow::Result<()> {
    let store = InMemoryReservationStore::default();
    store
        .seed(booking_row("Acme", 10, ReservationStatus::Pending))
        .await;

    assert!(check_conflict(&store, "Acme", Some(day(10))).await?);
    Ok(())
}

#[tokio::test]
async fn approved_booking_conflicts() -> anyhow::Result<()> {
    let store = InMemoryReservationStore::default();
    store
        .seed(booking_row("Acme", 10, ReservationStatus::Approved))
        .await;

    assert!(check_conflict(&store, "Acme", Some(day(10))).await?);
    Ok(())
}

#[tokio::test]
async fn rejected_booking_frees_the_day() -> anyhow::Result<()> {
    let store = InMemoryReservationStore::default();
    store
        .seed(booking_row("Acme", 10, ReservationStatus::Rejected))
        .await;

    assert!(!check_conflict(&store, "Acme", Some(day(10))).await?);
    Ok(())
}

#[tokio::test]
async fn other_day_or_supplier_is_no_conflict() -> anyhow::Result<()> {
    let store = InMemoryReservationStore::default();
    store
        .seed(booking_row("Acme", 10, ReservationStatus::Approved))
        .await;

    assert!(!check_conflict(&store, "Acme", Some(day(11))).await?);
    assert!(!check_conflict(&store, "Bolt", Some(day(10))).await?);
    Ok(())
}

#[tokio::test]
async fn supplier_name_is_trimmed_before_matching() -> anyhow::Result<()> {
    let store = InMemoryReservationStore::default();
    store
        .seed(booking_row("Acme", 10, ReservationStatus::Pending))
        .await;

    assert!(check_conflict(&store, "  Acme  ", Some(day(10))).await?);
    // No fuzzy matching beyond the trim.
    assert!(!check_conflict(&store, "ACME", Some(day(10))).await?);
    Ok(())
}

#[tokio::test]
async fn empty_supplier_or_unset_date_degrade_to_no_conflict() -> anyhow::Result<()> {
    let store = InMemoryReservationStore::default();
    store
        .seed(booking_row("Acme", 10, ReservationStatus::Pending))
        .await;

    assert!(!check_conflict(&store, "", Some(day(10))).await?);
    assert!(!check_conflict(&store, "   ", Some(day(10))).await?);
    assert!(!check_conflict(&store, "Acme", None).await?);
    Ok(())
}
