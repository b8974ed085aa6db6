use std::sync::Arc;

use chrono::NaiveDate;

use availability::catalog::SlotCatalog;
use booking::submit::SubmissionService;
use booking::types::{BookingError, BookingRequest};
use schedule::model::{DeliveryCategory, ReservationStatus, SlotLabel};

use mock_store::InMemoryReservationStore;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn request(supplier: &str, d: u32, slot: &str) -> BookingRequest {
    BookingRequest {
        supplier_name: supplier.into(),
        vehicle_type: "carreta".into(),
        category: DeliveryCategory::RawMaterials,
        purchase_order: "PO-55".into(),
        pallet_quantity: 30,
        observations: Some("dock ramp needed".into()),
        requester_id: "user-9".into(),
        date: day(d),
        time_slot: SlotLabel::new(slot),
    }
}

fn service() -> SubmissionService<InMemoryReservationStore> {
    SubmissionService::new(
        Arc::new(InMemoryReservationStore::default()),
        SlotCatalog::standard(),
    )
}

#[tokio::test]
async fn valid_request_is_persisted_as_pending() -> anyhow::Result<()> {
    let svc = service();

    let reservation = svc.submit(request("Acme", 10, "10:00")).await?;

    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.supplier_name, "Acme");
    assert_eq!(reservation.time_slot, SlotLabel::new("10:00"));
    Ok(())
}

#[tokio::test]
async fn supplier_name_is_stored_trimmed() -> anyhow::Result<()> {
    let svc = service();

    let reservation = svc.submit(request("  Acme  ", 10, "10:00")).await?;
    assert_eq!(reservation.supplier_name, "Acme");
    Ok(())
}

#[tokio::test]
async fn blank_required_fields_are_rejected_before_any_write() {
    let svc = service();

    let mut r = request("", 10, "10:00");
    assert!(matches!(
        svc.submit(r).await,
        Err(BookingError::MissingField("supplier_name"))
    ));

    r = request("Acme", 10, "10:00");
    r.vehicle_type = "  ".into();
    assert!(matches!(
        svc.submit(r).await,
        Err(BookingError::MissingField("vehicle_type"))
    ));

    r = request("Acme", 10, "10:00");
    r.purchase_order = "".into();
    assert!(matches!(
        svc.submit(r).await,
        Err(BookingError::MissingField("purchase_order"))
    ));

    r = request("Acme", 10, "10:00");
    r.requester_id = "".into();
    assert!(matches!(
        svc.submit(r).await,
        Err(BookingError::MissingField("requester_id"))
    ));
}

#[tokio::test]
async fn zero_pallets_is_invalid() {
    let svc = service();

    let mut r = request("Acme", 10, "10:00");
    r.pallet_quantity = 0;

    assert!(matches!(
        svc.submit(r).await,
        Err(BookingError::InvalidPalletQuantity)
    ));
}

#[tokio::test]
async fn slot_outside_the_catalog_is_rejected() {
    let svc = service();

    // 12:00 falls in the lunch gap of the standard catalog.
    let out = svc.submit(request("Acme", 10, "12:00")).await;
    assert!(matches!(out, Err(BookingError::UnknownSlot(s)) if s == "12:00"));
}

#[tokio::test]
async fn the_26_slot_variant_rejects_the_dropped_slot() {
    let svc = SubmissionService::new(
        Arc::new(InMemoryReservationStore::default()),
        SlotCatalog::standard().without("13:00"),
    );

    let out = svc.submit(request("Acme", 10, "13:00")).await;
    assert!(matches!(out, Err(BookingError::UnknownSlot(_))));
}

#[tokio::test]
async fn second_active_booking_for_the_same_day_conflicts() -> anyhow::Result<()> {
    let svc = service();

    svc.submit(request("Acme", 10, "10:00")).await?;
    let out = svc.submit(request("Acme", 10, "14:00")).await;

    assert!(
        matches!(out, Err(BookingError::Conflict { supplier, date }) if supplier == "Acme" && date == day(10))
    );
    Ok(())
}

#[tokio::test]
async fn same_supplier_on_another_day_is_fine() -> anyhow::Result<()> {
    let svc = service();

    svc.submit(request("Acme", 10, "10:00")).await?;
    svc.submit(request("Acme", 11, "10:00")).await?;
    Ok(())
}

#[tokio::test]
async fn blank_observations_normalize_to_none() -> anyhow::Result<()> {
    let svc = service();

    let mut r = request("Acme", 10, "10:00");
    r.observations = Some("   ".into());

    let reservation = svc.submit(r).await?;
    assert!(reservation.observations.is_none());
    Ok(())
}
