//! Availability service and refresh feed.
//!
//! `AvailabilityService` turns one store read into a [`Snapshot`], failing
//! open when the read errors. `AvailabilityFeed` re-runs that computation on
//! every "refresh requested" event, merged from three sources:
//!
//!   1. view changes (mount / date / category switch)
//!   2. a fixed-period timer, applied only while the viewed date is today
//!   3. every change event from the reservation store, unconditionally
//!
//! Refresh computations may overlap; each is stamped with a monotonic
//! sequence number and a completed computation publishes only if it is newer
//! than the last published one. Superseded results are discarded, not
//! cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::{Mutex, broadcast, watch};

use schedule::model::DeliveryCategory;
use schedule::store::{ChangeEvent, ReservationStore};

use crate::calculator::{Availability, compute_availability};
use crate::catalog::SlotCatalog;
use crate::clock::Clock;

/// One published availability result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub category: Option<DeliveryCategory>,
    pub availability: Availability,
    /// True when the store read failed and the snapshot carries the
    /// fail-open projection (clock filter only, empty occupancy).
    pub degraded: bool,
}

pub struct AvailabilityService<S, C> {
    store: Arc<S>,
    catalog: SlotCatalog,
    clock: C,
}

impl<S: ReservationStore, C: Clock> AvailabilityService<S, C> {
    pub fn new(store: Arc<S>, catalog: SlotCatalog, clock: C) -> Self {
        Self {
            store,
            catalog,
            clock,
        }
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Compute the current availability projection for a date.
    ///
    /// A failed store read degrades to "everything open" rather than leaving
    /// the consumer on a stale result; the error is logged and flagged on
    /// the snapshot.
    pub async fn snapshot(&self, date: NaiveDate, category: Option<DeliveryCategory>) -> Snapshot {
        let now = self.clock.now();

        match self.store.active_on(date, category).await {
            Ok(rows) => Snapshot {
                date,
                category,
                availability: compute_availability(&self.catalog, now, date, &rows),
                degraded: false,
            },
            Err(e) => {
                tracing::warn!(error = %e, date = %date, "availability read failed, failing open");
                Snapshot {
                    date,
                    category,
                    availability: compute_availability(&self.catalog, now, date, &[]),
                    degraded: true,
                }
            }
        }
    }
}

/// Configuration knobs for the refresh feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Timer period used to age out newly-past slots while viewing today.
    pub refresh_period: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_period: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ViewState {
    date: NaiveDate,
    category: Option<DeliveryCategory>,
}

pub struct AvailabilityFeed<S, C> {
    service: AvailabilityService<S, C>,
    cfg: FeedConfig,
    view: Mutex<ViewState>,
    seq: AtomicU64,
    published: Mutex<u64>,
    tx: watch::Sender<Option<Snapshot>>,
}

impl<S, C> AvailabilityFeed<S, C>
where
    S: ReservationStore + 'static,
    C: Clock + 'static,
{
    /// Create a feed viewing `date` (optionally category-scoped) and the
    /// receiver consumers watch for the latest snapshot.
    pub fn new(
        service: AvailabilityService<S, C>,
        date: NaiveDate,
        category: Option<DeliveryCategory>,
        cfg: FeedConfig,
    ) -> (Arc<Self>, watch::Receiver<Option<Snapshot>>) {
        let (tx, rx) = watch::channel(None);

        let feed = Arc::new(Self {
            service,
            cfg,
            view: Mutex::new(ViewState { date, category }),
            seq: AtomicU64::new(0),
            published: Mutex::new(0),
            tx,
        });

        (feed, rx)
    }

    /// Point the feed at another date/category and refresh immediately.
    pub async fn set_view(self: &Arc<Self>, date: NaiveDate, category: Option<DeliveryCategory>) {
        {
            let mut view = self.view.lock().await;
            view.date = date;
            view.category = category;
        }
        self.request_refresh();
    }

    /// Stamp a refresh request and compute it on an independent task.
    ///
    /// Latest-wins: the publish guard drops any result whose stamp is older
    /// than the last published one, so an overlapping slow computation can
    /// never overwrite a newer snapshot.
    pub fn request_refresh(self: &Arc<Self>) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let feed = Arc::clone(self);

        tokio::spawn(async move {
            let (date, category) = {
                let view = feed.view.lock().await;
                (view.date, view.category)
            };

            let snapshot = feed.service.snapshot(date, category).await;

            let mut published = feed.published.lock().await;
            if seq > *published {
                *published = seq;
                let _ = feed.tx.send(Some(snapshot));
            } else {
                tracing::debug!(seq, last = *published, "discarding superseded refresh");
            }
        });
    }

    /// Drive the feed until the change stream closes.
    ///
    /// Timer ticks refresh only while the viewed date is the clock's today;
    /// change events refresh unconditionally, and a lagged receiver turns
    /// the missed events into one refresh (at-least-once is enough, the
    /// payload is never inspected).
    pub async fn run(self: Arc<Self>, mut changes: broadcast::Receiver<ChangeEvent>) {
        self.request_refresh();

        let mut ticker = tokio::time::interval(self.cfg.refresh_period);
        ticker.tick().await; // the first tick fires immediately

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let today = self.service.clock.now().date();
                    let viewing_today = self.view.lock().await.date == today;
                    if viewing_today {
                        self.request_refresh();
                    }
                }
                event = changes.recv() => match event {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        self.request_refresh();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    }
}
