// Session booking store
// Single owner of every booking created during the session. Consumers reach it
// through a `BookingContext`; the only mutation is `add_booking`.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;

use crate::booking::{generate_booking_id, Booking, BookingDraft, BookingKind};
use crate::config::StoreConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("bookings must be accessed within an initialized booking context")]
    NotInitialized,

    #[error("Invalid booking: {0}")]
    InvalidBooking(String),
}

#[derive(Debug, Default)]
pub struct StoreStats {
    pub bookings_count: AtomicUsize,
    pub room_bookings: AtomicUsize,
    pub offer_bookings: AtomicUsize,
    pub id_collisions: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreStatsReport {
    pub bookings_count: usize,
    pub room_bookings: usize,
    pub offer_bookings: usize,
    pub id_collisions: usize,
}

pub trait BookingStore: Send + Sync + 'static {
    fn new(config: StoreConfig) -> Self
    where
        Self: Sized;

    // Snapshot of all bookings, most recently added first
    fn current_bookings(&self) -> Vec<Booking>;

    // Check the draft, assign identity and timestamps, then insert at the front.
    // A rejected draft leaves the collection untouched.
    fn add_booking(&self, draft: BookingDraft) -> Result<Booking, StoreError>;

    fn stats(&self) -> StoreStatsReport;
}

pub struct InMemoryBookingStore {
    inner: RwLock<StoreInner>,
    config: StoreConfig,
    stats: StoreStats,
}

#[derive(Default)]
struct StoreInner {
    bookings: VecDeque<Booking>,
    ids: HashSet<String>,
}

impl InMemoryBookingStore {
    fn next_id(&self, inner: &StoreInner) -> String {
        loop {
            let id = generate_booking_id(&self.config.id_prefix, self.config.id_random_len);
            if !inner.ids.contains(&id) {
                return id;
            }
            self.stats.id_collisions.fetch_add(1, Ordering::SeqCst);
            tracing::warn!(%id, "booking id collision, regenerating");
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().bookings.is_empty()
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl BookingStore for InMemoryBookingStore {
    fn new(config: StoreConfig) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            config,
            stats: StoreStats::default(),
        }
    }

    fn current_bookings(&self) -> Vec<Booking> {
        self.inner.read().bookings.iter().cloned().collect()
    }

    fn add_booking(&self, draft: BookingDraft) -> Result<Booking, StoreError> {
        if let Err(e) = validate_draft(&draft) {
            tracing::warn!(error = %e, "booking draft rejected");
            return Err(e);
        }

        // Held for the whole append so concurrent callers cannot interleave
        let mut inner = self.inner.write();

        let id = self.next_id(&inner);
        let booking = Booking::from_draft(id, draft, Utc::now());

        inner.ids.insert(booking.id.clone());
        inner.bookings.push_front(booking.clone());
        drop(inner);

        self.stats.bookings_count.fetch_add(1, Ordering::SeqCst);
        match booking.kind {
            BookingKind::Room { .. } => self.stats.room_bookings.fetch_add(1, Ordering::SeqCst),
            BookingKind::Offer { .. } => self.stats.offer_bookings.fetch_add(1, Ordering::SeqCst),
        };

        tracing::info!(
            booking_id = %booking.id,
            booking_type = booking.kind.label(),
            hotel = %booking.hotel.name,
            total_price = booking.total_price,
            "booking added"
        );

        Ok(booking)
    }

    fn stats(&self) -> StoreStatsReport {
        StoreStatsReport {
            bookings_count: self.stats.bookings_count.load(Ordering::SeqCst),
            room_bookings: self.stats.room_bookings.load(Ordering::SeqCst),
            offer_bookings: self.stats.offer_bookings.load(Ordering::SeqCst),
            id_collisions: self.stats.id_collisions.load(Ordering::SeqCst),
        }
    }
}

// Stay dates, guest count and price every stored booking must satisfy
pub fn validate_draft(draft: &BookingDraft) -> Result<(), StoreError> {
    if draft.check_out_date <= draft.check_in_date {
        return Err(StoreError::InvalidBooking(format!(
            "check-out {} is not after check-in {}",
            draft.check_out_date, draft.check_in_date
        )));
    }
    if draft.guests == 0 {
        return Err(StoreError::InvalidBooking(
            "guest count must be at least 1".to_string(),
        ));
    }
    if !draft.total_price.is_finite() || draft.total_price < 0.0 {
        return Err(StoreError::InvalidBooking(format!(
            "total price {} must be a non-negative amount",
            draft.total_price
        )));
    }
    Ok(())
}

// Scope through which views and flows reach the booking store.
// A default context has no store behind it; every access through it fails
// with StoreError::NotInitialized instead of yielding an empty list.
#[derive(Clone, Default)]
pub struct BookingContext {
    store: Option<Arc<dyn BookingStore>>,
}

impl BookingContext {
    pub fn uninitialized() -> Self {
        Self { store: None }
    }

    pub fn provide(store: Arc<dyn BookingStore>) -> Self {
        Self { store: Some(store) }
    }

    // Context backed by a fresh in-memory store
    pub fn in_memory(config: StoreConfig) -> Self {
        Self::provide(Arc::new(InMemoryBookingStore::new(config)))
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    pub fn use_bookings(&self) -> Result<&Arc<dyn BookingStore>, StoreError> {
        self.store.as_ref().ok_or(StoreError::NotInitialized)
    }

    pub fn current_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.use_bookings()?.current_bookings())
    }

    pub fn add_booking(&self, draft: BookingDraft) -> Result<Booking, StoreError> {
        self.use_bookings()?.add_booking(draft)
    }
}

impl std::fmt::Debug for BookingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingContext")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::fixtures::{offer_draft, room_draft};
    use crate::catalog::Catalog;
    use chrono::NaiveDate;
    use std::thread;
    use test_case::test_case;

    #[test]
    fn test_newest_booking_first() {
        let catalog = Catalog::sample().unwrap();
        let store = InMemoryBookingStore::default();

        for i in 0..5 {
            store
                .add_booking(room_draft(&catalog, i, (i as f64 + 1.0) * 100.0))
                .unwrap();
        }

        let bookings = store.current_bookings();
        assert_eq!(bookings.len(), 5);
        let prices: Vec<f64> = bookings.iter().map(|b| b.total_price).collect();
        assert_eq!(prices, vec![500.0, 400.0, 300.0, 200.0, 100.0]);
    }

    #[test]
    fn test_ids_are_unique_and_non_empty() {
        let catalog = Catalog::sample().unwrap();
        let store = InMemoryBookingStore::default();

        for _ in 0..200 {
            store.add_booking(offer_draft(&catalog, 0)).unwrap();
        }

        let bookings = store.current_bookings();
        let ids: HashSet<&str> = bookings.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), 200);
        assert!(bookings.iter().all(|b| !b.id.is_empty()));
    }

    #[test]
    fn test_add_booking_sets_identity_and_timestamps() {
        let catalog = Catalog::sample().unwrap();
        let store = InMemoryBookingStore::new(StoreConfig {
            id_prefix: "bk".to_string(),
            id_random_len: 4,
        });

        let before = Utc::now();
        let booking = store.add_booking(room_draft(&catalog, 2, 747.0)).unwrap();
        let after = Utc::now();

        assert!(booking.id.starts_with("bk_"));
        assert!(booking.created_at >= before && booking.created_at <= after);
        assert_eq!(booking.created_at, booking.updated_at);
        assert_eq!(store.current_bookings()[0], booking);
    }

    #[test]
    fn test_stats_track_booking_types() {
        let catalog = Catalog::sample().unwrap();
        let store = InMemoryBookingStore::default();

        store.add_booking(room_draft(&catalog, 0, 100.0)).unwrap();
        store.add_booking(offer_draft(&catalog, 1)).unwrap();
        store.add_booking(offer_draft(&catalog, 2)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.bookings_count, 3);
        assert_eq!(stats.room_bookings, 1);
        assert_eq!(stats.offer_bookings, 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_uninitialized_context_fails_fast() {
        let context = BookingContext::uninitialized();
        assert!(!context.is_initialized());
        assert_eq!(context.current_bookings(), Err(StoreError::NotInitialized));

        let catalog = Catalog::sample().unwrap();
        assert_eq!(
            context.add_booking(offer_draft(&catalog, 0)),
            Err(StoreError::NotInitialized)
        );
    }

    #[test]
    fn test_context_clones_share_one_store() {
        let catalog = Catalog::sample().unwrap();
        let context = BookingContext::in_memory(StoreConfig::default());
        let reader = context.clone();

        context.add_booking(room_draft(&catalog, 0, 100.0)).unwrap();
        assert_eq!(reader.current_bookings().unwrap().len(), 1);
    }

    // Each thread's own appends must keep their relative order
    #[test]
    fn test_concurrent_appends_preserve_per_thread_order() {
        let catalog = Arc::new(Catalog::sample().unwrap());
        let store = Arc::new(InMemoryBookingStore::default());
        let threads_count = 8;
        let appends_per_thread = 50;

        let mut handles = vec![];
        for t in 0..threads_count {
            let store = Arc::clone(&store);
            let catalog = Arc::clone(&catalog);
            handles.push(thread::spawn(move || {
                for j in 0..appends_per_thread {
                    let marker = (t * 1000 + j) as f64;
                    store.add_booking(room_draft(&catalog, 0, marker)).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let bookings = store.current_bookings();
        assert_eq!(bookings.len(), threads_count * appends_per_thread);

        for t in 0..threads_count {
            let seen: Vec<usize> = bookings
                .iter()
                .map(|b| b.total_price as usize)
                .filter(|marker| marker / 1000 == t)
                .map(|marker| marker % 1000)
                .collect();
            let expected: Vec<usize> = (0..appends_per_thread).rev().collect();
            assert_eq!(seen, expected, "thread {} order broken", t);
        }
    }

    fn swap_dates(draft: &mut BookingDraft) {
        std::mem::swap(&mut draft.check_in_date, &mut draft.check_out_date);
    }

    fn same_day(draft: &mut BookingDraft) {
        draft.check_out_date = draft.check_in_date;
    }

    fn no_guests(draft: &mut BookingDraft) {
        draft.guests = 0;
    }

    fn negative_total(draft: &mut BookingDraft) {
        draft.total_price = -50.0;
    }

    fn nan_total(draft: &mut BookingDraft) {
        draft.total_price = f64::NAN;
    }

    #[test_case(swap_dates; "#1 check-out before check-in")]
    #[test_case(same_day; "#2 zero-night stay")]
    #[test_case(no_guests; "#3 no guests")]
    #[test_case(negative_total; "#4 negative total")]
    #[test_case(nan_total; "#5 non-finite total")]
    fn test_invalid_draft_is_rejected_without_mutation(corrupt: fn(&mut BookingDraft)) {
        let catalog = Catalog::sample().unwrap();
        let context = BookingContext::in_memory(StoreConfig::default());
        let existing = context.add_booking(room_draft(&catalog, 0, 300.0)).unwrap();

        let mut draft = room_draft(&catalog, 1, 200.0);
        corrupt(&mut draft);

        assert!(matches!(
            context.add_booking(draft),
            Err(StoreError::InvalidBooking(_))
        ));
        assert_eq!(context.current_bookings().unwrap(), vec![existing]);
        assert_eq!(context.use_bookings().unwrap().stats().bookings_count, 1);
    }

    #[test]
    fn test_free_booking_is_accepted() {
        let catalog = Catalog::sample().unwrap();
        let mut draft = offer_draft(&catalog, 0);
        draft.total_price = 0.0;
        draft.check_out_date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert_eq!(validate_draft(&draft), Ok(()));
    }
}
