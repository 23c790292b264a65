// Booking creation flows
// Room and offer bookings take different inputs but converge on one
// `BookingDraft` that is handed to the session store

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::booking::{Booking, BookingDraft, BookingKind};
use crate::booking_store::{validate_draft, BookingContext, StoreError};
use crate::catalog::{Catalog, CatalogError, Hotel, Offer, OfferDetails, Room, User};
use crate::config::FlowConfig;

pub const CONFIRMED_STATUS: &str = "confirmed";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Check-out date must be after check-in date")]
    InvalidStay,

    #[error("A booking is already being submitted")]
    SubmissionInProgress,

    #[error(transparent)]
    Store(#[from] StoreError),
}

// Where the presentation layer should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Rooms,
    MyBookings,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Rooms => "/rooms",
            Route::MyBookings => "/my-bookings",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub redirect: Route,
}

// Disables a submit control while a submission is running
#[derive(Debug, Default)]
pub struct SubmitGuard {
    in_progress: AtomicBool,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    // None while another submission holds the guard
    pub fn try_begin(&self) -> Option<InProgress<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InProgress { guard: self })
    }
}

pub struct InProgress<'a> {
    guard: &'a SubmitGuard,
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.guard.in_progress.store(false, Ordering::SeqCst);
    }
}

// Stand-in for submission latency until a real booking API exists
pub(crate) async fn simulate_latency(latency_ms: u64) {
    if latency_ms > 0 {
        tokio::time::sleep(Duration::from_millis(latency_ms)).await;
    }
}

#[async_trait]
pub trait BookingFlow: Send + Sync {
    // Build the draft from the flow's inputs, validating them first
    fn prepare(&self, today: NaiveDate) -> Result<BookingDraft, FlowError>;

    fn guard(&self) -> &SubmitGuard;

    fn config(&self) -> &FlowConfig;

    async fn submit(
        &self,
        context: &BookingContext,
        today: NaiveDate,
    ) -> Result<BookingConfirmation, FlowError> {
        let _in_progress = self
            .guard()
            .try_begin()
            .ok_or(FlowError::SubmissionInProgress)?;

        // Fail before the delay when no store is reachable
        context.use_bookings()?;

        let draft = match self.prepare(today).and_then(|draft| {
            validate_draft(&draft)?;
            Ok(draft)
        }) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, "booking rejected");
                return Err(e);
            }
        };

        simulate_latency(self.config().simulated_latency_ms).await;

        let booking = context.add_booking(draft)?;
        Ok(BookingConfirmation {
            booking,
            redirect: Route::MyBookings,
        })
    }
}

// Raw values of the room detail page's booking form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomBookingForm {
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub guests: Option<String>,
}

pub struct RoomBookingFlow {
    room: Room,
    user: User,
    form: RoomBookingForm,
    config: FlowConfig,
    guard: SubmitGuard,
}

impl RoomBookingFlow {
    pub fn new(room: Room, user: User, form: RoomBookingForm, config: FlowConfig) -> Self {
        Self {
            room,
            user,
            form,
            config,
            guard: SubmitGuard::new(),
        }
    }

    pub fn for_room(
        catalog: &Catalog,
        room_id: &str,
        form: RoomBookingForm,
        config: FlowConfig,
    ) -> Result<Self, CatalogError> {
        let room = catalog.room(room_id)?.clone();
        Ok(Self::new(room, catalog.current_user.clone(), form, config))
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn set_form(&mut self, form: RoomBookingForm) {
        self.form = form;
    }
}

#[async_trait]
impl BookingFlow for RoomBookingFlow {
    fn prepare(&self, _today: NaiveDate) -> Result<BookingDraft, FlowError> {
        let check_in_raw = non_empty(&self.form.check_in_date).ok_or(FlowError::MissingFields)?;
        let check_out_raw = non_empty(&self.form.check_out_date).ok_or(FlowError::MissingFields)?;
        let guests = non_empty(&self.form.guests)
            .and_then(|g| g.parse::<u32>().ok())
            .filter(|g| *g >= 1)
            .ok_or(FlowError::MissingFields)?;

        let check_in = parse_date(check_in_raw)?;
        let check_out = parse_date(check_out_raw)?;
        let nights = nights_between(check_in, check_out).ok_or(FlowError::InvalidStay)?;

        Ok(BookingDraft {
            user: self.user.clone(),
            hotel: self.room.hotel.clone(),
            kind: BookingKind::Room {
                room: self.room.clone(),
            },
            check_in_date: check_in,
            check_out_date: check_out,
            guests,
            total_price: room_total(self.room.price_per_night, nights),
            status: CONFIRMED_STATUS.to_string(),
            payment_method: self.config.payment_method.clone(),
            is_paid: true,
        })
    }

    fn guard(&self) -> &SubmitGuard {
        &self.guard
    }

    fn config(&self) -> &FlowConfig {
        &self.config
    }
}

pub struct OfferBookingFlow {
    offer: Offer,
    hotel: Hotel,
    user: User,
    config: FlowConfig,
    guard: SubmitGuard,
}

impl OfferBookingFlow {
    pub fn new(offer: Offer, hotel: Hotel, user: User, config: FlowConfig) -> Self {
        Self {
            offer,
            hotel,
            user,
            config,
            guard: SubmitGuard::new(),
        }
    }

    pub fn for_offer(
        catalog: &Catalog,
        offer_id: &str,
        config: FlowConfig,
    ) -> Result<Self, CatalogError> {
        let offer = catalog.offer(offer_id)?.clone();
        Ok(Self::new(
            offer,
            catalog.featured_hotel.clone(),
            catalog.current_user.clone(),
            config,
        ))
    }

    pub fn offer(&self) -> &Offer {
        &self.offer
    }

    pub fn quoted_total(&self) -> f64 {
        offer_total(
            self.config.offer_base_rate,
            self.offer.price_off,
            self.config.offer_nights,
        )
    }
}

#[async_trait]
impl BookingFlow for OfferBookingFlow {
    // Fixed stay: starts tomorrow, lasts `offer_nights`
    fn prepare(&self, today: NaiveDate) -> Result<BookingDraft, FlowError> {
        let check_in = today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| FlowError::InvalidDate(today.to_string()))?;
        let check_out = check_in
            .checked_add_days(Days::new(u64::from(self.config.offer_nights)))
            .ok_or_else(|| FlowError::InvalidDate(check_in.to_string()))?;

        Ok(BookingDraft {
            user: self.user.clone(),
            hotel: self.hotel.clone(),
            kind: BookingKind::Offer {
                offer_details: OfferDetails::from(&self.offer),
            },
            check_in_date: check_in,
            check_out_date: check_out,
            guests: self.config.offer_guests,
            total_price: self.quoted_total(),
            status: CONFIRMED_STATUS.to_string(),
            payment_method: self.config.payment_method.clone(),
            is_paid: true,
        })
    }

    fn guard(&self) -> &SubmitGuard {
        &self.guard
    }

    fn config(&self) -> &FlowConfig {
        &self.config
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FlowError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FlowError::InvalidDate(value.to_string()))
}

// Whole nights between the dates, None unless check-out is after check-in
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> Option<u32> {
    let days = (check_out - check_in).num_days();
    if days <= 0 {
        return None;
    }
    u32::try_from(days).ok()
}

pub fn room_total(price_per_night: f64, nights: u32) -> f64 {
    price_per_night * f64::from(nights)
}

pub fn offer_total(base_rate: f64, price_off: u32, nights: u32) -> f64 {
    let discounted = base_rate * (1.0 - f64::from(price_off) / 100.0);
    (discounted * f64::from(nights)).round()
}
