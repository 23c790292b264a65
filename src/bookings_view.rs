// "My Bookings" page model
// Renders room and offer bookings into one row shape for the listing view.

use chrono::NaiveDate;

use crate::booking::{Booking, BookingKind};
use crate::booking_store::{BookingContext, StoreError};
use crate::flows::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    pub booking_id: String,
    pub image: Option<String>,
    pub hotel_name: String,
    pub room_type: Option<String>,
    pub offer_badge: Option<String>,
    pub address: String,
    pub guests_label: String,
    pub total_label: String,
    pub check_in_label: String,
    pub check_out_label: String,
    pub payment_status: PaymentStatus,
    // No payment flow exists yet; shown for any unpaid booking
    pub show_pay_now: bool,
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        let (image, room_type, offer_badge) = match &booking.kind {
            BookingKind::Room { room } => (
                room.primary_image().map(str::to_string),
                Some(room.room_type.clone()),
                None,
            ),
            BookingKind::Offer { offer_details } => (
                Some(offer_details.image.clone()),
                None,
                Some(format!(
                    "{}% OFF - {}",
                    offer_details.price_off, offer_details.title
                )),
            ),
        };

        let payment_status = if booking.is_paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        };

        Self {
            booking_id: booking.id.clone(),
            image,
            hotel_name: booking.hotel.name.clone(),
            room_type,
            offer_badge,
            address: booking.hotel.address.clone(),
            guests_label: guests_label(booking.guests),
            total_label: format!("Total: ${}", booking.total_price),
            check_in_label: date_label(booking.check_in_date),
            check_out_label: date_label(booking.check_out_date),
            payment_status,
            show_pay_now: !booking.is_paid,
        }
    }
}

impl BookingRow {
    // Hotel name with the room type appended for room bookings
    pub fn title(&self) -> String {
        match &self.room_type {
            Some(room_type) => format!("{} ({})", self.hotel_name, room_type),
            None => self.hotel_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingsPage {
    Empty { actions: Vec<(&'static str, Route)> },
    Listing { rows: Vec<BookingRow> },
}

impl BookingsPage {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        if bookings.is_empty() {
            return BookingsPage::Empty {
                actions: vec![("Browse Rooms", Route::Rooms), ("View Offers", Route::Home)],
            };
        }
        BookingsPage::Listing {
            rows: bookings.iter().map(BookingRow::from).collect(),
        }
    }

    // Re-reads the store on every render
    pub fn render(context: &BookingContext) -> Result<Self, StoreError> {
        let bookings = context.current_bookings()?;
        Ok(Self::from_bookings(&bookings))
    }

    pub fn rows(&self) -> &[BookingRow] {
        match self {
            BookingsPage::Empty { .. } => &[],
            BookingsPage::Listing { rows } => rows,
        }
    }
}

pub fn guests_label(guests: u32) -> String {
    if guests == 1 {
        "1 Guest".to_string()
    } else {
        format!("{} Guests", guests)
    }
}

// e.g. "Mon Mar 10 2025"
pub fn date_label(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}
