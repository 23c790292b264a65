// Booking records produced by the room and offer flows
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Hotel, OfferDetails, Room, User};

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// What was booked. A room booking carries the room, an offer booking
// carries the offer snapshot; never both
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "bookingType", rename_all = "lowercase")]
pub enum BookingKind {
    Room {
        room: Room,
    },
    Offer {
        #[serde(rename = "offerDetails")]
        offer_details: OfferDetails,
    },
}

impl BookingKind {
    pub fn label(&self) -> &'static str {
        match self {
            BookingKind::Room { .. } => "room",
            BookingKind::Offer { .. } => "offer",
        }
    }

    pub fn room(&self) -> Option<&Room> {
        match self {
            BookingKind::Room { room } => Some(room),
            BookingKind::Offer { .. } => None,
        }
    }

    pub fn offer_details(&self) -> Option<&OfferDetails> {
        match self {
            BookingKind::Room { .. } => None,
            BookingKind::Offer { offer_details } => Some(offer_details),
        }
    }
}

// Booking payload before the store assigns identity and timestamps
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub user: User,
    pub hotel: Hotel,
    #[serde(flatten)]
    pub kind: BookingKind,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub status: String,
    pub payment_method: String,
    pub is_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: User,
    pub hotel: Hotel,
    #[serde(flatten)]
    pub kind: BookingKind,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub status: String,
    pub payment_method: String,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_draft(id: String, draft: BookingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user: draft.user,
            hotel: draft.hotel,
            kind: draft.kind,
            check_in_date: draft.check_in_date,
            check_out_date: draft.check_out_date,
            guests: draft.guests,
            total_price: draft.total_price,
            status: draft.status,
            payment_method: draft.payment_method,
            is_paid: draft.is_paid,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn room(&self) -> Option<&Room> {
        self.kind.room()
    }

    pub fn offer_details(&self) -> Option<&OfferDetails> {
        self.kind.offer_details()
    }

    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }
}

// Identity of the form `<prefix>_<unix millis>_<random base36>`
pub fn generate_booking_id(prefix: &str, random_len: usize) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..random_len)
        .map(|_| BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::catalog::Catalog;

    pub fn room_draft(catalog: &Catalog, room_index: usize, total_price: f64) -> BookingDraft {
        let room = catalog.rooms[room_index].clone();
        BookingDraft {
            user: catalog.current_user.clone(),
            hotel: room.hotel.clone(),
            kind: BookingKind::Room { room },
            check_in_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2025, 3, 13).unwrap(),
            guests: 2,
            total_price,
            status: "confirmed".to_string(),
            payment_method: "Credit Card".to_string(),
            is_paid: true,
        }
    }

    pub fn offer_draft(catalog: &Catalog, offer_index: usize) -> BookingDraft {
        BookingDraft {
            user: catalog.current_user.clone(),
            hotel: catalog.featured_hotel.clone(),
            kind: BookingKind::Offer {
                offer_details: OfferDetails::from(&catalog.offers[offer_index]),
            },
            check_in_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            guests: 2,
            total_price: 800.0,
            status: "confirmed".to_string(),
            payment_method: "Credit Card".to_string(),
            is_paid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_booking_id("booking", 9);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "booking");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_kind_exposes_exactly_one_payload() {
        let catalog = Catalog::sample().unwrap();

        let room_kind = room_draft(&catalog, 0, 300.0).kind;
        assert_eq!(room_kind.label(), "room");
        assert!(room_kind.room().is_some());
        assert!(room_kind.offer_details().is_none());

        let offer_kind = offer_draft(&catalog, 1).kind;
        assert_eq!(offer_kind.label(), "offer");
        assert!(offer_kind.room().is_none());
        assert!(offer_kind.offer_details().is_some());
    }

    #[test]
    fn test_booking_serializes_with_type_tag() {
        let catalog = Catalog::sample().unwrap();
        let booking = Booking::from_draft(
            "booking_1_abc".to_string(),
            offer_draft(&catalog, 0),
            Utc::now(),
        );

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["bookingType"], "offer");
        assert_eq!(value["offerDetails"]["priceOff"], 25);
        assert!(value.get("room").is_none());
        assert_eq!(value["_id"], "booking_1_abc");
        assert_eq!(booking.nights(), 2);
        assert_eq!(booking.created_at, booking.updated_at);
    }
}
