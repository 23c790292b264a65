// Static reference data: rooms, offers, hotels and the signed-in user
// Everything here is read-only once loaded

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    #[error("Catalog parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    pub hotel: Hotel,
    pub room_type: String,
    pub price_per_night: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_off: u32,
    pub expiry_date: String,
    pub image: String,
}

// Snapshot of an offer copied into a booking at creation time
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetails {
    pub title: String,
    pub description: String,
    pub price_off: u32,
    pub expiry_date: String,
    pub image: String,
}

impl From<&Offer> for OfferDetails {
    fn from(offer: &Offer) -> Self {
        Self {
            title: offer.title.clone(),
            description: offer.description.clone(),
            price_off: offer.price_off,
            expiry_date: offer.expiry_date.clone(),
            image: offer.image.clone(),
        }
    }
}

// Bundled reference data the presentation layer browses
// `featured_hotel` is the property offer bookings are attached to, since
// offers are not tied to a room when they are selected
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub rooms: Vec<Room>,
    pub offers: Vec<Offer>,
    pub featured_hotel: Hotel,
    pub current_user: User,
    #[serde(default)]
    pub cities: Vec<String>,
}

impl Catalog {
    pub fn from_json(json_str: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            serde_json::from_str(json_str).map_err(|e| CatalogError::Parse(e.to_string()))?;
        tracing::debug!(
            rooms = catalog.rooms.len(),
            offers = catalog.offers.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    // The fixture shipped with the crate
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json(SAMPLE_CATALOG_JSON)
    }

    pub fn room(&self, id: &str) -> Result<&Room, CatalogError> {
        self.rooms
            .iter()
            .find(|room| room.id == id)
            .ok_or_else(|| CatalogError::RoomNotFound(id.to_string()))
    }

    pub fn offer(&self, id: &str) -> Result<&Offer, CatalogError> {
        self.offers
            .iter()
            .find(|offer| offer.id == id)
            .ok_or_else(|| CatalogError::OfferNotFound(id.to_string()))
    }

    // Other offers shown under an offer's detail page, in catalog order
    pub fn related_offers(&self, id: &str, limit: usize) -> Vec<&Offer> {
        self.offers
            .iter()
            .filter(|offer| offer.id != id)
            .take(limit)
            .collect()
    }
}

pub const SAMPLE_CATALOG_JSON: &str = r#"
{
  "currentUser": {
    "_id": "user_2unqyL4diJFP1E3pIBnasc7w8hP",
    "username": "Great Stack",
    "email": "user.greatstack@gmail.com",
    "image": "https://images.example.com/avatar.png"
  },
  "featuredHotel": {
    "_id": "67f76393197ac559e4089b72",
    "name": "Urbanza Suites",
    "address": "Main Road 123 Street, 23 Colony",
    "city": "New York",
    "contact": "+0123456789"
  },
  "cities": ["Dubai", "Singapore", "New York", "London"],
  "rooms": [
    {
      "_id": "67f7647c197ac559e4089b96",
      "hotel": {
        "_id": "67f76393197ac559e4089b72",
        "name": "Urbanza Suites",
        "address": "Main Road 123 Street, 23 Colony",
        "city": "New York"
      },
      "roomType": "Double Bed",
      "pricePerNight": 399,
      "amenities": ["Room Service", "Mountain View", "Pool Access"],
      "images": ["roomImg1.png", "roomImg2.png", "roomImg3.png"],
      "createdAt": "2025-04-10T06:26:04.013Z"
    },
    {
      "_id": "67f76452197ac559e4089b8e",
      "hotel": {
        "_id": "67f76393197ac559e4089b72",
        "name": "Urbanza Suites",
        "address": "Main Road 123 Street, 23 Colony",
        "city": "New York"
      },
      "roomType": "Double Bed",
      "pricePerNight": 299,
      "amenities": ["Room Service", "Mountain View", "Pool Access"],
      "images": ["roomImg2.png", "roomImg3.png", "roomImg4.png"],
      "createdAt": "2025-04-10T06:25:22.593Z"
    },
    {
      "_id": "67f76406197ac559e4089b82",
      "hotel": {
        "_id": "67f76393197ac559e4089b72",
        "name": "Urbanza Suites",
        "address": "Main Road 123 Street, 23 Colony",
        "city": "New York"
      },
      "roomType": "Single Bed",
      "pricePerNight": 249,
      "amenities": ["Free WiFi", "Free Breakfast", "Room Service"],
      "images": ["roomImg3.png", "roomImg4.png", "roomImg1.png"],
      "createdAt": "2025-04-10T06:24:06.285Z"
    },
    {
      "_id": "67f763d8197ac559e4089b7a",
      "hotel": {
        "_id": "67f76393197ac559e4089b72",
        "name": "Urbanza Suites",
        "address": "Main Road 123 Street, 23 Colony",
        "city": "New York"
      },
      "roomType": "Single Bed",
      "pricePerNight": 199,
      "amenities": ["Free WiFi", "Room Service", "Pool Access"],
      "images": ["roomImg4.png", "roomImg1.png", "roomImg2.png"],
      "createdAt": "2025-04-10T06:23:20.252Z"
    },
    {
      "_id": "67f7650c197ac559e4089ba1",
      "hotel": {
        "_id": "67f7650c197ac559e4089b99",
        "name": "Harbour View Resort",
        "address": "12 Marina Walk",
        "city": "Dubai"
      },
      "roomType": "Luxury Room",
      "pricePerNight": 649,
      "amenities": ["Free WiFi", "Free Breakfast", "Pool Access", "Mountain View"],
      "images": ["roomImg5.png"],
      "createdAt": "2025-04-12T09:10:00.000Z"
    },
    {
      "_id": "67f7651d197ac559e4089ba7",
      "hotel": {
        "_id": "67f7650c197ac559e4089b99",
        "name": "Harbour View Resort",
        "address": "12 Marina Walk",
        "city": "Dubai"
      },
      "roomType": "Family Suite",
      "pricePerNight": 520,
      "amenities": ["Room Service", "Free Breakfast"],
      "images": [],
      "createdAt": "2025-04-11T15:45:30.000Z"
    }
  ],
  "offers": [
    {
      "_id": "1",
      "title": "Summer Escape Package",
      "description": "Enjoy a complimentary night and daily breakfast",
      "priceOff": 25,
      "expiryDate": "Aug 31",
      "image": "exclusiveOfferCardImg1.png"
    },
    {
      "_id": "2",
      "title": "Romantic Getaway",
      "description": "Special couples package including spa treatment",
      "priceOff": 20,
      "expiryDate": "Sep 20",
      "image": "exclusiveOfferCardImg2.png"
    },
    {
      "_id": "3",
      "title": "Luxury Retreat",
      "description": "Book 60 days in advance and save on your stay at any of our luxury properties worldwide.",
      "priceOff": 30,
      "expiryDate": "Sep 25",
      "image": "exclusiveOfferCardImg3.png"
    }
  ]
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_sample_catalog() {
        let catalog = Catalog::sample();
        assert!(catalog.is_ok(), "Failed to load sample catalog: {:?}", catalog.as_ref().err());

        let catalog = catalog.unwrap();
        assert_eq!(catalog.rooms.len(), 6);
        assert_eq!(catalog.offers.len(), 3);
        assert_eq!(catalog.featured_hotel.name, "Urbanza Suites");
        assert_eq!(catalog.rooms[0].price_per_night, 399.0);
        assert_eq!(catalog.rooms[5].primary_image(), None);
    }

    #[test]
    fn test_room_lookup() {
        let catalog = Catalog::sample().unwrap();

        let room = catalog.room("67f76406197ac559e4089b82").unwrap();
        assert_eq!(room.room_type, "Single Bed");

        match catalog.room("missing") {
            Err(CatalogError::RoomNotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("Expected RoomNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_offer_lookup_and_related() {
        let catalog = Catalog::sample().unwrap();

        assert!(matches!(
            catalog.offer("9"),
            Err(CatalogError::OfferNotFound(_))
        ));

        let related: Vec<&str> = catalog
            .related_offers("2", 2)
            .iter()
            .map(|offer| offer.id.as_str())
            .collect();
        assert_eq!(related, vec!["1", "3"]);
    }

    #[test]
    fn test_offer_details_snapshot() {
        let catalog = Catalog::sample().unwrap();
        let details = OfferDetails::from(catalog.offer("3").unwrap());
        assert_eq!(details.title, "Luxury Retreat");
        assert_eq!(details.price_off, 30);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = Catalog::from_json("{ \"rooms\": 42 }");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
