// Hotel booking core: session booking store, room listing pipeline and the
// booking flows that feed the store

pub mod booking;
pub mod booking_store;
pub mod bookings_view;
pub mod catalog;
pub mod config;
pub mod flows;
pub mod listing;
pub mod search;
pub mod telemetry;

// Re-export key types for convenience
pub use booking::{Booking, BookingDraft, BookingKind};
pub use booking_store::{
    BookingContext, BookingStore, InMemoryBookingStore, StoreError, StoreStatsReport,
};
pub use bookings_view::{BookingRow, BookingsPage, PaymentStatus};
pub use catalog::{Catalog, CatalogError, Hotel, Offer, OfferDetails, Room, User};
pub use config::{AppConfig, ConfigError, FlowConfig, SearchConfig, StoreConfig};
pub use flows::{
    BookingConfirmation, BookingFlow, FlowError, OfferBookingFlow, RoomBookingFlow,
    RoomBookingForm, Route,
};
pub use listing::{
    apply_filters, apply_sort, derive_room_types, ListingCriteria, ListingResult, PriceRange,
    SortOption,
};
pub use search::{SearchError, SearchFlow, SearchForm};
