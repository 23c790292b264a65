// Scripted walk through one browsing session: search, filter rooms, book a
// room and an offer, then list the bookings.
//
// Usage: booking_demo [catalog.json]

use anyhow::{Context, Result};
use chrono::{Days, Local};
use hotel_booking_core::listing::derive_room_types;
use hotel_booking_core::telemetry::init_tracing;
use hotel_booking_core::{
    AppConfig, BookingContext, BookingFlow, BookingsPage, Catalog, ListingCriteria,
    OfferBookingFlow, PriceRange, RoomBookingFlow, RoomBookingForm, SearchFlow, SearchForm,
    SortOption,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("hotel_booking_core=info,booking_demo=info");

    let config = AppConfig::from_env().context("reading configuration")?;
    let catalog = match std::env::args().nth(1) {
        Some(path) => Catalog::load(&path).with_context(|| format!("loading catalog {}", path))?,
        None => Catalog::sample().context("loading bundled catalog")?,
    };
    let today = Local::now().date_naive();
    let context = BookingContext::in_memory(config.store.clone());

    let check_in = today
        .checked_add_days(Days::new(7))
        .context("check-in date out of range")?;
    let check_out = check_in
        .checked_add_days(Days::new(3))
        .context("check-out date out of range")?;

    let search = SearchFlow::new(config.search.clone());
    let form = SearchForm {
        destination: catalog.cities.first().cloned().unwrap_or_default(),
        check_in: Some(check_in),
        check_out: Some(check_out),
        guests: 2,
    };
    let route = search.submit(&form, today).await?;
    println!("Search accepted, navigating to {}", route.path());

    println!("Room types: {}", derive_room_types(&catalog.rooms).join(", "));
    let mut criteria = ListingCriteria::new();
    criteria.toggle_price_range(PriceRange::From200To400, true);
    criteria.select_sort(SortOption::PriceLowToHigh);
    let listing = criteria.apply(&catalog.rooms);
    println!("{}", listing.summary());
    for room in &listing.rooms {
        println!(
            "  {} ({}) ${}/night",
            room.hotel.name, room.room_type, room.price_per_night
        );
    }

    let room = listing
        .rooms
        .first()
        .context("no rooms match the selected filters")?;
    let room_flow = RoomBookingFlow::for_room(
        &catalog,
        &room.id,
        RoomBookingForm {
            check_in_date: Some(check_in.to_string()),
            check_out_date: Some(check_out.to_string()),
            guests: Some("2".to_string()),
        },
        config.flow.clone(),
    )?;
    room_flow.submit(&context, today).await?;

    if let Some(offer) = catalog.offers.first() {
        let offer_flow = OfferBookingFlow::for_offer(&catalog, &offer.id, config.flow.clone())?;
        let confirmation = offer_flow.submit(&context, today).await?;
        println!("Redirecting to {}", confirmation.redirect.path());
    }

    match BookingsPage::render(&context)? {
        BookingsPage::Empty { .. } => println!("No bookings yet"),
        BookingsPage::Listing { rows } => {
            for row in rows {
                println!(
                    "{} | {} - {} | {} | {} | {}",
                    row.title(),
                    row.check_in_label,
                    row.check_out_label,
                    row.guests_label,
                    row.total_label,
                    row.payment_status.label()
                );
                if let Some(badge) = &row.offer_badge {
                    println!("    {}", badge);
                }
            }
        }
    }

    Ok(())
}
