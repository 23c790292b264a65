// Room listing: filter and sort the static catalog by user-selected criteria
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Room;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("Unknown price range: {0}")]
    UnknownPriceRange(String),

    #[error("Unknown sort option: {0}")]
    UnknownSortOption(String),
}

// Fixed nightly-price bands. Bounds are inclusive on both ends, so a price
// sitting on a shared bound belongs to both neighbouring bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum PriceRange {
    UpTo200,
    From200To400,
    From400To600,
    From600,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::UpTo200,
        PriceRange::From200To400,
        PriceRange::From400To600,
        PriceRange::From600,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::UpTo200 => "0 to 200",
            PriceRange::From200To400 => "200 to 400",
            PriceRange::From400To600 => "400 to 600",
            PriceRange::From600 => "600+",
        }
    }

    // Checkbox text in the filter panel
    pub fn display_label(&self) -> String {
        format!("${}", self.label())
    }

    pub fn bounds(&self) -> (f64, f64) {
        match self {
            PriceRange::UpTo200 => (0.0, 200.0),
            PriceRange::From200To400 => (200.0, 400.0),
            PriceRange::From400To600 => (400.0, 600.0),
            PriceRange::From600 => (600.0, f64::INFINITY),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        let (min, max) = self.bounds();
        price >= min && price <= max
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceRange {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().trim_start_matches('$');
        PriceRange::ALL
            .into_iter()
            .find(|range| range.label() == label)
            .ok_or_else(|| ListingError::UnknownPriceRange(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SortOption {
    PriceLowToHigh,
    PriceHighToLow,
    NewestFirst,
}

impl SortOption {
    pub const ALL: [SortOption; 3] = [
        SortOption::PriceLowToHigh,
        SortOption::PriceHighToLow,
        SortOption::NewestFirst,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::PriceLowToHigh => "Price Low to High",
            SortOption::PriceHighToLow => "Price High to Low",
            SortOption::NewestFirst => "Newest First",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOption {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.label() == s.trim())
            .ok_or_else(|| ListingError::UnknownSortOption(s.to_string()))
    }
}

// Transient filter panel state owned by the listing view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCriteria {
    pub room_types: BTreeSet<String>,
    pub price_ranges: BTreeSet<PriceRange>,
    pub sort: Option<SortOption>,
}

impl ListingCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_room_type(&mut self, room_type: &str, checked: bool) {
        if checked {
            self.room_types.insert(room_type.to_string());
        } else {
            self.room_types.remove(room_type);
        }
    }

    pub fn toggle_price_range(&mut self, range: PriceRange, checked: bool) {
        if checked {
            self.price_ranges.insert(range);
        } else {
            self.price_ranges.remove(&range);
        }
    }

    pub fn select_sort(&mut self, sort: SortOption) {
        self.sort = Some(sort);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.room_types.is_empty() || !self.price_ranges.is_empty() || self.sort.is_some()
    }

    // Runs the full filter and sort pipeline over `catalog`
    pub fn apply(&self, catalog: &[Room]) -> ListingResult {
        let filtered = apply_filters(catalog, &self.room_types, &self.price_ranges);
        let rooms = apply_sort(filtered, self.sort);
        tracing::debug!(
            shown = rooms.len(),
            total = catalog.len(),
            sort = ?self.sort,
            "listing recomputed"
        );
        ListingResult {
            rooms,
            total: catalog.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingResult {
    pub rooms: Vec<Room>,
    pub total: usize,
}

impl ListingResult {
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {} rooms", self.rooms.len(), self.total)
    }
}

// Distinct room types in first-seen catalog order
pub fn derive_room_types(catalog: &[Room]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    catalog
        .iter()
        .filter(|room| seen.insert(room.room_type.as_str()))
        .map(|room| room.room_type.clone())
        .collect()
}

pub fn apply_filters(
    catalog: &[Room],
    room_types: &BTreeSet<String>,
    price_ranges: &BTreeSet<PriceRange>,
) -> Vec<Room> {
    let mut filtered = Vec::new();

    for room in catalog {
        if !room_types.is_empty() && !room_types.contains(&room.room_type) {
            continue;
        }

        if !price_ranges.is_empty()
            && !price_ranges
                .iter()
                .any(|range| range.contains(room.price_per_night))
        {
            continue;
        }

        filtered.push(room.clone());
    }

    filtered
}

// Stable: rooms that compare equal keep their incoming order
pub fn apply_sort(mut rooms: Vec<Room>, sort: Option<SortOption>) -> Vec<Room> {
    match sort {
        Some(SortOption::PriceLowToHigh) => {
            rooms.sort_by(|a, b| a.price_per_night.total_cmp(&b.price_per_night))
        }
        Some(SortOption::PriceHighToLow) => {
            rooms.sort_by(|a, b| b.price_per_night.total_cmp(&a.price_per_night))
        }
        Some(SortOption::NewestFirst) => rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        None => {}
    }
    rooms
}
