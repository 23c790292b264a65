// Landing page search form: destination, stay dates and party size
use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::config::SearchConfig;
use crate::flows::{simulate_latency, Route, SubmitGuard};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Check-in date cannot be in the past")]
    CheckInInPast,

    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,

    #[error("Guests must be between 1 and {max}")]
    InvalidGuests { max: u32 },

    #[error("A search is already running")]
    SubmissionInProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub destination: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: u32,
}

impl SearchForm {
    pub fn validate(&self, today: NaiveDate, config: &SearchConfig) -> Result<(), SearchError> {
        let (check_in, check_out) = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(SearchError::MissingFields),
        };
        if self.destination.trim().is_empty() {
            return Err(SearchError::MissingFields);
        }

        validate_stay(check_in, check_out, today)?;

        if self.guests == 0 || self.guests > config.max_guests {
            return Err(SearchError::InvalidGuests {
                max: config.max_guests,
            });
        }
        Ok(())
    }

    // Lower bound for the check-out picker
    pub fn min_check_out(&self, today: NaiveDate) -> NaiveDate {
        min_check_out(self.check_in, today)
    }
}

// Check-in may be today but not earlier; check-out must follow check-in
pub fn validate_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    today: NaiveDate,
) -> Result<(), SearchError> {
    if check_in < today {
        return Err(SearchError::CheckInInPast);
    }
    if check_out <= check_in {
        return Err(SearchError::CheckOutNotAfterCheckIn);
    }
    Ok(())
}

pub fn min_check_in(today: NaiveDate) -> NaiveDate {
    today
}

pub fn min_check_out(check_in: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    check_in
        .and_then(|date| date.checked_add_days(Days::new(1)))
        .unwrap_or(today)
}

// Case-insensitive prefix match over the known cities, in catalog order
pub fn suggest_destinations<'a>(cities: &'a [String], input: &str) -> Vec<&'a str> {
    let needle = input.trim().to_lowercase();
    cities
        .iter()
        .filter(|city| city.to_lowercase().starts_with(&needle))
        .map(String::as_str)
        .collect()
}

pub struct SearchFlow {
    config: SearchConfig,
    guard: SubmitGuard,
}

impl SearchFlow {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            guard: SubmitGuard::new(),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.guard.is_in_progress()
    }

    pub async fn submit(&self, form: &SearchForm, today: NaiveDate) -> Result<Route, SearchError> {
        let _in_progress = self
            .guard
            .try_begin()
            .ok_or(SearchError::SubmissionInProgress)?;

        if let Err(e) = form.validate(today, &self.config) {
            tracing::warn!(error = %e, "search rejected");
            return Err(e);
        }

        simulate_latency(self.config.simulated_latency_ms).await;

        tracing::info!(destination = %form.destination, guests = form.guests, "search submitted");
        Ok(Route::Rooms)
    }
}

impl Default for SearchFlow {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
