// Runtime configuration for the store, the booking flows and the search form
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

// Booking store configuration options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub id_prefix: String,
    pub id_random_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_prefix: "booking".to_string(),
            id_random_len: 9,
        }
    }
}

// Booking flow configuration options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlowConfig {
    pub simulated_latency_ms: u64,
    pub offer_base_rate: f64,
    pub offer_nights: u32,
    pub offer_guests: u32,
    pub payment_method: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 1000,
            offer_base_rate: 500.0,
            offer_nights: 2,
            offer_guests: 2,
            payment_method: "Credit Card".to_string(),
        }
    }
}

impl FlowConfig {
    // Offer stays need at least one night and one guest at a real rate
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.offer_nights < 1 {
            return Err(invalid("flow.offer_nights", self.offer_nights));
        }
        if self.offer_guests < 1 {
            return Err(invalid("flow.offer_guests", self.offer_guests));
        }
        if !self.offer_base_rate.is_finite() || self.offer_base_rate < 0.0 {
            return Err(invalid("flow.offer_base_rate", self.offer_base_rate));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

// Search form configuration options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub simulated_latency_ms: u64,
    pub max_guests: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 1500,
            max_guests: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub flow: FlowConfig,
    pub search: SearchConfig,
}

pub const ENV_FLOW_LATENCY_MS: &str = "HOTEL_FLOW_LATENCY_MS";
pub const ENV_SEARCH_LATENCY_MS: &str = "HOTEL_SEARCH_LATENCY_MS";
pub const ENV_OFFER_BASE_RATE: &str = "HOTEL_OFFER_BASE_RATE";

impl AppConfig {
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.flow.validate()?;
        Ok(config)
    }

    // Defaults overridden by `HOTEL_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_FLOW_LATENCY_MS) {
            config.flow.simulated_latency_ms = parse_value(ENV_FLOW_LATENCY_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_SEARCH_LATENCY_MS) {
            config.search.simulated_latency_ms = parse_value(ENV_SEARCH_LATENCY_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_OFFER_BASE_RATE) {
            config.flow.offer_base_rate = parse_value(ENV_OFFER_BASE_RATE, &value)?;
        }

        config.flow.validate()?;
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
