// Tracing subscriber setup for binaries
use tracing_subscriber::EnvFilter;

// Install a fmt subscriber. `RUST_LOG` wins over `default_directive`
// Calling it twice is harmless; the second install is ignored
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing("hotel_booking_core=debug");
        init_tracing("hotel_booking_core=info");
        tracing::debug!("subscriber installed");
    }
}
