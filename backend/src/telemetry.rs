//! Tracing subscriber initialisation.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the JSON log formatter filtered by `RUST_LOG`.
///
/// Installing twice is harmless: the second attempt only logs a warning
/// through the subscriber already in place.
pub fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn repeated_initialisation_does_not_panic() {
        init_tracing();
        init_tracing();
    }
}
