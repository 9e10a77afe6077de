//! Process-wide tracing setup.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Call once, before any logging.
///
/// `RUST_LOG` controls the filter; the default is `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
