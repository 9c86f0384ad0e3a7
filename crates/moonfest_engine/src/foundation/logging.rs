//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system
///
/// Reads `RUST_LOG` and falls back to [`DEFAULT_FILTER`]. Calling it twice is
/// harmless; the second call is ignored.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_FILTER);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
