//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system with the default filter
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialize the logging system, falling back to `filter` when `RUST_LOG` is unset
///
/// Safe to call more than once; later calls are ignored so tests and the
/// binary can both initialise logging.
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::trace!("Logger already initialised, keeping existing configuration");
    }
}
