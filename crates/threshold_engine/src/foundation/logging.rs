//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Honors `RUST_LOG`; falls back to `info` when it is unset.
pub fn init() {
    init_with_level(log::LevelFilter::Info);
}

/// Initialize the logging system with a default level filter
///
/// `RUST_LOG` still takes precedence over `level`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_with_level(level: log::LevelFilter) {
    let filters = std::env::var("RUST_LOG").ok();
    let _ = builder(level, filters.as_deref()).try_init();
}

/// Default level first, then any `RUST_LOG` directives on top of it
fn builder(level: log::LevelFilter, filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }
    builder
}
