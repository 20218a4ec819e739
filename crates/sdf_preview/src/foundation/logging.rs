//! Logging utilities

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// Honours `RUST_LOG` when set and falls back to `info` otherwise.
/// Subsequent calls are ignored.
pub fn init() {
    init_inner(None);
}

/// Initialize the logging system with an explicit `env_logger` filter
/// string (e.g. `"sdf_preview=debug"`), overriding `RUST_LOG`.
pub fn init_with_filter(filter: &str) {
    init_inner(Some(filter));
}

fn init_inner(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match filter.map(str::to_owned).or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        // try_init: a test harness may already have installed a logger
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
