//! Logger bootstrap.
//!
//! Native builds log through `env_logger`; wasm32 builds route records to the
//! browser console and install a panic hook that prints panics there too.

use std::sync::Once;

use serde::{Deserialize, Serialize};

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "glkit=debug"). On wasm32 only a bare level name is honoured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        install(config);
        log::debug!("logging initialized");
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn install(config: LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    if let Some(filter) = config.filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }
    // Another logger may already be installed by the host application.
    let _ = builder.try_init();
}

#[cfg(target_arch = "wasm32")]
fn install(config: LoggingConfig) {
    console_error_panic_hook::set_once();
    let level = config
        .filter
        .as_deref()
        .and_then(|filter| filter.parse::<log::Level>().ok())
        .unwrap_or(log::Level::Info);
    let _ = console_log::init_with_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::with_filter("glkit=debug"));
        init_logging(LoggingConfig::default());
        log::debug!("still alive");
    }
}
