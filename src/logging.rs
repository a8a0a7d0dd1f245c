//! `tracing` setup.
//!
//! The filter comes from `DOCGEN_LOG` (see [`crate::config::AppConfig`]); an
//! unparseable directive falls back to `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::DEFAULT_LOG_FILTER;

pub fn build_env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Returns `false` if one was already installed.
pub fn init_logging(directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(build_env_filter(directive))
        .with(fmt::layer().compact().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
