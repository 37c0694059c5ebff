//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Resolve the log level from `RUST_LOG` or the config
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` takes precedence over `observability.log_level`
//! - Logs go to stderr; stdout carries command output

use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive for a configured level, scoped to this crate.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("oam_publisher={},warn", config.log_level)
}

/// Registry with `filter` and the stderr `fmt` layer.
fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    )
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    if subscriber(filter).try_init().is_err() {
        tracing::debug!("Logging already initialized");
    }
}
