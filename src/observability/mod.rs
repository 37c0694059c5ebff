//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//!
//! Consumers:
//!     → stderr (fmt layer)
//!     → any metrics recorder installed by an embedding application
//! ```
//!
//! # Design Decisions
//! - Each batch runs in a span carrying its batch id
//! - Private keys never appear in log fields

pub mod logging;
pub mod metrics;
