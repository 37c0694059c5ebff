//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PublisherConfig (validated, immutable)
//!     → handed by value to each client/publisher at construction
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The signing key never lives in the file; see `ledger::wallet`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::PublisherConfig;
pub use schema::{AppConfig, DictionaryConfig, HosterConfig, LedgerConfig, ObservabilityConfig};
