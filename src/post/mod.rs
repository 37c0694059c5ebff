//! Publication records.
//!
//! # Data Flow
//! ```text
//! manifest.rs (JSON file → Vec<PublishItem>)
//!     → upload fills `url`, batch fills `storage_date`
//!     → generator.rs (PublishItem → Post, pure)
//!     → permalink.rs (title → `{token}-{slug}`)
//! ```

pub mod generator;
pub mod manifest;
pub mod permalink;
pub mod types;

pub use generator::PostGenerator;
pub use manifest::{load_manifest, ManifestError};
pub use types::{Post, PostError, PostMetadata, PublishItem};
