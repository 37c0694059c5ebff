//! Reference dictionaries for the publication form.
//!
//! # Data Flow
//! ```text
//! CDN (static JSON)
//!     → loader.rs (four concurrent GETs, joined without short-circuit)
//!     → per-resource post-processing (labels, numbering, tag maps)
//!     → Dictionary { data slots, error slots }
//! ```

pub mod loader;
pub mod types;

pub use loader::{DictionaryClient, DictionaryError};
pub use types::{ClassEntry, ClassKind, DictionaryErrors, Dictionary, DocClass, DocSubclass, HomeMemberState};
