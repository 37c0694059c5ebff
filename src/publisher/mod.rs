//! Batch publisher.
//!
//! # Data Flow
//! ```text
//! Vec<PublishItem>
//!     → upload (per item, sequential)
//!     → post::generator (per item)
//!     → independent: TxBuilder + sign + broadcast per item
//!     → atomic: one TxBuilder + sign + broadcast for all survivors
//!     → BatchReport
//! ```
//!
//! # Design Decisions
//! - No parallelism, no retry, no cancellation
//! - Independent mode isolates every failure to its item
//! - Atomic mode isolates upload/assembly failures but loses the batch on
//!   a failed broadcast; uploads already made are not compensated

pub mod batch;
pub mod report;

pub use batch::{storage_date, Publisher};
pub use report::{BatchMode, BatchReport, FailureStage, ItemFailure, PublishError, PublishedPost};
