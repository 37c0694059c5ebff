//! OAM publisher library
//!
//! Uploads signed documents to an image hoster and records them on a
//! Steem-compatible ledger as `comment` operations.

pub mod config;
pub mod dictionary;
pub mod ledger;
pub mod observability;
pub mod post;
pub mod publisher;
pub mod upload;

pub use config::schema::PublisherConfig;
pub use dictionary::{Dictionary, DictionaryClient};
pub use ledger::{Ledger, RpcLedger, Wallet};
pub use post::PublishItem;
pub use publisher::{BatchMode, BatchReport, Publisher};
pub use upload::{HttpUploader, Uploader};
