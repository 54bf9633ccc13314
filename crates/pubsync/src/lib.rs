//! Publication dataset synchronizer
//!
//! Maintains the publication metadata behind a personal website: a directory
//! of records keyed by stable identifier, refreshed against the OpenAlex API.
//!
//! # Features
//!
//! - **Citation refresh**: overwrite `cited_by_count` from the source on every
//!   existing record, one identifier at a time
//! - **Discovery**: append records for manifest identifiers not yet present,
//!   with optional errata inclusion
//! - **Partial-failure isolation**: one bad identifier never aborts a batch
//! - **Atomic commits**: the dataset is either fully rewritten or untouched
//!
//! # Example
//!
//! ```no_run
//! use pubsync::{Config, OpenAlexClient, Synchronizer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OpenAlexClient::new(Config::from_env())?;
//!     let sync = Synchronizer::new(client, false);
//!     let report = sync.update(std::path::Path::new("assets/data")).await?;
//!     println!("updated {} of {} records", report.updated, report.examined);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod sync;

pub use client::OpenAlexClient;
pub use config::Config;
pub use dataset::Dataset;
pub use error::{ClientError, DatasetError, RecordError, SyncError};
pub use models::{PublicationRecord, Work};
pub use sync::{AppendReport, CombinedReport, Synchronizer, UpdateReport};
