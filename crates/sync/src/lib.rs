//! # Docdex Sync
//!
//! Synchronization controller for the documentation index: decides when to
//! re-fetch remote data, reconciles remote and local indexes, and serves
//! the merged result.
//!
//! ## Cycle
//!
//! ```text
//! Idle ──> Deciding (TTL / force) ──> Fetching (0..2 remote JSON files)
//!                │                         │
//!                └── fresh: skip           └── joined, then:
//!                                               Rebuilding ──> Idle
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use docdex_sync::{DocPaths, FileAutodocsRegistry, FileConfigStore, HttpFetcher, Indexer,
//!     StartOptions};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> docdex_sync::Result<()> {
//!     let paths = DocPaths::new("/tmp/docdex", "/opt/docdex", "https://example.test/config");
//!     let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(30))?);
//!     let config = Arc::new(FileConfigStore::new(
//!         "/tmp/docdex/config/meta.json",
//!         "/opt/docdex/config/meta.json",
//!         "https://example.test/config",
//!         fetcher.clone(),
//!     ));
//!     let autodocs = Arc::new(FileAutodocsRegistry::new("/tmp/docdex/config/autodocs.json"));
//!
//!     let indexer = Arc::new(Indexer::new(paths, config, autodocs, fetcher));
//!     indexer.clone().start(StartOptions::default());
//!     let merged = indexer.index();
//!     println!("{} libraries indexed", merged.children.len());
//!     Ok(())
//! }
//! ```

mod builder;
mod controller;
mod error;
mod hook;
mod index_store;
mod paths;
mod persist;
mod registry;
mod remote;
mod store;

pub use builder::{build, build_location, BuiltIndexes};
pub use controller::{Indexer, StartOptions, UpdateOptions, UpdateOutcome, UPDATE_INTERVAL_MS};
pub use error::{Result, SyncError};
pub use hook::{NoopHook, RebuildHook};
pub use index_store::IndexStore;
pub use paths::{
    DocPaths, Location, LocationPaths, REMOTE_AUTODOCS_FILE, REMOTE_CONFIG_FILE, REMOTE_INDEX_FILE,
};
pub use persist::{read_index_safely, write_index};
pub use registry::{AutodocsRegistry, FileAutodocsRegistry};
pub use remote::{fetch_json, HttpFetcher, RemoteFetcher};
pub use store::{ConfigStore, FileConfigStore, MetaUpdate, StoreMeta};
