//! # Docdex Index
//!
//! Node model and build primitives for the documentation index.
//!
//! ## Pipeline
//!
//! ```text
//! docs tree
//!     │
//!     ├──> Tree Indexer (walk, variant split)
//!     │      └─> IndexNode graph
//!     │
//!     ├──> Config Reader (per-library config.json)
//!     │      └─> ConfigMap
//!     │
//!     └──> Classifiers (method/property/doc/object, lib, unbuilt-lib)
//!            └─> Merge Engine
//!                  └─> reconciled index
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use docdex_index::{apply_configs, apply_libs, build_tree, read_configs, SourceType};
//! use std::path::Path;
//!
//! fn main() -> docdex_index::Result<()> {
//!     let root = Path::new("/path/to/docs");
//!     let mut index = build_tree(root, SourceType::Manual)?;
//!     let configs = read_configs(root)?;
//!     apply_configs(&mut index, &configs);
//!     apply_libs(&mut index);
//!     Ok(())
//! }
//! ```

mod classify;
mod config;
mod error;
mod merge;
mod node;
mod tree;

pub use classify::{apply_autodocs, apply_configs, apply_libs, PATH_SEPARATOR};
pub use config::{read_configs, ConfigMap, LibraryConfig, LIBRARY_CONFIG_FILE};
pub use error::{IndexError, Result};
pub use merge::merge;
pub use node::{IndexNode, NodeClass, SourceType};
pub use tree::build_tree;
