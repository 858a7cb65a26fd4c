//! elftai - Personal title catalog
//!
//! Keeps a list of titles (books, series, courses...), each with
//! case-insensitive aliases, free-text comments and an ordered list of
//! unique items, stored in a plain delimited-text file.
//!
//! # Architecture
//!
//! - Every title is a [`TitleRecord`]: a [`NamedEntity`] (title plus aliases),
//!   a [`CommentLog`] and its items
//! - The [`RecordStore`] loads the whole catalog on open, keeps it sorted by
//!   title, enforces store-wide name uniqueness and writes it back on close
//! - Each save snapshots the previous file and copies it to a backup path
//!
//! # Modules
//!
//! - `domain`: Record model and error type
//! - `core`: Catalog file codec and the record store
//! - `config`: Path and display configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! elftai add Mathematics --alias math
//! elftai item add math 1134 1135
//! elftai comment add math "Left 1135 at page 72"
//! elftai list math -e 3
//! elftai find 1134
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{RecordDetail, RecordStore, RecordSummary, StoreConfig};
pub use domain::{
    CatalogError, CatalogResult, CommentLog, ErrorKind, NamedEntity, TitleRecord, DEFAULT_TITLE,
};
