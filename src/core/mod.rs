//! Catalog storage.
//!
//! This module contains:
//! - rows: RFC 4180-style row reader and writer for the catalog file
//! - RecordStore: the sorted, file-backed collection of titles
//! - views: plain-data projections for display

pub mod rows;
pub mod store;
pub mod views;

// Re-export commonly used types
pub use rows::{RowReader, RowWriter};
pub use store::{RecordStore, StoreConfig};
pub use views::{IndexedComment, RecordDetail, RecordSummary};
