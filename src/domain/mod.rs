//! Domain types for the title catalog.
//!
//! This module contains the record model:
//! - CommentLog: ordered free-text annotations
//! - NamedEntity: title plus case-folded aliases
//! - TitleRecord: a catalog entry with comments and unique items
//! - CatalogError: the error type every operation returns

pub mod comments;
pub mod entity;
pub mod error;
pub mod title;

// Re-export commonly used types
pub use comments::CommentLog;
pub use entity::{NamedEntity, DEFAULT_TITLE};
pub use error::{CatalogError, CatalogResult, ErrorKind};
pub use title::TitleRecord;
