//! Error type shared by the record model and the store.

use std::io;

use thiserror::Error;

/// Broad classification of a [`CatalogError`].
///
/// Callers that only care about "what went wrong" (for example to pick an
/// exit code) match on this instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A uniqueness rule would be broken
    Duplicate,
    /// A name, alias or item does not resolve
    NotFound,
    /// A comment index is out of bounds
    Index,
    /// The catalog file is malformed or truncated
    Format,
    /// Reading or writing the catalog file failed
    Io,
    /// An argument can never be valid, such as a blank alias
    Invalid,
}

/// Errors raised by catalog records and the record store
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("'{title}' is already used by '{owner}'")]
    DuplicateTitle { title: String, owner: String },

    #[error("Alias '{alias}' is already used by '{owner}'")]
    DuplicateAlias { alias: String, owner: String },

    #[error("Blank alias given for '{title}'")]
    EmptyAlias { title: String },

    #[error("Item '{item}' already exists in '{title}'")]
    DuplicateItem { item: String, title: String },

    #[error("No title or alias matches '{0}'")]
    TitleNotFound(String),

    #[error("Alias '{alias}' not found on '{title}'")]
    AliasNotFound { alias: String, title: String },

    #[error("Item '{item}' not found in '{title}'")]
    ItemNotFound { item: String, title: String },

    #[error("Comment index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Malformed catalog at row {row}: {reason}")]
    Format { row: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CatalogError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateTitle { .. } | Self::DuplicateAlias { .. } | Self::DuplicateItem { .. } => {
                ErrorKind::Duplicate
            }
            Self::TitleNotFound(_) | Self::AliasNotFound { .. } | Self::ItemNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::IndexOutOfRange { .. } => ErrorKind::Index,
            Self::Format { .. } => ErrorKind::Format,
            Self::Io(_) => ErrorKind::Io,
            Self::EmptyAlias { .. } => ErrorKind::Invalid,
        }
    }

    pub(crate) fn format(row: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            row,
            reason: reason.into(),
        }
    }
}

/// Result alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            CatalogError::DuplicateTitle {
                title: "math".into(),
                owner: "Mathematics".into()
            }
            .kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(
            CatalogError::ItemNotFound {
                item: "1".into(),
                title: "Math".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CatalogError::IndexOutOfRange { index: 3, len: 1 }.kind(),
            ErrorKind::Index
        );
        assert_eq!(CatalogError::format(4, "truncated").kind(), ErrorKind::Format);
        assert_eq!(
            CatalogError::EmptyAlias {
                title: "Math".into()
            }
            .kind(),
            ErrorKind::Invalid
        );
    }

    #[test]
    fn test_messages_carry_context() {
        let err = CatalogError::DuplicateItem {
            item: "1134".into(),
            title: "Mathematics".into(),
        };
        assert_eq!(
            err.to_string(),
            "Item '1134' already exists in 'Mathematics'"
        );

        let err = CatalogError::format(7, "unterminated quoted field");
        assert!(err.to_string().contains("row 7"));
    }
}
