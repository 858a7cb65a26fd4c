//! Identity of a catalog entry: a title plus its aliases.
//!
//! Titles keep the case and spacing they were given, aliases are trimmed and
//! folded to lowercase. Identity, equality and ordering all go through the
//! trimmed, lowercased title.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::error::{CatalogError, CatalogResult};

/// Title used when an entity is created or renamed with an empty string
pub const DEFAULT_TITLE: &str = "Null";

/// A title and its set of aliases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    title: String,
    aliases: BTreeSet<String>,
}

impl Default for NamedEntity {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl NamedEntity {
    /// Create an entity with no aliases
    pub fn new(title: impl Into<String>) -> Self {
        let mut entity = Self {
            title: String::new(),
            aliases: BTreeSet::new(),
        };
        entity.set_title(title);
        entity
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title; a blank string becomes [`DEFAULT_TITLE`]
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        };
    }

    /// Trimmed, lowercased title, the key used for comparisons
    pub fn title_key(&self) -> String {
        fold(&self.title)
    }

    /// Case-insensitive alias membership
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.contains(&fold(alias))
    }

    /// Add an alias, stored trimmed and lowercased.
    ///
    /// A blank alias is rejected, as is one this entity already has.
    pub fn add_alias(&mut self, alias: &str) -> CatalogResult<()> {
        let folded = fold(alias);
        if folded.is_empty() {
            return Err(CatalogError::EmptyAlias {
                title: self.title.clone(),
            });
        }
        if self.aliases.contains(&folded) {
            return Err(CatalogError::DuplicateAlias {
                alias: folded,
                owner: self.title.clone(),
            });
        }
        self.aliases.insert(folded);
        Ok(())
    }

    /// Remove an alias (case-insensitive)
    pub fn remove_alias(&mut self, alias: &str) -> CatalogResult<()> {
        if !self.aliases.remove(&fold(alias)) {
            return Err(CatalogError::AliasNotFound {
                alias: alias.to_string(),
                title: self.title.clone(),
            });
        }
        Ok(())
    }

    /// All aliases. Order carries no meaning.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Whether `name` (already lowercased) is this entity's title or one of its aliases
    pub(crate) fn answers_to(&self, folded: &str) -> bool {
        self.title_key() == folded || self.aliases.contains(folded)
    }

    /// Order two entities by lowercased title
    pub fn cmp_by_title(&self, other: &Self) -> Ordering {
        self.title_key().cmp(&other.title_key())
    }

    /// Whether two entities share a title, ignoring case
    pub fn same_title(&self, other: &Self) -> bool {
        self.cmp_by_title(other) == Ordering::Equal
    }
}

/// Key form of a name: surrounding whitespace dropped, lowercased
pub(crate) fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
