//! Ordered, indexable free-text annotations attached to a title.

use super::error::{CatalogError, CatalogResult};

/// Ordered list of comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentLog {
    entries: Vec<String>,
}

impl CommentLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one comment
    pub fn add(&mut self, comment: impl Into<String>) {
        self.entries.push(comment.into());
    }

    /// Append several comments, keeping their order
    pub fn extend(&mut self, comments: impl IntoIterator<Item = impl Into<String>>) {
        self.entries.extend(comments.into_iter().map(Into::into));
    }

    /// Get the comment at `index`
    pub fn get(&self, index: usize) -> CatalogResult<&str> {
        self.entries
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Replace the comment at `index`, returning the old one
    pub fn set(&mut self, index: usize, comment: impl Into<String>) -> CatalogResult<String> {
        if index >= self.entries.len() {
            return Err(self.out_of_range(index));
        }
        Ok(std::mem::replace(&mut self.entries[index], comment.into()))
    }

    /// Remove the comment at `index`, returning it
    pub fn remove(&mut self, index: usize) -> CatalogResult<String> {
        if index >= self.entries.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.entries.remove(index))
    }

    /// Owned copy of every comment, in order
    pub fn list(&self) -> Vec<String> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn out_of_range(&self, index: usize) -> CatalogError {
        CatalogError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        }
    }
}

impl FromIterator<String> for CommentLog {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_add_and_extend_keep_order() {
        let mut log = CommentLog::new();
        log.add("first");
        log.extend(["second", "third"]);

        assert_eq!(log.len(), 3);
        assert_eq!(log.list(), vec!["first", "second", "third"]);
        assert_eq!(log.get(1).unwrap(), "second");
    }

    #[test]
    fn test_set_returns_replaced_value() {
        let mut log = CommentLog::new();
        log.add("Left 1135 at page 72");

        let old = log.set(0, "Finished 1135").unwrap();
        assert_eq!(old, "Left 1135 at page 72");
        assert_eq!(log.get(0).unwrap(), "Finished 1135");
    }

    #[test]
    fn test_remove_returns_removed_value() {
        let mut log = CommentLog::new();
        log.extend(["a", "b", "c"]);

        assert_eq!(log.remove(1).unwrap(), "b");
        assert_eq!(log.list(), vec!["a", "c"]);
    }

    #[test]
    fn test_out_of_range_is_index_error() {
        let mut log = CommentLog::new();
        log.add("only");

        assert_eq!(log.get(1).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(log.set(5, "x").unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(log.remove(1).unwrap_err().kind(), ErrorKind::Index);
        // Failed operations leave the log untouched
        assert_eq!(log.list(), vec!["only"]);
    }

    #[test]
    fn test_list_is_a_copy() {
        let mut log = CommentLog::new();
        log.add("x");

        let mut copy = log.list();
        copy.push("y".to_string());
        assert_eq!(log.len(), 1);
    }
}
