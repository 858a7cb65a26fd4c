//! A catalog title: identity, comments and an ordered list of unique items.
//!
//! On disk every title takes exactly three rows:
//!
//! ```text
//! <title>,<alias1>,<alias2>,...
//! <comment1>,<comment2>,...
//! <item1>,<item2>,...
//! ```

use std::cmp::Ordering;
use std::io::{self, Write};

use super::comments::CommentLog;
use super::entity::{fold, NamedEntity};
use super::error::{CatalogError, CatalogResult};
use crate::core::rows::{RowReader, RowWriter};

/// A single catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleRecord {
    entity: NamedEntity,
    comments: CommentLog,
    items: Vec<String>,
}

impl TitleRecord {
    /// Create a record with no aliases, comments or items
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            entity: NamedEntity::new(title),
            comments: CommentLog::new(),
            items: Vec::new(),
        }
    }

    pub fn entity(&self) -> &NamedEntity {
        &self.entity
    }

    pub fn title(&self) -> &str {
        self.entity.title()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.entity.set_title(title);
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.entity.has_alias(alias)
    }

    pub fn add_alias(&mut self, alias: &str) -> CatalogResult<()> {
        self.entity.add_alias(alias)
    }

    pub fn remove_alias(&mut self, alias: &str) -> CatalogResult<()> {
        self.entity.remove_alias(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entity.aliases()
    }

    pub fn comments(&self) -> &CommentLog {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut CommentLog {
        &mut self.comments
    }

    /// Order two records by lowercased title
    pub fn cmp_by_title(&self, other: &Self) -> Ordering {
        self.entity.cmp_by_title(&other.entity)
    }

    /// Index of the first item equal to `item`, ignoring case
    pub fn has_item(&self, item: &str) -> Option<usize> {
        let folded = item.to_lowercase();
        self.items.iter().position(|i| i.to_lowercase() == folded)
    }

    /// Append a unique item
    pub fn add_item(&mut self, item: impl Into<String>) -> CatalogResult<()> {
        let item = item.into();
        if self.has_item(&item).is_some() {
            return Err(CatalogError::DuplicateItem {
                item,
                title: self.title().to_string(),
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove an item (case-insensitive), returning the stored spelling
    pub fn remove_item(&mut self, item: &str) -> CatalogResult<String> {
        match self.has_item(item) {
            Some(idx) => Ok(self.items.remove(idx)),
            None => Err(CatalogError::ItemNotFound {
                item: item.to_string(),
                title: self.title().to_string(),
            }),
        }
    }

    /// Items in insertion order.
    ///
    /// With `Some(n)`, only the `n` most recently added items are returned,
    /// so `Some(0)` returns none.
    pub fn items(&self, limit: Option<usize>) -> &[String] {
        match limit {
            Some(n) => &self.items[self.items.len().saturating_sub(n)..],
            None => &self.items,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Write this record as its three rows
    pub fn encode<W: Write>(&self, writer: &mut RowWriter<W>) -> io::Result<()> {
        let title_row = std::iter::once(self.title()).chain(self.aliases());
        writer.write_row(title_row)?;
        writer.write_row(self.comments.iter())?;
        writer.write_row(&self.items)?;
        Ok(())
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` once the input is exhausted. A group cut short after
    /// its first row is a format error.
    pub fn decode(reader: &mut RowReader<'_>) -> CatalogResult<Option<Self>> {
        let Some(title_row) = reader.next_row()? else {
            return Ok(None);
        };
        let start = reader.row();

        let mut fields = title_row.into_iter();
        let title = fields
            .next()
            .ok_or_else(|| CatalogError::format(start, "title row is empty"))?;

        let mut record = Self::new(title);
        let title_key = record.entity().title_key();
        for alias in fields {
            // An alias spelling its own title adds nothing
            if fold(&alias) == title_key {
                continue;
            }
            record.add_alias(&alias).map_err(|e| match e {
                CatalogError::EmptyAlias { .. } => CatalogError::format(start, "blank alias"),
                _ => CatalogError::format(start, format!("alias '{}' repeated", alias)),
            })?;
        }

        let comments = Self::require_row(reader, start, "comment")?;
        record.comments.extend(comments);

        record.items = Self::require_row(reader, start, "item")?;

        Ok(Some(record))
    }

    fn require_row(
        reader: &mut RowReader<'_>,
        start: usize,
        what: &str,
    ) -> CatalogResult<Vec<String>> {
        reader.next_row()?.ok_or_else(|| {
            CatalogError::format(
                start,
                format!("record truncated before its {} row", what),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    fn encode_to_string(records: &[TitleRecord]) -> String {
        let mut writer = RowWriter::new(Vec::new());
        for record in records {
            record.encode(&mut writer).unwrap();
        }
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut record = TitleRecord::new("Mathematics");
        for item in ["1134", "1135", "1136"] {
            record.add_item(item).unwrap();
        }
        assert_eq!(record.items(None), ["1134", "1135", "1136"]);
    }

    #[test]
    fn test_duplicate_item_leaves_items_unchanged() {
        let mut record = TitleRecord::new("Comics");
        record.add_item("Issue-A").unwrap();
        record.add_item("Issue-B").unwrap();

        for attempt in ["Issue-A", "issue-a", "ISSUE-B"] {
            let err = record.add_item(attempt).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Duplicate);
            assert_eq!(record.items(None), ["Issue-A", "Issue-B"]);
        }
    }

    #[test]
    fn test_has_item_is_case_insensitive() {
        let mut record = TitleRecord::new("Comics");
        record.add_item("abc").unwrap();
        record.add_item("DEF").unwrap();

        assert_eq!(record.has_item("def"), Some(1));
        assert_eq!(record.has_item("ABC"), Some(0));
        assert_eq!(record.has_item("xyz"), None);
    }

    #[test]
    fn test_remove_item() {
        let mut record = TitleRecord::new("Comics");
        record.add_item("Issue-1").unwrap();

        assert_eq!(record.remove_item("issue-1").unwrap(), "Issue-1");
        assert_eq!(record.item_count(), 0);

        let err = record.remove_item("issue-1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("Comics"));
    }

    #[test]
    fn test_items_limit_returns_most_recent() {
        let mut record = TitleRecord::new("Letters");
        for item in ["a", "b", "c", "d"] {
            record.add_item(item).unwrap();
        }

        assert_eq!(record.items(Some(2)), ["c", "d"]);
        assert_eq!(record.items(Some(100)), ["a", "b", "c", "d"]);
        assert_eq!(record.items(None), ["a", "b", "c", "d"]);
        assert!(record.items(Some(0)).is_empty());
    }

    #[test]
    fn test_encode_writes_three_rows() {
        let mut record = TitleRecord::new("Mathematics");
        record.add_alias("math").unwrap();
        record.add_item("1134").unwrap();

        let text = encode_to_string(&[record]);
        assert_eq!(text, "Mathematics,math\r\n\r\n1134\r\n");
    }

    #[test]
    fn test_round_trip() {
        let mut record = TitleRecord::new("T");
        record.add_alias("a").unwrap();
        record.add_alias("b").unwrap();
        record.comments_mut().extend(["x", "y"]);
        for item in ["1", "2", "3"] {
            record.add_item(item).unwrap();
        }

        let text = encode_to_string(std::slice::from_ref(&record));
        let mut reader = RowReader::new(&text);
        let decoded = TitleRecord::decode(&mut reader).unwrap().unwrap();

        assert_eq!(decoded, record);
        assert!(decoded.has_alias("A"));
        assert_eq!(decoded.comments().list(), vec!["x", "y"]);
        assert_eq!(decoded.items(None), ["1", "2", "3"]);
        assert!(TitleRecord::decode(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_decode_folds_aliases_but_not_items() {
        let mut reader = RowReader::new("Mathematics,MATH,Calc\r\nnote\r\nAbC,dEf\r\n");
        let record = TitleRecord::decode(&mut reader).unwrap().unwrap();

        assert_eq!(record.title(), "Mathematics");
        assert_eq!(record.aliases().collect::<Vec<_>>(), vec!["calc", "math"]);
        assert_eq!(record.comments().list(), vec!["note"]);
        assert_eq!(record.items(None), ["AbC", "dEf"]);
    }

    #[test]
    fn test_decode_empty_input_is_end_of_data() {
        let mut reader = RowReader::new("");
        assert!(TitleRecord::decode(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_decode_truncated_group_is_format_error() {
        for text in ["Mathematics\r\n", "Mathematics\r\ncomment\r\n"] {
            let mut reader = RowReader::new(text);
            let err = TitleRecord::decode(&mut reader).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format);
        }
    }

    #[test]
    fn test_decode_empty_title_row_is_format_error() {
        let mut reader = RowReader::new("\r\n\r\n\r\n");
        let err = TitleRecord::decode(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_decode_drops_alias_matching_own_title() {
        let mut reader = RowReader::new("Z,z,zebra\r\n\r\n\r\n");
        let record = TitleRecord::decode(&mut reader).unwrap().unwrap();
        assert_eq!(record.title(), "Z");
        assert_eq!(record.aliases().collect::<Vec<_>>(), vec!["zebra"]);
    }

    #[test]
    fn test_decode_blank_alias_is_format_error() {
        let mut reader = RowReader::new("Mathematics, \r\n\r\n\r\n");
        let err = TitleRecord::decode(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("blank alias"));
    }

    #[test]
    fn test_decode_keeps_title_spacing_but_matches_trimmed() {
        let mut reader = RowReader::new(" Mathematics\r\n\r\n\r\n");
        let record = TitleRecord::decode(&mut reader).unwrap().unwrap();
        assert_eq!(record.title(), " Mathematics");
        assert_eq!(record.entity().title_key(), "mathematics");
    }

    #[test]
    fn test_decode_empty_title_field_uses_default() {
        let mut reader = RowReader::new("\"\"\r\n\r\n\r\n");
        let record = TitleRecord::decode(&mut reader).unwrap().unwrap();
        assert_eq!(record.title(), crate::domain::DEFAULT_TITLE);
    }
}
