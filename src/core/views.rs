//! Plain-data views of catalog records for display layers.

use serde::Serialize;

use crate::domain::TitleRecord;

/// One-line view: title and aliases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub title: String,
    pub aliases: Vec<String>,
}

impl From<&TitleRecord> for RecordSummary {
    fn from(record: &TitleRecord) -> Self {
        Self {
            title: record.title().to_string(),
            aliases: record.aliases().map(str::to_string).collect(),
        }
    }
}

/// A comment paired with the index used to address it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedComment {
    pub index: usize,
    pub text: String,
}

/// Full view of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDetail {
    pub title: String,
    pub aliases: Vec<String>,
    pub comments: Vec<IndexedComment>,
    /// Most recent items, oldest first
    pub items: Vec<String>,
    /// Item count before any limit was applied
    pub total_items: usize,
}

impl RecordDetail {
    pub fn from_record(record: &TitleRecord, limit: Option<usize>) -> Self {
        Self {
            title: record.title().to_string(),
            aliases: record.aliases().map(str::to_string).collect(),
            comments: record
                .comments()
                .iter()
                .enumerate()
                .map(|(index, text)| IndexedComment {
                    index,
                    text: text.to_string(),
                })
                .collect(),
            items: record.items(limit).to_vec(),
            total_items: record.item_count(),
        }
    }

    /// Whether `items` was cut short by the limit
    pub fn is_truncated(&self) -> bool {
        self.items.len() < self.total_items
    }
}
