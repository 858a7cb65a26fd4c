//! File-backed collection of catalog titles.
//!
//! The store loads every record from its backing file when opened, serves
//! lookups and mutations in memory, and writes everything back on close.
//!
//! # Invariants
//!
//! - Records stay sorted by lowercased title.
//! - A lowercased name (title or alias) resolves to at most one record.
//! - Saving snapshots the old file before overwriting it, restores the
//!   snapshot if the overwrite fails, then writes the snapshot to the backup
//!   path when one is given.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::rows::{RowReader, RowWriter};
use super::views::{RecordDetail, RecordSummary};
use crate::domain::entity::fold;
use crate::domain::{CatalogError, CatalogResult, TitleRecord, DEFAULT_TITLE};

/// Where a store reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing catalog file
    pub path: PathBuf,

    /// Receives the previous catalog contents on every save
    pub backup_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_path: None,
        }
    }

    pub fn with_backup(mut self, backup_path: impl Into<PathBuf>) -> Self {
        self.backup_path = Some(backup_path.into());
        self
    }
}

/// The catalog: every title, kept sorted
///
/// A store built with [`RecordStore::open`] saves itself back to its file on
/// [`close`](RecordStore::close), or when dropped without being closed.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<TitleRecord>,
    config: Option<StoreConfig>,
    closed: bool,
}

impl RecordStore {
    /// Open the store described by `config`, loading its file
    pub fn open(config: StoreConfig) -> CatalogResult<Self> {
        let mut store = Self::default();
        store.load(&config.path)?;
        store.config = Some(config);
        Ok(store)
    }

    pub fn config(&self) -> Option<&StoreConfig> {
        self.config.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, sorted by title
    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Find the record whose title or alias is `name`.
    ///
    /// Surrounding whitespace is ignored and the match is case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<&TitleRecord> {
        self.position(name).map(|idx| &self.records[idx])
    }

    /// Every record holding `item` (case-insensitive)
    pub fn find_by_item(&self, item: &str) -> Vec<&TitleRecord> {
        self.records
            .iter()
            .filter(|record| record.has_item(item).is_some())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let folded = fold(name);
        self.records
            .iter()
            .position(|record| record.entity().answers_to(&folded))
    }

    fn resolve_mut(&mut self, name: &str) -> CatalogResult<&mut TitleRecord> {
        let idx = self
            .position(name)
            .ok_or_else(|| CatalogError::TitleNotFound(name.trim().to_string()))?;
        Ok(&mut self.records[idx])
    }

    fn sort(&mut self) {
        self.records.sort_by(TitleRecord::cmp_by_title);
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Add a new, empty title, returning the title as stored
    pub fn add_record(&mut self, title: &str) -> CatalogResult<String> {
        let record = TitleRecord::new(title.trim());
        if let Some(owner) = self.find_by_name(record.title()) {
            return Err(CatalogError::DuplicateTitle {
                title: record.title().to_string(),
                owner: owner.title().to_string(),
            });
        }

        debug!(title = record.title(), "Adding title");
        let stored = record.title().to_string();
        self.records.push(record);
        self.sort();
        Ok(stored)
    }

    /// Remove the record named `name`, returning it
    pub fn remove_record(&mut self, name: &str) -> CatalogResult<TitleRecord> {
        let idx = self
            .position(name)
            .ok_or_else(|| CatalogError::TitleNotFound(name.trim().to_string()))?;
        let record = self.records.remove(idx);
        debug!(title = record.title(), "Removed title");
        Ok(record)
    }

    /// Give the record named `name` a new title.
    ///
    /// The new title may differ from the old one only in case, but it may not
    /// spell one of the record's own aliases.
    pub fn rename_record(&mut self, name: &str, new_title: &str) -> CatalogResult<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| CatalogError::TitleNotFound(name.trim().to_string()))?;

        let new_title = match new_title.trim() {
            "" => DEFAULT_TITLE,
            trimmed => trimmed,
        };
        if let Some(other) = self.position(new_title) {
            let owner = self.records[other].title().to_string();
            if other != idx {
                return Err(CatalogError::DuplicateTitle {
                    title: new_title.to_string(),
                    owner,
                });
            }
            if self.records[idx].has_alias(new_title) {
                return Err(CatalogError::DuplicateAlias {
                    alias: fold(new_title),
                    owner,
                });
            }
        }

        self.records[idx].set_title(new_title);
        self.sort();
        Ok(())
    }

    // ========================================================================
    // Aliases
    // ========================================================================

    /// Add one alias to the record named `name`.
    ///
    /// Fails if any record already answers to `alias`.
    pub fn add_alias(&mut self, name: &str, alias: &str) -> CatalogResult<()> {
        self.add_aliases(name, &[alias])
    }

    /// Add several aliases at once. Either all are added or none are.
    pub fn add_aliases<S: AsRef<str>>(&mut self, name: &str, aliases: &[S]) -> CatalogResult<()> {
        let title = self
            .find_by_name(name)
            .map(|record| record.title().to_string())
            .ok_or_else(|| CatalogError::TitleNotFound(name.trim().to_string()))?;

        let folded: Vec<String> = aliases.iter().map(|alias| fold(alias.as_ref())).collect();

        for (i, alias) in folded.iter().enumerate() {
            if alias.is_empty() {
                return Err(CatalogError::EmptyAlias { title });
            }
            if let Some(owner) = self.find_by_name(alias) {
                return Err(CatalogError::DuplicateAlias {
                    alias: alias.clone(),
                    owner: owner.title().to_string(),
                });
            }
            if folded[..i].contains(alias) {
                return Err(CatalogError::DuplicateAlias {
                    alias: alias.clone(),
                    owner: title,
                });
            }
        }

        let record = self.resolve_mut(name)?;
        for alias in &folded {
            record.add_alias(alias)?;
        }
        Ok(())
    }

    /// Remove `alias` from whichever record holds it
    pub fn remove_alias(&mut self, alias: &str) -> CatalogResult<()> {
        self.resolve_mut(alias)?.remove_alias(alias.trim())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    pub fn add_comment(&mut self, name: &str, comment: &str) -> CatalogResult<()> {
        self.resolve_mut(name)?.comments_mut().add(comment);
        Ok(())
    }

    pub fn add_comments<S: AsRef<str>>(&mut self, name: &str, comments: &[S]) -> CatalogResult<()> {
        self.resolve_mut(name)?
            .comments_mut()
            .extend(comments.iter().map(|c| c.as_ref()));
        Ok(())
    }

    /// Replace comment `index`, returning the old text
    pub fn set_comment(&mut self, name: &str, index: usize, comment: &str) -> CatalogResult<String> {
        self.resolve_mut(name)?.comments_mut().set(index, comment)
    }

    /// Remove comment `index`, returning its text
    pub fn remove_comment(&mut self, name: &str, index: usize) -> CatalogResult<String> {
        self.resolve_mut(name)?.comments_mut().remove(index)
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub fn add_item(&mut self, name: &str, item: &str) -> CatalogResult<()> {
        self.resolve_mut(name)?.add_item(item)
    }

    /// Remove `item` from the record named `name`, returning the stored spelling
    pub fn remove_item(&mut self, name: &str, item: &str) -> CatalogResult<String> {
        self.resolve_mut(name)?.remove_item(item)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Title and aliases of every record
    pub fn summary(&self) -> Vec<RecordSummary> {
        self.records.iter().map(RecordSummary::from).collect()
    }

    /// Full detail for the record named `name`, or for every record.
    ///
    /// `limit` keeps only the most recent items of each record.
    pub fn full(&self, name: Option<&str>, limit: Option<usize>) -> CatalogResult<Vec<RecordDetail>> {
        match name {
            Some(name) => {
                let record = self
                    .find_by_name(name)
                    .ok_or_else(|| CatalogError::TitleNotFound(name.trim().to_string()))?;
                Ok(vec![RecordDetail::from_record(record, limit)])
            }
            None => Ok(self
                .records
                .iter()
                .map(|record| RecordDetail::from_record(record, limit))
                .collect()),
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replace the in-memory records with the contents of `path`.
    ///
    /// A missing file is created empty. Returns the number of records read.
    pub fn load(&mut self, path: &Path) -> CatalogResult<usize> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_empty(path)?;
                info!(path = %path.display(), "Created empty catalog");
                self.records.clear();
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = RowReader::new(&text);
        let mut names: HashMap<String, String> = HashMap::new();
        let mut records = Vec::new();

        loop {
            let start = reader.row() + 1;
            let Some(record) = TitleRecord::decode(&mut reader)? else {
                break;
            };

            let keys = std::iter::once(record.entity().title_key())
                .chain(record.aliases().map(str::to_string));
            for key in keys {
                if let Some(owner) = names.get(&key) {
                    return Err(CatalogError::format(
                        start,
                        format!("'{}' is already used by '{}'", key, owner),
                    ));
                }
                names.insert(key, record.title().to_string());
            }
            records.push(record);
        }

        self.records = records;
        self.sort();
        debug!(path = %path.display(), records = self.records.len(), "Loaded catalog");
        Ok(self.records.len())
    }

    /// Write every record to `path`.
    ///
    /// The current contents of `path` are read first. If overwriting fails
    /// they are written back. When `backup_path` is given they are also
    /// copied there. Restore and backup failures are logged, not returned.
    pub fn save(&self, path: &Path, backup_path: Option<&Path>) -> CatalogResult<()> {
        self.save_with(path, backup_path, |target| self.write_records(target))
    }

    fn save_with<F>(&self, path: &Path, backup_path: Option<&Path>, write: F) -> CatalogResult<()>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let snapshot = match fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No previous catalog to snapshot");
                None
            }
        };

        let written = write(path);

        if let Err(ref e) = written {
            error!(path = %path.display(), error = %e, "Failed to write catalog");
            if let Some(ref bytes) = snapshot {
                match fs::write(path, bytes) {
                    Ok(()) => warn!(path = %path.display(), "Restored previous catalog contents"),
                    Err(restore_err) => error!(
                        path = %path.display(),
                        error = %restore_err,
                        "Failed to restore previous catalog contents"
                    ),
                }
            }
        }

        if let (Some(backup), Some(bytes)) = (backup_path, snapshot.as_ref()) {
            match fs::write(backup, bytes) {
                Ok(()) => debug!(backup = %backup.display(), "Wrote catalog backup"),
                Err(e) => warn!(backup = %backup.display(), error = %e, "Failed to write catalog backup"),
            }
        }

        written?;
        debug!(path = %path.display(), records = self.records.len(), "Saved catalog");
        Ok(())
    }

    fn write_records(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = RowWriter::new(BufWriter::new(file));
        for record in &self.records {
            record.encode(&mut writer)?;
        }
        writer.flush()
    }

    /// Save to the configured file (and backup), ending the session
    pub fn close(mut self) -> CatalogResult<()> {
        self.closed = true;
        self.save_configured()
    }

    fn save_configured(&self) -> CatalogResult<()> {
        match &self.config {
            Some(config) => self.save(&config.path, config.backup_path.as_deref()),
            None => Ok(()),
        }
    }
}

impl Drop for RecordStore {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.save_configured() {
            error!(error = %e, "Failed to save catalog on drop");
        }
    }
}

fn create_empty(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    File::create(path)?;
    Ok(())
}
