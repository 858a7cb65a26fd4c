//! Configuration for elftai paths and display defaults.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI via [`ResolvedConfig::with_overrides`])
//! 2. Environment variables (ELFTAI_HOME, ELFTAI_DATABASE)
//! 3. Config file (.elftai/config.yaml)
//! 4. Defaults (~/.elftai/database.csv, backup alongside as database.csv.bk)
//!
//! Config file discovery:
//! - Searches current directory and parents for .elftai/config.yaml
//! - Paths in config file are relative to the directory holding .elftai/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::StoreConfig;

/// Directory name searched for while discovering the config file
pub const CONFIG_DIR: &str = ".elftai";

/// Default database file stem
pub const DEFAULT_DATABASE_NAME: &str = "database";

/// Default number of latest items shown per title
pub const DEFAULT_ENTRIES: usize = 5;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// File stem used under the home directory
    pub name: Option<String>,
    /// Explicit database file (relative to the project root)
    pub path: Option<String>,
    /// `true`/`false`, or an explicit backup file path
    pub backup: Option<BackupSetting>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BackupSetting {
    Enabled(bool),
    Path(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    pub entries: Option<usize>,
}

/// Values taken from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub home: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            home: std::env::var_os("ELFTAI_HOME").map(PathBuf::from),
            database: std::env::var_os("ELFTAI_DATABASE").map(PathBuf::from),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// elftai home directory
    pub home: PathBuf,
    /// Catalog file
    pub database: PathBuf,
    /// Backup file, if backups are enabled
    pub backup: Option<PathBuf>,
    /// Latest items shown per title by default
    pub entries: usize,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Apply command-line overrides.
    ///
    /// A new database path without an explicit backup moves the default
    /// backup next to it.
    pub fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        backup: Option<PathBuf>,
        no_backup: bool,
    ) -> Self {
        if let Some(database) = database {
            if self.backup.is_some() {
                self.backup = Some(default_backup_path(&database));
            }
            self.database = database;
        }
        if let Some(backup) = backup {
            self.backup = Some(backup);
        }
        if no_backup {
            self.backup = None;
        }
        self
    }

    /// Store settings for opening the catalog
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(&self.database);
        match &self.backup {
            Some(backup) => config.with_backup(backup),
            None => config,
        }
    }
}

/// `<file>.bk` next to the database file
pub fn default_backup_path(database: &Path) -> PathBuf {
    let mut name = database
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".bk");
    database.with_file_name(name)
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Combine a config file (if any) with environment overrides
fn resolve(config_file: Option<PathBuf>, env: EnvOverrides) -> Result<ResolvedConfig> {
    let home = match env.home {
        Some(home) => home,
        None => dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(CONFIG_DIR),
    };

    let file = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    // Project root is the parent of .elftai/ (grandparent of config.yaml)
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let database = if let Some(env_db) = env.database {
        env_db
    } else if let Some(ref db_path) = file.database.path {
        resolve_path(&base_dir, db_path)
    } else {
        let name = file
            .database
            .name
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_NAME);
        home.join(format!("{}.csv", name))
    };

    let backup = match file.database.backup {
        None | Some(BackupSetting::Enabled(true)) => Some(default_backup_path(&database)),
        Some(BackupSetting::Enabled(false)) => None,
        Some(BackupSetting::Path(ref p)) => Some(resolve_path(&base_dir, p)),
    };

    Ok(ResolvedConfig {
        home,
        database,
        backup,
        entries: file.display.entries.unwrap_or(DEFAULT_ENTRIES),
        config_file,
    })
}

/// Load configuration from all sources
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    resolve(find_config_file(&cwd), EnvOverrides::from_env())
}
