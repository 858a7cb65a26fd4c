//! Command-line interface for elftai.
//!
//! Every command opens the catalog, applies one query or change, and closes
//! the catalog again (which rewrites the file and refreshes the backup).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig};
use crate::core::{RecordStore, RecordSummary};
use crate::domain::{CatalogError, ErrorKind};

pub mod render;

/// elftai - Keep track of titles, their aliases, comments and items
#[derive(Parser, Debug)]
#[command(name = "elftai")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file to use (overrides config file and ELFTAI_DATABASE)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Where to keep the previous catalog contents on save
    #[arg(long, global = true, conflicts_with = "no_backup")]
    pub backup: Option<PathBuf>,

    /// Save without keeping a backup
    #[arg(long, global = true)]
    pub no_backup: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all titles, or show details of the named ones
    #[command(visible_alias = "l")]
    List {
        /// Titles to show in detail. If none, print a summary of all titles.
        names: Vec<String>,

        /// Number of latest items to print (0 prints none)
        #[arg(short, long)]
        entries: Option<usize>,

        /// Print every item
        #[arg(short, long, conflicts_with = "entries")]
        all: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of every title
    Show {
        /// Number of latest items to print (0 prints none)
        #[arg(short, long)]
        entries: Option<usize>,

        /// Print every item
        #[arg(short, long, conflicts_with = "entries")]
        all: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new title
    Add {
        /// Title to add (case is kept as given)
        title: String,

        /// Aliases for the new title
        #[arg(short, long = "alias")]
        aliases: Vec<String>,
    },

    /// Remove a title
    #[command(visible_alias = "rm")]
    Remove {
        /// Title or alias
        name: String,
    },

    /// Change a title
    Rename {
        /// Title or alias
        name: String,

        /// New title
        new_title: String,
    },

    /// Manage aliases
    Alias {
        #[command(subcommand)]
        command: AliasCommands,
    },

    /// Manage comments
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Manage items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// List titles holding an item
    Find {
        /// Item to look for
        item: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum AliasCommands {
    /// Add aliases to a title
    Add {
        /// Title or alias
        name: String,

        /// Aliases to add
        #[arg(required = true)]
        aliases: Vec<String>,
    },

    /// Remove an alias from whichever title holds it
    #[command(visible_alias = "rm")]
    Remove {
        alias: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Append comments to a title
    Add {
        /// Title or alias
        name: String,

        /// Comments to append, one per argument
        #[arg(required = true)]
        comments: Vec<String>,
    },

    /// Replace a comment
    Set {
        /// Title or alias
        name: String,

        /// Comment index, as shown by `list NAME`
        index: usize,

        /// New text
        comment: String,
    },

    /// Remove a comment
    #[command(visible_alias = "rm")]
    Remove {
        /// Title or alias
        name: String,

        /// Comment index, as shown by `list NAME`
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add items to a title
    Add {
        /// Title or alias
        name: String,

        /// Items to add
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Remove items from a title
    #[command(visible_alias = "rm")]
    Remove {
        /// Title or alias
        name: String,

        /// Items to remove
        #[arg(required = true)]
        items: Vec<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let config =
            config::load_config()?.with_overrides(self.database, self.backup, self.no_backup);

        if let Commands::Config = self.command {
            show_config(&config);
            return Ok(());
        }

        let mut store = RecordStore::open(config.store_config())
            .with_context(|| format!("Failed to open catalog: {}", config.database.display()))?;

        run_command(&mut store, self.command, &config)?;

        store
            .close()
            .with_context(|| format!("Failed to save catalog: {}", config.database.display()))
    }
}

/// Process exit code for an error returned by [`Cli::execute`]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<CatalogError>())
        .map(CatalogError::kind);

    match kind {
        Some(ErrorKind::Duplicate) => 3,
        Some(ErrorKind::NotFound) => 4,
        Some(ErrorKind::Index) => 5,
        Some(ErrorKind::Format) => 6,
        Some(ErrorKind::Io) => 7,
        Some(ErrorKind::Invalid) => 2,
        None => 1,
    }
}

fn run_command(store: &mut RecordStore, command: Commands, config: &ResolvedConfig) -> Result<()> {
    match command {
        Commands::List {
            names,
            entries,
            all,
            json,
        } => {
            if names.is_empty() {
                list_summary(store, json)
            } else {
                let limit = item_limit(entries, all, config);
                list_details(store, &names, limit, json)
            }
        }
        Commands::Show { entries, all, json } => {
            let details = store.full(None, item_limit(entries, all, config))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                let blocks: Vec<_> = details.iter().map(render::detail_block).collect();
                print!("{}", blocks.join("\n"));
            }
            Ok(())
        }
        Commands::Add { title, aliases } => add_title(store, &title, &aliases),
        Commands::Remove { name } => {
            let removed = store.remove_record(&name)?;
            println!("Removed '{}'", removed.title());
            Ok(())
        }
        Commands::Rename { name, new_title } => {
            store.rename_record(&name, &new_title)?;
            println!("Renamed '{}' to '{}'", name.trim(), new_title.trim());
            Ok(())
        }
        Commands::Alias { command } => match command {
            AliasCommands::Add { name, aliases } => {
                store.add_aliases(&name, &aliases)?;
                Ok(())
            }
            AliasCommands::Remove { alias } => {
                store.remove_alias(&alias)?;
                Ok(())
            }
        },
        Commands::Comment { command } => match command {
            CommentCommands::Add { name, comments } => {
                store.add_comments(&name, &comments)?;
                Ok(())
            }
            CommentCommands::Set {
                name,
                index,
                comment,
            } => {
                let old = store.set_comment(&name, index, &comment)?;
                println!("Replaced: {}", old);
                Ok(())
            }
            CommentCommands::Remove { name, index } => {
                let old = store.remove_comment(&name, index)?;
                println!("Removed: {}", old);
                Ok(())
            }
        },
        Commands::Item { command } => match command {
            ItemCommands::Add { name, items } => {
                for item in &items {
                    store.add_item(&name, item)?;
                }
                Ok(())
            }
            ItemCommands::Remove { name, items } => {
                for item in &items {
                    store.remove_item(&name, item)?;
                }
                Ok(())
            }
        },
        Commands::Find { item, json } => find_item(store, &item, json),
        Commands::Config => {
            show_config(config);
            Ok(())
        }
    }
}

/// `None` means every item
fn item_limit(entries: Option<usize>, all: bool, config: &ResolvedConfig) -> Option<usize> {
    if all {
        None
    } else {
        Some(entries.unwrap_or(config.entries))
    }
}

fn list_summary(store: &RecordStore, json: bool) -> Result<()> {
    let summary = store.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.is_empty() {
        println!("Catalog is empty. Use 'elftai add <title>' to add one.");
        return Ok(());
    }

    for line in &summary {
        println!("{}", render::summary_line(line));
    }
    Ok(())
}

fn list_details(
    store: &RecordStore,
    names: &[String],
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut details = Vec::with_capacity(names.len());
    for name in names {
        details.extend(store.full(Some(name), limit)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        let blocks: Vec<_> = details.iter().map(render::detail_block).collect();
        print!("{}", blocks.join("\n"));
    }
    Ok(())
}

/// Add a title with its aliases, leaving the catalog unchanged if any alias is taken
fn add_title(store: &mut RecordStore, title: &str, aliases: &[String]) -> Result<()> {
    let stored = store.add_record(title)?;

    if let Err(e) = store.add_aliases(&stored, aliases) {
        store.remove_record(&stored)?;
        return Err(e.into());
    }

    println!("Added '{}'", stored);
    Ok(())
}

fn find_item(store: &RecordStore, item: &str, json: bool) -> Result<()> {
    let found: Vec<RecordSummary> = store
        .find_by_item(item)
        .into_iter()
        .map(RecordSummary::from)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("No titles contain item '{}'.", item);
        return Ok(());
    }

    println!("Titles that contain item '{}':", item);
    for summary in &found {
        println!("{}", render::summary_line(summary));
    }
    Ok(())
}

fn show_config(config: &ResolvedConfig) {
    println!("elftai configuration");
    println!();
    println!(
        "Config file: {}",
        config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Home:        {}", config.home.display());
    println!("Database:    {}", config.database.display());
    println!(
        "Backup:      {}",
        config
            .backup
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(disabled)".to_string())
    );
    println!("Entries:     {}", config.entries);
}
