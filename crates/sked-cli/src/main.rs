//! `sked` — command-line front end for the sked schedule store.
//!
//! # Usage
//!
//! ```text
//! sked add --title "Team sync" --date 2024-03-01 --time 09:00 --remind
//! sked list --search sync --category Work
//! sked done 3
//! sked delete --title "Team sync" --date 2024-03-01
//! sked export
//! sked watch
//! ```

mod commands;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sked_core::{
  entry::{Category, Priority},
  store::CategoryFilter,
};
use sked_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sked", version, about = "Personal schedule manager")]
struct Cli {
  /// Path to a TOML settings file.
  #[arg(long, value_name = "FILE", global = true, env = "SKED_CONFIG")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Add a new entry.
  Add(AddArgs),
  /// Change fields of an existing entry.
  Edit {
    id:     i64,
    #[command(flatten)]
    fields: EditArgs,
  },
  /// List entries in date order.
  List {
    /// Only entries whose title or description contains this text.
    #[arg(short, long)]
    search:   Option<String>,
    /// `All` or one of Default, Work, Study, Life, Other.
    #[arg(short, long, default_value = "All")]
    category: CategoryFilter,
    /// Print JSON instead of a table.
    #[arg(long)]
    json:     bool,
  },
  /// Mark entries complete.
  Done(KeyArgs),
  /// Delete entries.
  Delete {
    #[command(flatten)]
    key: KeyArgs,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
  },
  /// Export every entry to a timestamped CSV file.
  Export {
    /// Directory to write to (default: the data directory).
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
  },
  /// Show entries whose reminder is due.
  Remind {
    /// Evaluate at this local moment instead of now.
    #[arg(long, value_name = "YYYY-MM-DD HH:MM")]
    at: Option<String>,
  },
  /// Keep running and print reminders as they fall due.
  Watch,
}

#[derive(Args, Debug)]
struct AddArgs {
  #[arg(short, long)]
  title:       String,
  /// YYYY-MM-DD (default: today).
  #[arg(short, long)]
  date:        Option<String>,
  /// HH:MM, 24-hour (default: now).
  #[arg(long)]
  time:        Option<String>,
  #[arg(long, default_value = "")]
  description: String,
  #[arg(short, long, default_value = "Normal")]
  priority:    Priority,
  #[arg(short, long, default_value = "Default")]
  category:    Category,
  /// Raise a reminder once the entry is due.
  #[arg(short, long)]
  remind:      bool,
}

#[derive(Args, Debug)]
struct EditArgs {
  #[arg(short, long)]
  title:       Option<String>,
  #[arg(short, long)]
  date:        Option<String>,
  #[arg(long)]
  time:        Option<String>,
  #[arg(long)]
  description: Option<String>,
  #[arg(short, long)]
  priority:    Option<Priority>,
  #[arg(short, long)]
  category:    Option<Category>,
  /// `true` or `false`.
  #[arg(short, long)]
  remind:      Option<bool>,
}

/// Selects entries either by id or by title and date.
#[derive(Args, Debug)]
struct KeyArgs {
  #[arg(required_unless_present = "title", conflicts_with = "title")]
  id:    Option<i64>,
  /// Match every entry with this exact title (requires --date).
  #[arg(long, requires = "date")]
  title: Option<String>,
  #[arg(long, requires = "title")]
  date:  Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(cli.config.as_deref())?;

  let data_dir = settings.data_dir()?;
  let store_path = SqliteStore::file_in(&data_dir);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open schedule store at {store_path:?}"))?;

  commands::run(cli.command, &store, &settings, &data_dir).await
}
