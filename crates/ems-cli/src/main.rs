//! `ems` — command-line frontend for the employee roster.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and runs one subcommand against it.
//!
//! # Usage
//!
//! ```
//! ems seed
//! ems search --text eng --department Engineering
//! ems stats
//! ems export roster.csv
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use ems_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ems", version, about = "Employee roster management")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the database path from the configuration.
  #[arg(long)]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing. Default to warnings so subcommand output stays
  // clean; RUST_LOG overrides.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = settings::load(&cli.config)?;
  if let Some(db) = cli.db {
    settings.db_path = db;
  }

  let store = SqliteStore::open(&settings.db_path)
    .await
    .with_context(|| {
      format!("failed to open store at {}", settings.db_path.display())
    })?;

  commands::run(cli.command, &store, &settings).await
}
