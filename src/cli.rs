use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::accounting::ColosseumAccounting;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the current war state and update the log.
    Update(UpdateArgs),
    /// Apply saved API responses to the log without network access.
    Apply(ApplyArgs),
    /// Print the log's current season, week and day.
    Status(StatusArgs),
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Saved `GET /clans/{tag}/members` response.
    #[arg(long)]
    pub members: PathBuf,

    /// Saved `GET /clans/{tag}/currentriverrace` response.
    #[arg(long)]
    pub war: PathBuf,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Markdown war log (default: $WARLOG_LOG_FILE or `war_log.md`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Options shared by the commands that write the log.
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Markdown war log (default: $WARLOG_LOG_FILE or `war_log.md`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Season number used when the log has none yet.
    #[arg(long)]
    pub starting_season: Option<u32>,

    /// How colosseum days count decks.
    #[arg(long, value_enum)]
    pub colosseum_accounting: Option<ColosseumAccounting>,

    /// Date to log under, YYYY-MM-DD (default: today, UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print the resulting document instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
}
