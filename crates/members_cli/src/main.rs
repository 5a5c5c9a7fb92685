//! Command-line access to a members database.
//!
//! # Responsibility
//! - Expose the member store operations for local inspection and edits.
//! - Print members as JSON and counts as bare numbers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use members_core::{
    default_log_level, init_logging, open_db, Member, MemberStore, SqliteMemberStore,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "members-cli", version, about = "Inspect and edit a members database")]
struct Cli {
    /// SQLite database file; created and migrated when missing.
    #[arg(long)]
    db: PathBuf,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Total number of members.
    Count,
    /// List members ordered by username.
    List {
        #[command(flatten)]
        page: Page,
    },
    /// List members whose username contains KEYWORD.
    Search {
        keyword: String,
        #[command(flatten)]
        page: Page,
    },
    /// Number of members whose username contains KEYWORD.
    SearchCount { keyword: String },
    Show { username: String },
    /// Insert a member read from a JSON file.
    Add { file: PathBuf },
    /// Replace a member read from a JSON file, matched by username.
    Update { file: PathBuf },
    Remove { username: String },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::List { .. } => "list",
            Self::Search { .. } => "search",
            Self::SearchCount { .. } => "search_count",
            Self::Show { .. } => "show",
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Remove { .. } => "remove",
        }
    }
}

#[derive(Debug, Args)]
struct Page {
    #[arg(long, default_value_t = 0)]
    offset: u32,
    #[arg(long)]
    limit: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let store = SqliteMemberStore::try_new(&conn)?;

    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );
    run(&store, cli.command, &mut std::io::stdout().lock())
}

fn run(store: &impl MemberStore, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Count => writeln!(out, "{}", store.count()?)?,
        Command::List { page } => {
            print_members(out, &store.find_all(page.offset, page.limit)?)?
        }
        Command::Search { keyword, page } => {
            print_members(out, &store.search(&keyword, page.offset, page.limit)?)?
        }
        Command::SearchCount { keyword } => {
            writeln!(out, "{}", store.get_search_count(&keyword)?)?
        }
        Command::Show { username } => match store.find_by_username(&username)? {
            Some(member) => writeln!(out, "{}", serde_json::to_string_pretty(&member)?)?,
            None => anyhow::bail!("member `{username}` not found"),
        },
        Command::Add { file } => writeln!(out, "{}", store.add(&read_member(&file)?)?)?,
        Command::Update { file } => writeln!(out, "{}", store.update(&read_member(&file)?)?)?,
        // Rows that no longer hydrate must still be removable.
        Command::Remove { username } => {
            writeln!(out, "{}", store.remove_by_username(&username)?)?
        }
    }
    Ok(())
}

fn read_member(path: &Path) -> Result<Member> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid member JSON in `{}`", path.display()))
}

fn print_members(out: &mut impl Write, members: &[Member]) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(members)?)?;
    Ok(())
}
