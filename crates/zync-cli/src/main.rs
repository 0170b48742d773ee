//! `zync` CLI — team meeting overlap, suggestion and validation from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Manage the team file (roster cache)
//! zync team --team team.json add --id 1 --name Asha --timezone Asia/Kolkata --start 09:00 --end 18:00
//! zync team --team team.json list
//! zync team --team team.json remove --id 1
//!
//! # Overlap slots for one UTC date
//! zync overlap --team team.json --date 2024-06-03
//!
//! # Best meeting time over the next 5 days
//! zync suggest --team team.json --start 2024-06-03 --days 5
//!
//! # Check a proposed time (must carry an offset, e.g. Z or +05:30)
//! zync validate --team team.json --at 2024-06-03T09:00:00Z
//!
//! # 24-bucket chart data and full-team meeting starts
//! zync hourly --team team.json --date 2024-06-03
//! zync slots --team team.json --date 2024-06-03
//! ```
//!
//! Results are printed as JSON on stdout; logs go to stderr (`RUST_LOG`, `-v`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zync_engine::roster::{every_day, parse_time_of_day};
use zync_engine::{
    Coordinator, Employee, EmployeeId, EngineConfig, Roster, RosterCache, ScheduleProvider,
};

#[derive(Parser)]
#[command(
    name = "zync",
    version,
    about = "Find when a distributed team can meet"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Coverage slots for one UTC date
    Overlap {
        /// Team file
        #[arg(short, long)]
        team: PathBuf,
        /// UTC date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
    },
    /// Recommend the best meeting time over a window of days
    Suggest {
        /// Team file
        #[arg(short, long)]
        team: PathBuf,
        /// First UTC date to check (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,
        /// Number of days to check (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
        /// Stop after this many milliseconds and rank what finished
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Check whether every team member works at the given instant
    Validate {
        /// Team file
        #[arg(short, long)]
        team: PathBuf,
        /// Proposed meeting time, RFC 3339 with an explicit offset
        #[arg(long)]
        at: DateTime<Utc>,
    },
    /// Per-hour chart buckets for one UTC date
    Hourly {
        /// Team file
        #[arg(short, long)]
        team: PathBuf,
        /// UTC date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
    },
    /// Meeting start times at which the whole team is available
    Slots {
        /// Team file
        #[arg(short, long)]
        team: PathBuf,
        /// UTC date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
    },
    /// Manage the team file
    Team {
        /// Team file (created on first add)
        #[arg(short, long)]
        team: PathBuf,
        #[command(subcommand)]
        action: TeamAction,
    },
}

#[derive(Subcommand)]
enum TeamAction {
    /// List team members
    List,
    /// Add a member
    Add {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        /// IANA timezone (e.g., "Europe/Berlin")
        #[arg(long)]
        timezone: String,
        /// Local start of the working day (HH:MM)
        #[arg(long, value_parser = parse_time_of_day)]
        start: NaiveTime,
        /// Local end of the working day (HH:MM); at or before start means overnight
        #[arg(long, value_parser = parse_time_of_day)]
        end: NaiveTime,
        /// Comma-separated working weekdays (defaults to every day)
        #[arg(long, value_delimiter = ',')]
        days: Vec<Weekday>,
    },
    /// Remove a member
    Remove {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    debug!(?config, "engine config");

    match cli.command {
        Commands::Overlap { team, date } => {
            let (engine, roster) = load_team(&team, config)?;
            let overlap = engine.compute_overlap(&roster, date).await?;
            print_json(&overlap)?;
        }
        Commands::Suggest {
            team,
            start,
            days,
            timeout_ms,
        } => {
            let (engine, roster) = load_team(&team, config)?;
            let days = days.unwrap_or(engine.config().default_days_to_check);
            let suggestion = match timeout_ms {
                Some(ms) => {
                    engine
                        .suggest_best_time_within(&roster, start, days, Duration::from_millis(ms))
                        .await?
                }
                None => engine.suggest_best_time(&roster, start, days).await?,
            };
            print_json(&suggestion)?;
        }
        Commands::Validate { team, at } => {
            let (engine, roster) = load_team(&team, config)?;
            let result = engine.validate(&roster, at).await?;
            print_json(&result)?;
        }
        Commands::Hourly { team, date } => {
            let (engine, roster) = load_team(&team, config)?;
            let (overlap, buckets) = engine.hourly(&roster, date).await?;
            print_json(&json!({
                "date": overlap.date,
                "roster_size": overlap.roster_size,
                "working_hours": buckets.working_hours,
                "overlap": buckets.overlap,
                "warnings": overlap.warnings,
            }))?;
        }
        Commands::Slots { team, date } => {
            let (engine, roster) = load_team(&team, config)?;
            let (overlap, starts) = engine.candidate_starts(&roster, date).await?;
            print_json(&json!({
                "date": overlap.date,
                "step_minutes": engine.config().candidate_step_minutes,
                "starts": starts,
                "warnings": overlap.warnings,
            }))?;
        }
        Commands::Team { team, action } => run_team(&team, action)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Open the team file and build a coordinator over its members' schedules.
fn load_team(path: &Path, config: EngineConfig) -> Result<(Coordinator<ScheduleProvider>, Roster)> {
    if !path.exists() {
        anyhow::bail!("Team file not found: {}", path.display());
    }
    let mut cache = RosterCache::open(path)
        .with_context(|| format!("Failed to read team file: {}", path.display()))?;
    let roster = cache
        .roster()
        .with_context(|| format!("No team members in {}", path.display()))?
        .clone();
    let provider = ScheduleProvider::new(cache.members().iter().cloned())
        .context("Invalid working-hour rule in team file")?;
    let engine = Coordinator::with_config(provider, config).context("Invalid engine config")?;
    Ok((engine, roster))
}

fn run_team(path: &Path, action: TeamAction) -> Result<()> {
    let mut cache = RosterCache::open(path)
        .with_context(|| format!("Failed to read team file: {}", path.display()))?;

    match action {
        TeamAction::List => print_json(&cache.members())?,
        TeamAction::Add {
            id,
            name,
            timezone,
            start,
            end,
            days,
        } => {
            let working_days = if days.is_empty() {
                every_day()
            } else {
                days
            };
            let added = cache
                .add(Employee {
                    id: EmployeeId(id),
                    name,
                    timezone,
                    work_start: start,
                    work_end: end,
                    working_days,
                })
                .context("Failed to add team member")?;
            print_json(&json!({ "id": id, "added": added }))?;
        }
        TeamAction::Remove { id } => {
            let removed = cache
                .remove(EmployeeId(id))
                .context("Failed to remove team member")?;
            print_json(&json!({ "id": id, "removed": removed }))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
