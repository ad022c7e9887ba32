//! `meetings` CLI: find free slots, check conflicts, and suggest meeting times
//! from the command line.
//!
//! Calendars are read from a JSON file mapping calendar ids to event arrays.
//! Results are printed as JSON on stdout; logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! # Free 30-minute slots on Monday across two calendars
//! meetings free -e calendars.json -c primary -c work \
//!   --start 2026-03-02T09:00 --end 2026-03-02T17:00 --duration 30
//!
//! # Which existing events collide with a proposal?
//! meetings conflicts -e calendars.json --start 2026-03-02T14:00 --end 2026-03-02T15:00
//!
//! # Conflicts plus alternative times for the same proposal
//! meetings suggest -e calendars.json --start 2026-03-02T14:00 --end 2026-03-02T15:00
//!
//! # Hours that suit everyone
//! meetings optimal --tz America/New_York --tz Europe/London --date 2026-03-02
//!
//! # Compose a recurrence rule
//! meetings rrule --freq weekly --count 4 --start 2026-03-02T09:00
//! ```

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use meeting_engine::{
    CalendarEvent, Frequency, MemorySource, RecurrenceEnd, Scheduler, SchedulerConfig, Timestamp,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "meetings",
    version,
    about = "Free-slot search, conflict checks and meeting-time suggestions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML), applied over the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct CalendarArgs {
    /// JSON file mapping calendar ids to event arrays
    #[arg(short, long)]
    events: PathBuf,
    /// Calendar to query (repeatable; defaults to the configured calendar)
    #[arg(short = 'c', long = "calendar")]
    calendars: Vec<String>,
}

#[derive(Args)]
struct ProposalArgs {
    /// Proposed start (RFC 3339, or naive local time in the configured zone)
    #[arg(long)]
    start: String,
    /// Proposed end
    #[arg(long)]
    end: String,
    /// Proposed title
    #[arg(long, default_value = "Meeting")]
    title: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Find free slots of a given duration
    Free {
        #[command(flatten)]
        calendars: CalendarArgs,
        /// Window start
        #[arg(long)]
        start: String,
        /// Window end
        #[arg(long)]
        end: String,
        /// Slot duration in minutes
        #[arg(short, long)]
        duration: i64,
    },
    /// List existing events that overlap a proposed event
    Conflicts {
        #[command(flatten)]
        calendars: CalendarArgs,
        #[command(flatten)]
        proposal: ProposalArgs,
    },
    /// Check a proposed event and suggest alternatives if it conflicts
    Suggest {
        #[command(flatten)]
        calendars: CalendarArgs,
        #[command(flatten)]
        proposal: ProposalArgs,
        /// Number of alternatives (defaults to the configured count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Rank hours of a day that fall in working hours for every timezone
    Optimal {
        /// Participant IANA timezone (repeatable)
        #[arg(long = "tz", required = true)]
        timezones: Vec<String>,
        /// Reference day, YYYY-MM-DD (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Compose and validate an RRULE for a recurring event
    Rrule {
        #[arg(long, value_enum)]
        freq: FreqArg,
        /// First occurrence
        #[arg(long)]
        start: String,
        /// Number of occurrences
        #[arg(long, conflicts_with = "until")]
        count: Option<u32>,
        /// Last possible occurrence
        #[arg(long)]
        until: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FreqArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<FreqArg> for Frequency {
    fn from(arg: FreqArg) -> Self {
        match arg {
            FreqArg::Daily => Frequency::Daily,
            FreqArg::Weekly => Frequency::Weekly,
            FreqArg::Monthly => Frequency::Monthly,
            FreqArg::Yearly => Frequency::Yearly,
        }
    }
}

#[derive(Serialize)]
struct SuggestOutput {
    conflicts: Vec<meeting_engine::ConflictReport>,
    alternatives: Vec<CalendarEvent>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Free {
            calendars,
            start,
            end,
            duration,
        } => {
            let scheduler = open_scheduler(&calendars, &config)?;
            let ids = calendar_refs(&calendars);
            let slots = scheduler
                .find_free_slots(parse_time(&start)?, parse_time(&end)?, duration, &ids)
                .context("Failed to find free slots")?;
            print_json(&slots)?;
        }
        Commands::Conflicts {
            calendars,
            proposal,
        } => {
            let scheduler = open_scheduler(&calendars, &config)?;
            let event = build_proposal(&scheduler, &proposal, &calendars)?;
            let conflicts = scheduler
                .detect_conflicts(&event, &calendar_refs(&calendars))
                .context("Failed to check conflicts")?;
            print_json(&conflicts)?;
        }
        Commands::Suggest {
            calendars,
            proposal,
            count,
        } => {
            let scheduler = open_scheduler(&calendars, &config)?;
            let event = build_proposal(&scheduler, &proposal, &calendars)?;
            let ids = calendar_refs(&calendars);
            let conflicts = scheduler
                .detect_conflicts(&event, &ids)
                .context("Failed to check conflicts")?;
            let alternatives = if conflicts.is_empty() {
                Vec::new()
            } else {
                let wanted = count.unwrap_or(config.default_suggestions);
                scheduler
                    .suggest_alternatives_across(&event, &ids, wanted)
                    .context("Failed to suggest alternatives")?
            };
            print_json(&SuggestOutput {
                conflicts,
                alternatives,
            })?;
        }
        Commands::Optimal { timezones, date } => {
            let day = date.unwrap_or_else(|| Utc::now().date_naive());
            let reference = day.and_time(NaiveTime::MIN).and_utc();
            let hours = &config.working_hours;
            let times = meeting_engine::find_optimal_times(
                &timezones,
                (hours.start_hour, hours.end_hour),
                reference,
            )
            .context("Failed to rank meeting hours")?;
            print_json(&times)?;
        }
        Commands::Rrule {
            freq,
            start,
            count,
            until,
        } => {
            let dtstart = resolve(&config, &start)?;
            let end = match (count, until) {
                (Some(n), _) => RecurrenceEnd::Count(n),
                (None, Some(until)) => RecurrenceEnd::Until(resolve(&config, &until)?),
                (None, None) => RecurrenceEnd::Never,
            };
            let rule = meeting_engine::build_rrule(freq.into(), end)?;
            meeting_engine::validate_rrule(&rule, dtstart)?;
            println!("{}", rule);
        }
    }

    Ok(())
}

/// Load the events file into an in-memory source and wrap it in a scheduler.
fn open_scheduler(
    args: &CalendarArgs,
    config: &SchedulerConfig,
) -> Result<Scheduler<MemorySource>> {
    let json = std::fs::read_to_string(&args.events)
        .with_context(|| format!("Failed to read events file: {}", args.events.display()))?;
    let source = MemorySource::from_json(&json, config.timezone)
        .with_context(|| format!("Invalid events file: {}", args.events.display()))?
        .with_dst_policy(config.dst_policy);
    tracing::debug!(calendars = source.calendar_ids().count(), "loaded events file");
    Ok(Scheduler::new(source, config.clone()))
}

fn calendar_refs(args: &CalendarArgs) -> Vec<&str> {
    args.calendars.iter().map(String::as_str).collect()
}

fn parse_time(raw: &str) -> Result<Timestamp> {
    Timestamp::parse(raw).with_context(|| format!("Invalid time: {}", raw))
}

fn resolve(config: &SchedulerConfig, raw: &str) -> Result<DateTime<Utc>> {
    let instant = parse_time(raw)?.normalize(config.timezone, config.dst_policy)?;
    Ok(instant)
}

/// The proposal lives on the first `--calendar`, or the configured default.
fn build_proposal(
    scheduler: &Scheduler<MemorySource>,
    proposal: &ProposalArgs,
    calendars: &CalendarArgs,
) -> Result<CalendarEvent> {
    let config = scheduler.config();
    let calendar_id = calendars
        .calendars
        .first()
        .cloned()
        .unwrap_or_else(|| config.default_calendar.clone());
    let start = scheduler.normalize(parse_time(&proposal.start)?)?;
    let end = scheduler.normalize(parse_time(&proposal.end)?)?;
    CalendarEvent::new(&proposal.title, start, end, calendar_id, config.timezone)
        .context("Invalid proposed event")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
