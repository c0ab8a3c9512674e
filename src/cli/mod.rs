//! Command-line parsing for the economic-calendar feed updater.
//!
//! Every flag has an environment fallback so a scheduler can configure runs
//! without arguments (a local `.env` is loaded first).

use std::path::PathBuf;

use chrono::{NaiveTime, Weekday};
use clap::{Parser, Subcommand};

use crate::data::DEFAULT_FEED_URL;
use crate::domain::OutputShape;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "econcal", version, about = "Economic calendar feed -> chart series updater")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the feed, normalize it, and rewrite the series + metadata files (default).
    Update(UpdateArgs),
    /// Fetch and normalize the feed, print a summary, write nothing.
    Preview(PreviewArgs),
    /// Print the update schedule and the next scheduled run.
    NextRun(ScheduleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct FeedArgs {
    /// Calendar feed URL (CSV).
    #[arg(long, env = "ECONCAL_FEED_URL", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,
}

#[derive(Debug, Parser, Clone)]
pub struct ScheduleArgs {
    /// Scheduled weekdays, comma separated (e.g. `mon,thu`).
    #[arg(
        long = "schedule-days",
        env = "ECONCAL_SCHEDULE_DAYS",
        value_delimiter = ',',
        value_parser = parse_weekday,
        default_value = "mon,thu"
    )]
    pub days: Vec<Weekday>,

    /// Scheduled time of day, UTC (`HH:MM`).
    #[arg(
        long = "schedule-time",
        env = "ECONCAL_SCHEDULE_TIME",
        value_parser = parse_clock,
        default_value = "06:00"
    )]
    pub at: NaiveTime,
}

/// Options for a full update run.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Series layout: one bar per day, or one row per event.
    #[arg(long, env = "ECONCAL_SHAPE", value_enum, default_value_t = OutputShape::Daily)]
    pub shape: OutputShape,

    /// Series CSV path.
    #[arg(long, env = "ECONCAL_OUTPUT", default_value = "data/ECONOMIC_CALENDAR.csv")]
    pub output: PathBuf,

    /// Metadata JSON path.
    #[arg(long, env = "ECONCAL_METADATA", default_value = "data/metadata.json")]
    pub metadata: PathBuf,

    /// Series descriptor JSON path.
    #[arg(long, env = "ECONCAL_DESCRIPTOR", default_value = "symbol_info/ECONOMIC_CALENDAR.json")]
    pub descriptor: PathBuf,

    /// Skip writing the series descriptor.
    #[arg(long)]
    pub no_descriptor: bool,

    /// Series identifier written to the descriptor.
    #[arg(long, env = "ECONCAL_SYMBOL", default_value = "ECONOMIC_CALENDAR")]
    pub symbol: String,
}

/// Options for `preview`.
#[derive(Debug, Parser, Clone)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Also list every dropped row with its reason.
    #[arg(long)]
    pub show_dropped: bool,
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("invalid weekday '{s}' (expected mon..sun)"))
}

fn parse_clock(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|e| format!("invalid time '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_without_arguments() {
        let cli = Cli::try_parse_from(["econcal", "update"]).unwrap();
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.shape, OutputShape::Daily);
        assert_eq!(args.schedule.days, vec![Weekday::Mon, Weekday::Thu]);
        assert_eq!(args.schedule.at, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert!(!args.no_descriptor);
    }

    #[test]
    fn schedule_flags_parse() {
        let cli = Cli::try_parse_from([
            "econcal",
            "next-run",
            "--schedule-days",
            "tue,friday",
            "--schedule-time",
            "21:30",
        ])
        .unwrap();
        let Command::NextRun(args) = cli.command else {
            panic!("expected next-run");
        };
        assert_eq!(args.days, vec![Weekday::Tue, Weekday::Fri]);
        assert_eq!(args.at, NaiveTime::from_hms_opt(21, 30, 0).unwrap());
    }

    #[test]
    fn bad_weekday_rejected() {
        assert!(Cli::try_parse_from(["econcal", "next-run", "--schedule-days", "someday"]).is_err());
    }
}
