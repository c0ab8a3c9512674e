//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - dispatches to the update pipeline, preview, or next-run report

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Command, PreviewArgs, ScheduleArgs, UpdateArgs};
use crate::domain::{SeriesDescriptor, UpdateConfig};
use crate::error::{AppError, ErrorKind};
use crate::schedule::Schedule;

pub mod pipeline;

const ENV_LOG_FORMAT: &str = "ECONCAL_LOG_FORMAT";

/// Entry point for the `econcal` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // The scheduler invokes the binary bare, so `econcal` means `econcal update`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = parse_cli(argv)?;

    match cli.command {
        Command::Update(args) => handle_update(args),
        Command::Preview(args) => handle_preview(args),
        Command::NextRun(args) => handle_next_run(args),
    }
}

/// Help/version print and exit as usual; any other parse failure is a
/// `Config` error so the run ends with the common failure status.
fn parse_cli(argv: Vec<String>) -> Result<Cli, AppError> {
    Cli::try_parse_from(argv).map_err(|e| match e.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => e.exit(),
        _ => AppError::new(ErrorKind::Config, e.render().to_string()),
    })
}

/// Text logs by default; `ECONCAL_LOG_FORMAT=json` for structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // try_init: a subscriber may already be installed (tests, embedding).
    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        let _ = registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init();
    } else {
        let _ = registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init();
    }
}

fn handle_update(args: UpdateArgs) -> Result<(), AppError> {
    let config = update_config_from_args(&args)?;
    let summary = pipeline::run_update(&config)?;

    if let Some(next) = summary.metadata.next_update {
        tracing::info!(next_update = %next.to_rfc3339(), "next scheduled run");
    }
    Ok(())
}

fn handle_preview(args: PreviewArgs) -> Result<(), AppError> {
    let feed = pipeline::fetch_normalized(&args.feed.feed_url)?;
    print!(
        "{}",
        crate::report::format_feed_summary(&feed, &args.feed.feed_url, args.show_dropped)
    );
    Ok(())
}

fn handle_next_run(args: ScheduleArgs) -> Result<(), AppError> {
    let schedule = schedule_from_args(&args)?;
    print!("{}", crate::report::format_next_run(&schedule, Utc::now()));
    Ok(())
}

pub fn update_config_from_args(args: &UpdateArgs) -> Result<UpdateConfig, AppError> {
    Ok(UpdateConfig {
        feed_url: args.feed.feed_url.clone(),
        shape: args.shape,
        series_path: args.output.clone(),
        metadata_path: args.metadata.clone(),
        descriptor_path: (!args.no_descriptor).then(|| args.descriptor.clone()),
        descriptor: SeriesDescriptor {
            symbol: args.symbol.clone(),
            ..SeriesDescriptor::default()
        },
        schedule: schedule_from_args(&args.schedule)?,
    })
}

fn schedule_from_args(args: &ScheduleArgs) -> Result<Schedule, AppError> {
    Schedule::new(args.days.clone(), args.at)
}

/// Rewrite argv so `econcal` defaults to `econcal update`.
///
/// Rules:
/// - `econcal`                      -> `econcal update`
/// - `econcal --shape events ...`   -> `econcal update --shape events ...`
/// - `econcal --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("update".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "update" | "preview" | "next-run");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "update".to_string());
        return argv;
    }

    argv
}
