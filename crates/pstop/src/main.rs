//! pstop - top-like latency monitor for performance_schema summary tables.
//!
//! Polls one resource kind at a fixed interval and prints the busiest
//! resources since the last baseline (or since server start with
//! `--absolute`). Counters come from a recorded JSON replay or a built-in
//! demo scenario.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

use pstop_core::baseline::Observation;
use pstop_core::collector::mock::{SCENARIO_DATADIR, SCENARIO_RELAY_LOG};
use pstop_core::collector::{CounterSource, MockSource, ReplaySource, SourceError};
use pstop_core::config::Config;
use pstop_core::models::{ALL_KINDS, ResourceKind};
use pstop_core::normalize::{self, NameCache};
use pstop_core::view::ResourceView;

/// Polls after which the restarting scenario starts its counters over.
const RESTART_EVERY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Busy server with steadily growing counters.
    Typical,
    /// Like typical, but the server restarts every few polls.
    Restarting,
}

/// Top-like latency monitor for performance_schema summary tables.
#[derive(Parser)]
#[command(name = "pstop", about = "Latency monitor for performance_schema", version)]
struct Args {
    /// Refresh interval in seconds.
    #[arg(default_value = "1")]
    interval: u64,

    /// Stop after this many refreshes.
    #[arg(short, long)]
    count: Option<u64>,

    /// Resource kind to display.
    #[arg(long, default_value = "table_io_latency", value_parser = parse_kind)]
    view: &'static ResourceKind,

    /// Show totals since server start instead of since the last baseline.
    #[arg(long)]
    absolute: bool,

    /// Maximum number of resource rows per refresh.
    #[arg(long, default_value = "20")]
    max_rows: usize,

    /// Server data directory (overrides the config file).
    #[arg(long, value_name = "PATH")]
    datadir: Option<String>,

    /// Relay log base name, absolute or relative to the data directory.
    #[arg(long, value_name = "PATH")]
    relay_log: Option<String>,

    /// TOML config file.
    #[arg(long, value_name = "PATH", env = "PSTOP_CONFIG")]
    config: Option<PathBuf>,

    /// Replay recorded snapshots from a JSON file instead of a demo scenario.
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Demo scenario used when no replay file is given.
    #[arg(long, value_enum, default_value = "typical")]
    scenario: Scenario,

    /// Reset the baseline every N refreshes.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    reset_every: Option<u64>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_kind(s: &str) -> Result<&'static ResourceKind, String> {
    ResourceKind::by_name(s).ok_or_else(|| {
        let names: Vec<&str> = ALL_KINDS.iter().map(|k| k.name).collect();
        format!("unknown view '{}', expected one of: {}", s, names.join(", "))
    })
}

/// Initializes the tracing subscriber. Logs go to stderr; stdout is the display.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pstop={level},pstop_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads the config file, if any, and applies command-line overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if args.datadir.is_some() {
        config.datadir = args.datadir.clone();
    }
    if args.relay_log.is_some() {
        config.relay_log = args.relay_log.clone();
    }
    // Demo scenarios record paths under a fixed data directory.
    if args.replay.is_none() {
        config.datadir.get_or_insert_with(|| SCENARIO_DATADIR.to_string());
        config.relay_log.get_or_insert_with(|| SCENARIO_RELAY_LOG.to_string());
    }
    Ok(config)
}

fn open_source(args: &Args) -> anyhow::Result<Box<dyn CounterSource>> {
    Ok(match &args.replay {
        Some(path) => Box::new(
            ReplaySource::from_path(path)
                .with_context(|| format!("loading replay {}", path.display()))?,
        ),
        None => match args.scenario {
            Scenario::Typical => Box::new(MockSource::typical_server()),
            Scenario::Restarting => Box::new(MockSource::restarting_server(RESTART_EVERY)),
        },
    })
}

fn print_view(view: &ResourceView, max_rows: usize) {
    let at = |t: chrono::DateTime<chrono::Utc>| t.with_timezone(&Local).format("%H:%M:%S").to_string();
    let collected = view.last_collected().map(at).unwrap_or_default();
    let mode = match view.baseline_at() {
        Some(since) if view.is_relative() => format!("relative since {}", at(since)),
        _ => "absolute".to_string(),
    };
    println!("{} {} ({})", view.description(), collected, mode);
    println!("{}", view.headings());

    let rows = view.row_content(max_rows);
    for row in &rows {
        println!("{}", row);
    }
    for _ in rows.len()..max_rows {
        println!("{}", view.empty_row_content());
    }
    println!("{}", view.total_row_content());
    println!();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let config = load_config(&args)?;
    let env = config.environment();
    let munge = config.munge_rules()?;
    info!(
        "pstop {}: view={}, interval={}s, datadir={:?}, relay_log={:?}, {} munge rules",
        env!("CARGO_PKG_VERSION"),
        args.view.name,
        args.interval,
        env.datadir(),
        env.relay_log_path(),
        munge.len()
    );

    let mut source = open_source(&args)?;
    let cache = Arc::new(NameCache::new());
    let normalizer = normalize::for_kind(args.view, &env, cache.clone(), munge);
    let mut view = ResourceView::new(args.view, normalizer);
    view.set_relative(!args.absolute);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let interval = Duration::from_secs(args.interval);
    let mut cycle: u64 = 0;

    while running.load(Ordering::SeqCst) && args.count.is_none_or(|n| cycle < n) {
        if cycle > 0 {
            // Sleep with periodic checks for shutdown signal
            let sleep_interval = Duration::from_millis(100);
            let mut remaining = interval;
            while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
                let sleep_time = remaining.min(sleep_interval);
                std::thread::sleep(sleep_time);
                remaining = remaining.saturating_sub(sleep_time);
            }
            if !running.load(Ordering::SeqCst) {
                break;
            }
            if let Some(n) = args.reset_every
                && cycle.is_multiple_of(n)
            {
                view.reset_baseline();
            }
        }
        cycle += 1;

        match view.collect(&mut source) {
            Ok(observation) => {
                if observation == Observation::Rebaselined {
                    warn!("{}: counters restarted, relative totals start over", args.view.name);
                }
                debug!("refresh #{}: {} rows, {} cached names", cycle, view.len(), cache.len());
                print_view(&view, args.max_rows);
            }
            Err(SourceError::Exhausted { .. }) => {
                info!("replay finished after {} refreshes", cycle - 1);
                break;
            }
            Err(e) => {
                warn!("{}: refresh aborted: {}", args.view.name, e);
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
