//! Conjunction Monitor
//!
//! Drives the conjunction simulation on a fixed wall-clock interval and logs
//! the risk picture after every tick.
//!
//! Usage:
//!   conjunction-monitor --interval-ms 2000 --speed 100 --ticks 30
//!   conjunction-monitor --catalog catalog.json --ticks 10 --json > snapshot.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use collision_avoidance::RiskLevel;
use conjunction_sim::{CatalogDefinition, Simulation, SimulationConfig, SimulationHandle};
use tokio::time;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "conjunction-monitor",
    about = "Propagate a catalog of tracked objects and screen monitored pairs for conjunctions"
)]
struct Args {
    /// JSON catalog: {"objects": [...], "monitored_pairs": [["a", "b"], ...]}.
    /// Defaults to the built-in demonstration catalog.
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Wall-clock interval between ticks (ms)
    #[arg(short, long, default_value_t = conjunction_sim::config::DEFAULT_TICK_INTERVAL_MS)]
    interval_ms: u64,

    /// Simulated-time multiplier, clamped to [1, 1000]
    #[arg(short, long, default_value_t = conjunction_sim::config::DEFAULT_SPEED as i64)]
    speed: i64,

    /// Stop after this many ticks (0 = run until Ctrl-C)
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Print the final snapshot as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_catalog(path: Option<&PathBuf>) -> Result<CatalogDefinition> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            let definition = CatalogDefinition::from_json(&json)
                .with_context(|| format!("parsing catalog {}", path.display()))?;
            info!("Loaded {} objects from {}", definition.objects.len(), path.display());
            Ok(definition)
        }
        None => Ok(CatalogDefinition::seed()),
    }
}

fn log_tick(handle: &SimulationHandle, elapsed: f64) {
    let stats = handle.statistics();
    info!(
        "{} (+{:.2} min) | status={:?} critical={} warning={} low={} safe={} avg={}",
        handle.simulated_time().format("%Y-%m-%dT%H:%M:%SZ"),
        elapsed,
        stats.system_status,
        stats.critical_count,
        stats.warning_count,
        stats.low_count,
        stats.safe_count,
        stats.average_risk_score
    );

    for event in handle.events() {
        let line = format!(
            "  {} {:>8} score={:>3} miss={:.3} km rel_v={:.2} km/s",
            event.id,
            event.risk_level().as_str(),
            event.risk_score(),
            event.assessment.miss_distance_km,
            event.assessment.relative_velocity_km_s
        );
        match event.risk_level() {
            RiskLevel::Critical | RiskLevel::Warning => warn!("{}", line),
            _ => debug!("{}", line),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "conjunction_monitor=debug,conjunction_sim=debug,collision_avoidance=debug"
    } else {
        "conjunction_monitor=info,conjunction_sim=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SimulationConfig::default()
        .with_tick_interval_ms(args.interval_ms)
        .with_initial_speed(args.speed);
    let definition = load_catalog(args.catalog.as_ref())?;

    let handle = SimulationHandle::new(Simulation::new(config.clone(), definition, Utc::now())?);
    info!(
        "Conjunction monitor starting: {} bodies, {} pairs, tick {} ms, {}x",
        handle.bodies().len(),
        handle.events().len(),
        config.tick_interval_ms,
        handle.speed()
    );

    let mut interval = time::interval(config.tick_interval());
    let mut completed = 0u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted after {} ticks", completed);
                break;
            }
        }

        match handle.tick(Utc::now()) {
            Ok(Some(elapsed)) => log_tick(&handle, elapsed),
            Ok(None) => debug!("Paused, tick skipped"),
            Err(e) => {
                error!("Simulation halted: {}", e);
                return Err(e.into());
            }
        }

        completed += 1;
        if args.ticks > 0 && completed >= args.ticks {
            info!("Completed {} ticks", completed);
            break;
        }
    }

    let snapshot = handle.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else if let Some(highest) = &snapshot.statistics.highest_risk {
        info!(
            "Highest risk: {} ({}, score {}) - {}",
            highest.id,
            highest.risk_level(),
            highest.risk_score(),
            highest.assessment.explanation.recommendation
        );
    }

    Ok(())
}
