use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use railops_sim_core::{Command, Orchestrator, SimulationConfig, TickResult};
use std::fs;
use std::path::PathBuf;

/// Scenario used when no `--scenario` file is given
const DEMO_SCENARIO: &str = include_str!("../scenarios/mumbai_suburban.json");

#[derive(Parser)]
#[command(name = "railops-sim")]
#[command(about = "Headless run of the rail operations dashboard simulation")]
struct Cli {
    /// Scenario JSON file (defaults to the built-in suburban demo)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value = "30")]
    ticks: u32,

    /// Real milliseconds per tick (defaults to the scenario tick interval)
    #[arg(long)]
    delta_ms: Option<u64>,

    /// Override the scenario RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Playback rate multiplier: 0.5, 1, 2 or 4
    #[arg(long)]
    rate: Option<f64>,

    /// Start with playback paused
    #[arg(long)]
    paused: bool,

    /// Apply an advisory before a tick, as TICK:ID (repeatable)
    #[arg(long = "apply", value_parser = parse_apply)]
    applies: Vec<(u32, String)>,

    /// Print the final dashboard snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Timeline window width in minutes, centred on current time
    #[arg(long)]
    window_minutes: Option<i64>,
}

fn parse_apply(raw: &str) -> Result<(u32, String), String> {
    let (tick, id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected TICK:ID, got '{}'", raw))?;
    let tick = tick
        .parse::<u32>()
        .map_err(|e| format!("bad tick '{}': {}", tick, e))?;
    if id.is_empty() {
        return Err("advisory id must not be empty".to_string());
    }
    Ok((tick, id.to_string()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_scenario(cli.scenario.as_ref())?;
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }
    if cli.paused {
        config.start_running = false;
    }
    let delta_ms = cli.delta_ms.unwrap_or(config.tick_interval_ms);
    if delta_ms == 0 {
        bail!("--delta-ms must be positive");
    }
    let span_ms = match cli.window_minutes {
        Some(minutes) => minutes
            .checked_mul(60_000)
            .with_context(|| format!("--window-minutes {} is too large", minutes))?,
        None => config.timeline.window_span_ms,
    };

    let mut orchestrator = Orchestrator::new(config).context("Scenario rejected")?;
    if let Some(multiplier) = cli.rate {
        orchestrator
            .execute(Command::SetRate { multiplier })
            .context("Invalid --rate")?;
    }

    println!("Running rail operations simulation...");
    println!(
        "Ticks: {}, Delta: {}ms, Start: {}",
        cli.ticks,
        delta_ms,
        orchestrator.now()
    );
    println!();

    for tick in 0..cli.ticks {
        for (_, id) in cli.applies.iter().filter(|(at, _)| *at == tick) {
            orchestrator.submit(Command::ApplyAdvisory { id: id.clone() });
        }
        let result = orchestrator.step(delta_ms);
        print_tick(&result);
    }

    let snapshot = orchestrator.snapshot();
    if cli.json {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    println!();
    println!("=== Final State ===");
    for kpi in &snapshot.kpis {
        println!(
            "  {:<24} {:>8.1}{:<2} ({:+.1}, {:?})",
            kpi.label, kpi.value, kpi.unit, kpi.change, kpi.trend
        );
    }
    for train in &snapshot.trains {
        println!(
            "  {:<6} {:<12} {:>6.1}%",
            train.id(),
            train.label(),
            train.route_position() * 100.0
        );
    }
    for advisory in &snapshot.advisories {
        let state = if advisory.is_pending() { "pending" } else { "applied" };
        println!("  {:<6} {:<8} {}", advisory.id(), state, advisory.title());
    }
    for note in &snapshot.notifications {
        println!("  [{}] {}", note.applied_at, note.message());
    }

    println!();
    print_timeline(&orchestrator, span_ms)?;
    info!("Config hash {}", snapshot.config_hash);
    Ok(())
}

fn load_scenario(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    let json = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?,
        None => DEMO_SCENARIO.to_string(),
    };
    Ok(SimulationConfig::from_json(&json)?)
}

fn print_tick(result: &TickResult) {
    let mut line = format!(
        "--- tick {:>4} {} (+{}ms)",
        result.tick, result.sim_time, result.advanced_ms
    );
    if result.num_kpi_changes > 0 {
        line.push_str(&format!(" kpi:{}", result.num_kpi_changes));
    }
    if !result.wrapped.is_empty() {
        line.push_str(&format!(" wrapped:{}", result.wrapped.join(",")));
    }
    if !result.evicted.is_empty() {
        line.push_str(&format!(" removed:{}", result.evicted.join(",")));
    }
    println!("{}", line);

    for outcome in &result.commands {
        match outcome {
            Ok(outcome) => println!("    ok: {:?}", outcome),
            Err(e) => println!("    rejected: {}", e),
        }
    }
}

fn print_timeline(orchestrator: &Orchestrator, span_ms: i64) -> Result<()> {
    const WIDTH: usize = 40;

    let events = orchestrator.project_timeline(span_ms)?;
    println!("Timeline ({} min around {})", span_ms / 60_000, orchestrator.now());
    for event in &events {
        let mut bar = vec!['.'; WIDTH + 1];
        let planned = (event.planned_position * WIDTH as f64).round() as usize;
        let actual = (event.actual_position * WIDTH as f64).round() as usize;
        bar[planned] = '|';
        bar[actual] = '#';
        println!(
            "  {:<8} {:<4} {} {:>+4}m {:?}",
            event.id,
            event.station,
            bar.into_iter().collect::<String>(),
            event.delay_minutes,
            event.status
        );
    }
    for group in orchestrator.conflict_groups() {
        println!("  conflict at {}: {}", group.station, group.event_ids.join(", "));
    }
    Ok(())
}
