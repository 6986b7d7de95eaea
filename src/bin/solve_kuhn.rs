//! Kuhn Poker solver binary.
//!
//! Usage:
//!   cargo run --release --bin solve_kuhn -- [OPTIONS]
//!
//! Runs the solver, prints the convergence trace and the final table of
//! information sets, and optionally writes both to a JSON file.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use kuhn_cfr::cfr::{CfrSolver, GainPoint, Snapshot, SolverConfig};
use kuhn_cfr::games::kuhn::{KuhnCard, KuhnPoker};

#[derive(Parser)]
#[command(name = "solve_kuhn")]
#[command(about = "Approximate a Kuhn poker equilibrium with belief-based regret minimization")]
struct Cli {
    /// JSON config file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of iterations (overrides config)
    #[arg(short, long)]
    iterations: Option<u64>,
    /// Number of convergence samples to record (overrides config)
    #[arg(long)]
    reports: Option<u64>,
    /// Start from the hand-worked reference profile instead of uniform
    #[arg(long)]
    reference_profile: bool,
    /// Write the final snapshot and convergence trace to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    stats: &'a kuhn_cfr::SolverStats,
    snapshot: &'a Snapshot<KuhnCard>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SolverConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if let Some(reports) = cli.reports {
        config.num_reports = reports;
    }
    config.validate()?;

    println!("=== Kuhn Poker Solver ===\n");
    println!(
        "Iterations: {} | Reports: {} (every {} iterations)",
        config.iterations,
        config.num_reports,
        config.report_interval()
    );
    println!();

    let iterations = config.iterations;
    let interval = config.report_interval();
    let mut solver = CfrSolver::new(KuhnPoker::new(), config);
    solver.initialize();

    if cli.reference_profile {
        for (key, strategy) in KuhnPoker::reference_profile() {
            solver.set_strategy(&key, &strategy)?;
        }
        log::info!("seeded reference profile");
    }

    let start = Instant::now();
    let pb = ProgressBar::new(iterations);
    pb.set_style(
        ProgressStyle::with_template(
            "  solving [{bar:40}] {pos}/{len} iterations [{elapsed} < {eta}, {per_sec}] {msg}",
        )?,
    );

    let mut trace = Vec::new();
    let stats = solver.train_with_callback(iterations, 1, |iteration, total_gain| {
        if (iteration - 1) % interval == 0 {
            trace.push(GainPoint { iteration, total_gain });
            pb.set_message(format!("gain {:.3}", total_gain));
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let mut stats = stats.clone();
    stats.gain_history = trace;
    println!(
        "Solved {} iterations in {:.2}s ({:.0} it/s)\n",
        stats.iterations,
        start.elapsed().as_secs_f64(),
        stats.iterations_per_second
    );

    for point in &stats.gain_history {
        println!("TOT_GAIN {:>8} {:.3}", point.iteration, point.total_gain);
    }
    println!();

    let snapshot = solver.snapshot()?;
    print_table(&snapshot);

    if let Some(path) = &cli.output {
        let report = Report {
            stats: &stats,
            snapshot: &snapshot,
        };
        let json = serde_json::to_string_pretty(&report)?;
        let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        file.write_all(json.as_bytes())?;
        println!("\nWrote {}", path.display());
    }

    Ok(())
}

/// Print every information set as one aligned row.
fn print_table(snapshot: &Snapshot<KuhnCard>) {
    println!(
        "{:<8} {:>8} {:>8} | {:>10} {:>10} | {:>8} {:>8} {:>12} {:>10} | {:>10} {:>10}",
        "InfoSet",
        "Strat:b",
        "Strat:p",
        "Belief:Hi",
        "Belief:Lo",
        "Util:b",
        "Util:p",
        "ExpectedUtil",
        "Likelihood",
        "TotGain:b",
        "TotGain:p"
    );
    println!("{}", "-".repeat(124));

    for entry in &snapshot.info_sets {
        let data = &entry.data;
        // Opponent cards in deck order: higher first
        let beliefs: Vec<String> = data
            .belief
            .iter()
            .map(|(card, p)| format!("{}:{:.2}", card, p))
            .collect();
        println!(
            "{:<8} {:>8.2} {:>8.2} | {:>10} {:>10} | {:>8.2} {:>8.2} {:>12.2} {:>10.2} | {:>10.2} {:>10.2}",
            entry.key,
            data.strategy[0],
            data.strategy[1],
            beliefs.first().map(String::as_str).unwrap_or("-"),
            beliefs.get(1).map(String::as_str).unwrap_or("-"),
            data.utility[0],
            data.utility[1],
            data.expected_utility,
            data.likelihood,
            data.cumulative_gain[0],
            data.cumulative_gain[1],
        );
    }
}
