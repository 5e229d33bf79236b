// Pulse Benchmark Runner v0.1.0: recovery and criticality characterization
// Monte Carlo (default N=30), seeded shock storms, per-tick audit trail
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5         # Quick mode (5 runs each)
//   cargo run --release --bin bench -- STORM            # Filter by name
//   cargo run --release --bin bench -- --time-series    # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42        # Custom base seed

mod report;
mod scenarios;
mod monte_carlo;
mod time_series;

use clap::Parser;
use report::*;
use scenarios::*;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Scenarios pass when at least this share of runs meet their expected outcome.
const PASS_THRESHOLD: f64 = 0.933;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bench")]
#[command(about = "Monte Carlo characterization of latency shock propagation", long_about = None)]
struct Args {
    /// Runs per scenario
    #[arg(long, default_value = "30")]
    runs: usize,

    /// Base seed; run i uses seed + i
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Write per-tick JSONL files to benchmark-results/time-series
    #[arg(long)]
    time_series: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only run scenarios whose name, label or category contains this
    filter: Option<String>,
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose when set.
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match &args.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&f_lower)
                        || s.label.to_lowercase().contains(&f_lower)
                        || s.category.to_lowercase().contains(&f_lower)
                })
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", args.filter);
        std::process::exit(1);
    }

    let ts_dir = args
        .time_series
        .then(|| std::path::Path::new("benchmark-results/time-series").to_path_buf());

    info!(
        runs = args.runs,
        seed = args.seed,
        scenarios = to_run.len(),
        "Pulse Benchmark Runner v0.1.0 (PRNG: ChaCha8Rng)"
    );
    println!(
        "  {:<32} {:>10} {:>5} {:>12} {:>8} {:>12} {:>7}",
        "Scenario", "Expect", "Pass%", "PeakLat(ms)", "PeakCrit", "StableAfter", "Time"
    );
    println!("  {}", "-".repeat(92));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, args.runs, args.seed, ts_dir.as_deref())?;

        let pass_pct = report.pass_rate * 100.0;
        let status = if report.pass_rate >= PASS_THRESHOLD { "PASS" } else { "FAIL" };
        let stable_after = if report.ticks_to_stable.n > 0 {
            format!("{:.1}", report.ticks_to_stable.mean)
        } else {
            "-".to_string()
        };

        println!(
            "  {:<32} {:>10} {:>4}% {:>12.3e} {:>8.1} {:>12} {:>5.1}ms  {}",
            report.label,
            format!("{:?}", report.expected),
            pass_pct as u32,
            report.peak_latency.mean,
            report.peak_critical_count.mean,
            stable_after,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= PASS_THRESHOLD).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(92));
    println!(
        "  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total,
        passed,
        failed,
        suite_elapsed.as_secs_f64()
    );

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        n_runs_per_scenario: args.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, &json)?;
    info!(path = %path.display(), "results saved");

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
