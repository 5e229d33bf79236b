// Monte Carlo Infrastructure: N runs per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N, computing mean ± 95% CI

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use pulse_engine::clock::SteppingClock;
use pulse_engine::{EngineSnapshot, NodeStatus, PulseSimulation, Topology};

use crate::report::*;
use crate::scenarios::{Outcome, Scenario, ShockPlan};
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Relative deviation below which a node counts as back at baseline.
const RECOVERY_TOLERANCE: f64 = 0.05;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<BenchResult, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let config = (scenario.config)();
    let tick_period = config.tick_period_ms;
    let mut sim = PulseSimulation::build_with_clock(
        Topology::reference(),
        config,
        Box::new(SteppingClock::new(0.0, tick_period)),
    )?;
    sim.apply_propagation_speed(scenario.propagation_speed);
    sim.apply_shock_magnitude(scenario.shock_magnitude);

    let node_ids: Vec<String> = sim.nodes().iter().map(|n| n.id.clone()).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());

    let last_shock_tick = scenario.shocks.last_shock_tick();
    let mut shocks_applied = 0u32;
    let mut energy_injected = 0.0;
    let mut peak_latency: f64 = 0.0;
    let mut peak_critical_count = 0usize;
    let mut ticks_to_stable = None;
    let mut last: Option<EngineSnapshot> = None;

    for tick in 0..scenario.ticks {
        let targets: Vec<&str> = match &scenario.shocks {
            ShockPlan::Scripted(events) => events
                .iter()
                .filter(|(t, _)| *t == tick)
                .map(|(_, id)| *id)
                .collect(),
            ShockPlan::Storm { probability, until_tick } => {
                if tick < *until_tick && !node_ids.is_empty() && rng.gen::<f64>() < *probability {
                    vec![node_ids[rng.gen_range(0..node_ids.len())].as_str()]
                } else {
                    Vec::new()
                }
            }
        };
        for id in targets {
            if sim.apply_shock(id) {
                shocks_applied += 1;
                energy_injected += sim.shock_magnitude();
            }
        }

        let snapshot = sim.tick_core();

        let max_latency = snapshot.nodes.iter().map(|n| n.latency).fold(0.0, f64::max);
        peak_latency = peak_latency.max(max_latency);
        peak_critical_count = peak_critical_count.max(snapshot.count_status(NodeStatus::Critical));

        if ticks_to_stable.is_none()
            && tick >= last_shock_tick
            && snapshot.nodes.iter().all(|n| n.status == NodeStatus::Stable)
        {
            ticks_to_stable = Some(tick - last_shock_tick);
        }

        if let Some(ts) = time_series.as_mut() {
            ts.record(&snapshot);
        }
        last = Some(snapshot);
    }

    let (final_total_stress, final_max_deviation, all_stable) = match &last {
        Some(s) => (
            s.nodes.iter().map(|n| n.stress()).sum::<f64>(),
            s.nodes
                .iter()
                .map(|n| ((n.latency - n.baseline) / n.baseline).abs())
                .fold(0.0, f64::max),
            s.nodes.iter().all(|n| n.status == NodeStatus::Stable),
        ),
        None => (0.0, 0.0, true),
    };

    let outcome = if all_stable && final_max_deviation < RECOVERY_TOLERANCE {
        Outcome::Recovered
    } else if final_total_stress > energy_injected {
        Outcome::Diverged
    } else {
        Outcome::Lingering
    };

    if let (Some(dir), Some(ts)) = (time_series_dir, &time_series) {
        let path = dir.join(format!("{}-seed{}.jsonl", scenario.name, seed));
        ts.write_jsonl(&path)?;
        tracing::debug!(path = %path.display(), ticks = ts.len(), "time series written");
    }

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!(
        scenario = scenario.name,
        seed,
        outcome = ?outcome,
        shocks_applied,
        "run complete"
    );

    Ok(BenchResult {
        scenario: scenario.name.to_string(),
        seed,
        pass: outcome == scenario.expect,
        outcome,
        shocks_applied,
        energy_injected,
        peak_latency,
        peak_critical_count,
        ticks_to_stable,
        final_total_stress,
        final_max_deviation,
        ticks: scenario.ticks,
        elapsed_ms,
    })
}

/// Run N iterations of a scenario and aggregate.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<MonteCarloReport, Box<dyn std::error::Error>> {
    let mut runs = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        runs.push(run_single(scenario, base_seed + i as u64, time_series_dir)?);
    }

    let collect = |f: fn(&BenchResult) -> f64| -> Vec<f64> { runs.iter().map(f).collect() };
    let stable_after: Vec<f64> = runs
        .iter()
        .filter_map(|r| r.ticks_to_stable)
        .map(|t| t as f64)
        .collect();
    let passed = runs.iter().filter(|r| r.pass).count();

    Ok(MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        expected: scenario.expect,
        n_runs,
        pass_rate: if n_runs > 0 { passed as f64 / n_runs as f64 } else { 0.0 },
        peak_latency: Stats::from_samples(&collect(|r| r.peak_latency)),
        peak_critical_count: Stats::from_samples(&collect(|r| r.peak_critical_count as f64)),
        ticks_to_stable: Stats::from_samples(&stable_after),
        final_total_stress: Stats::from_samples(&collect(|r| r.final_total_stress)),
        elapsed_ms: Stats::from_samples(&collect(|r| r.elapsed_ms)),
        individual_runs: runs,
    })
}
