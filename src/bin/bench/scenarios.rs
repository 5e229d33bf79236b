// Scenario Definitions: scripted shocks and seeded shock storms over the reference mesh
// Zero engine changes: scenarios only pick tunables, config overrides and shock plans

use pulse_engine::EngineConfig;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub ticks: u64,
    pub propagation_speed: f64,
    pub shock_magnitude: f64,
    pub config: fn() -> EngineConfig,
    pub shocks: ShockPlan,
    pub expect: Outcome,
}

pub enum ShockPlan {
    /// Fixed (tick, node id) injections.
    Scripted(&'static [(u64, &'static str)]),
    /// Each tick before `until_tick`, shock a uniformly random node with
    /// probability `probability`.
    Storm { probability: f64, until_tick: u64 },
}

impl ShockPlan {
    /// Last tick at which this plan may inject.
    pub fn last_shock_tick(&self) -> u64 {
        match self {
            Self::Scripted(events) => events.iter().map(|(t, _)| *t).max().unwrap_or(0),
            Self::Storm { until_tick, .. } => until_tick.saturating_sub(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every node back to stable and within 5% of baseline at the end.
    Recovered,
    /// Total stress at the end exceeds everything injected.
    Diverged,
    /// Neither: still settling when the run stopped.
    Lingering,
}

// ─── Config Variants ────────────────────────────────────────────────────────

fn default_config() -> EngineConfig {
    EngineConfig::default()
}

fn flat_config() -> EngineConfig {
    EngineConfig { regional_coupling: false, ..EngineConfig::default() }
}

fn fast_decay_config() -> EngineConfig {
    EngineConfig { decay_factor: 0.85, ..EngineConfig::default() }
}

// ─── Scenario List ──────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "SINGLE_SHOCK_SFO",
            label: "Single shock at SFO (slow)",
            category: "Recovery",
            ticks: 200,
            propagation_speed: 0.2,
            shock_magnitude: 80.0,
            config: default_config,
            shocks: ShockPlan::Scripted(&[(0, "SFO")]),
            expect: Outcome::Recovered,
        },
        Scenario {
            name: "CASCADE_EU_ASIA",
            label: "LHR+FRA then SIN cascade",
            category: "Recovery",
            ticks: 400,
            propagation_speed: 0.3,
            shock_magnitude: 120.0,
            config: default_config,
            shocks: ShockPlan::Scripted(&[(0, "LHR"), (0, "FRA"), (5, "SIN")]),
            expect: Outcome::Recovered,
        },
        Scenario {
            name: "STORM_FAST_DECAY",
            label: "Random storm, decay 0.85",
            category: "Recovery",
            ticks: 300,
            propagation_speed: 0.5,
            shock_magnitude: 100.0,
            config: fast_decay_config,
            shocks: ShockPlan::Storm { probability: 0.2, until_tick: 100 },
            expect: Outcome::Recovered,
        },
        Scenario {
            name: "STORM_DEFAULT_SPEED",
            label: "Random storm at default speed",
            category: "Criticality",
            ticks: 400,
            propagation_speed: 0.5,
            shock_magnitude: 80.0,
            config: default_config,
            shocks: ShockPlan::Storm { probability: 0.2, until_tick: 100 },
            expect: Outcome::Diverged,
        },
        Scenario {
            name: "STORM_MAX_SPEED",
            label: "Random storm at max speed",
            category: "Criticality",
            ticks: 200,
            propagation_speed: 2.0,
            shock_magnitude: 200.0,
            config: default_config,
            shocks: ShockPlan::Storm { probability: 0.3, until_tick: 50 },
            expect: Outcome::Diverged,
        },
        Scenario {
            name: "FLAT_COUPLING_SLOW",
            label: "Flat coupling, single shock",
            category: "Variant",
            ticks: 300,
            propagation_speed: 0.1,
            shock_magnitude: 80.0,
            config: flat_config,
            shocks: ShockPlan::Scripted(&[(0, "LHR")]),
            expect: Outcome::Recovered,
        },
    ]
}
