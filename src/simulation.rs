// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Simulation Core

use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, EngineConfig};
use crate::history;
use crate::summary::NetworkSummary;
use crate::topology::{Adjacency, Topology, TopologyError};
use crate::types::*;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Construction-time failures. Once built, every engine operation is total.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ─── PulseSimulation struct ──────────────────────────────────────────────────

#[wasm_bindgen]
pub struct PulseSimulation {
    pub(crate) config: EngineConfig,
    pub(crate) topology: Topology,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) adjacency: Adjacency,
    pub(crate) nodes: Vec<PopNode>,

    pub(crate) propagation_speed: f64,
    pub(crate) shock_magnitude: f64,

    pub(crate) last_event: Option<String>,
    /// Simulated ms since the last shock or reset. Display only.
    pub(crate) sim_time_elapsed: f64,
    pub(crate) tick_count: u64,
    /// Bumped by every operation that changes observable state.
    pub(crate) revision: u64,

    pub(crate) clock: Box<dyn Clock>,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl PulseSimulation {
    /// Validate the topology and config, then build an engine at baseline.
    pub fn build(topology: Topology, config: EngineConfig) -> Result<Self, EngineError> {
        Self::build_with_clock(topology, config, Box::new(SystemClock))
    }

    pub fn build_with_clock(
        topology: Topology,
        config: EngineConfig,
        clock: Box<dyn Clock>,
    ) -> Result<Self, EngineError> {
        topology.validate()?;
        config.validate()?;
        Ok(Self::from_parts(topology, config, clock))
    }

    /// Assemble without validating. Callers guarantee `baseline > 0`.
    pub(crate) fn from_parts(topology: Topology, config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        let index = topology.index();
        let adjacency = Adjacency::build(&topology, &index, &config);
        if adjacency.skipped > 0 {
            tracing::warn!(
                skipped = adjacency.skipped,
                "edges reference unknown nodes and will be ignored"
            );
        }
        let nodes = initial_nodes(&topology);
        let propagation_speed = config
            .propagation_speed_range
            .clamp(config.initial_propagation_speed);
        let shock_magnitude = config
            .shock_magnitude_range
            .clamp(config.initial_shock_magnitude);

        tracing::debug!(
            nodes = nodes.len(),
            edges = topology.edges.len(),
            "simulation initialized"
        );

        Self {
            config,
            topology,
            index,
            adjacency,
            nodes,
            propagation_speed,
            shock_magnitude,
            last_event: None,
            sim_time_elapsed: 0.0,
            tick_count: 0,
            revision: 0,
            clock,
        }
    }

    /// Advance one step. Every neighbor read sees the pre-tick state.
    pub fn tick_core(&mut self) -> EngineSnapshot {
        let now = self.clock.now_ms();
        let coupling = self.config.coupling(self.propagation_speed);
        let decay = self.config.decay_factor;
        let warn_mul = self.config.warning_multiplier;
        let crit_mul = self.config.critical_multiplier;

        // 1. Freeze prior-tick stress.
        let stress: Vec<f64> = self.nodes.iter().map(PopNode::stress).collect();

        // 2. Compute every next state from the frozen buffer.
        let next: Vec<(f64, NodeStatus)> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let impact: f64 = self
                    .adjacency
                    .neighbors(i)
                    .iter()
                    .filter(|link| link.factor > 0.0)
                    .map(|link| stress[link.neighbor] * link.factor * coupling)
                    .sum();
                let current_stress = node.latency - node.baseline;
                // Saturate instead of overflowing to infinity on a runaway mesh.
                let latency = (node.baseline + current_stress * decay + impact).min(f64::MAX);
                let status = NodeStatus::classify(latency, node.baseline, warn_mul, crit_mul);
                (latency, status)
            })
            .collect();

        // 3. Commit.
        let cap = self.config.history_cap;
        let risk_scale = self.config.risk_scale;
        for (node, (latency, status)) in self.nodes.iter_mut().zip(next) {
            let risk = history::risk_score(latency, node.baseline, risk_scale);
            history::push_bounded(&mut node.history, HistorySample { time: now, latency, risk }, cap);
            node.latency = latency;
            node.status = status;
        }

        self.sim_time_elapsed += self.config.tick_period_ms * self.propagation_speed;
        self.tick_count += 1;
        self.revision += 1;

        tracing::debug!(
            tick = self.tick_count,
            critical = self.count_status(NodeStatus::Critical),
            warning = self.count_status(NodeStatus::Warning),
            "tick"
        );

        self.snapshot()
    }

    /// Add `shock_magnitude` to one node and force it critical. Unknown ids
    /// change nothing and return false.
    pub fn apply_shock(&mut self, node_id: &str) -> bool {
        let Some(&i) = self.index.get(node_id) else {
            tracing::debug!(node_id, "shock ignored: unknown node");
            return false;
        };
        let node = &mut self.nodes[i];
        node.latency = (node.latency + self.shock_magnitude).min(f64::MAX);
        node.status = NodeStatus::Critical;
        let event = format!("Shock injected at {} ({})", node.name, node.id);

        tracing::info!(
            node_id,
            magnitude = self.shock_magnitude,
            latency = node.latency,
            "shock injected"
        );

        self.sim_time_elapsed = 0.0;
        self.last_event = Some(event);
        self.revision += 1;
        true
    }

    /// Return every node to baseline. Topology and tunables are kept.
    pub fn reset_core(&mut self) {
        self.nodes = initial_nodes(&self.topology);
        self.sim_time_elapsed = 0.0;
        self.tick_count = 0;
        self.last_event = Some("Simulation state reset to baseline".to_string());
        self.revision += 1;
        tracing::info!("simulation reset to baseline");
    }

    /// Clamp into the configured range and apply. Non-finite input is
    /// ignored. Returns the value now in effect.
    pub fn apply_propagation_speed(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            tracing::warn!(value, "ignoring non-finite propagation speed");
            return self.propagation_speed;
        }
        let clamped = self.config.propagation_speed_range.clamp(value);
        if clamped != self.propagation_speed {
            self.propagation_speed = clamped;
            self.revision += 1;
        }
        clamped
    }

    /// Clamp into the configured range and apply. Non-finite input is
    /// ignored. Returns the value now in effect.
    pub fn apply_shock_magnitude(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            tracing::warn!(value, "ignoring non-finite shock magnitude");
            return self.shock_magnitude;
        }
        let clamped = self.config.shock_magnitude_range.clamp(value);
        if clamped != self.shock_magnitude {
            self.shock_magnitude = clamped;
            self.revision += 1;
        }
        clamped
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            revision: self.revision,
            tick_count: self.tick_count,
            sim_time_elapsed: self.sim_time_elapsed,
            propagation_speed: self.propagation_speed,
            shock_magnitude: self.shock_magnitude,
            last_event: self.last_event.clone(),
            nodes: self.nodes.clone(),
            edges: self.edge_views(),
        }
    }

    /// Edges with the "either endpoint critical" flag resolved. Edges naming
    /// unknown nodes are reported with only their known endpoints considered.
    pub fn edge_views(&self) -> Vec<EdgeView> {
        let critical = |id: &str| {
            self.index
                .get(id)
                .map_or(false, |&i| self.nodes[i].is_critical())
        };
        self.topology
            .edges
            .iter()
            .map(|e| EdgeView {
                source: e.source.clone(),
                target: e.target.clone(),
                weight: e.weight,
                critical: critical(&e.source) || critical(&e.target),
            })
            .collect()
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary::from_nodes(&self.nodes)
    }

    pub fn node(&self, node_id: &str) -> Option<&PopNode> {
        self.index.get(node_id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[PopNode] {
        &self.nodes
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get_last_event(&self) -> Option<&str> {
        self.last_event.as_deref()
    }

    pub fn get_tick_count(&self) -> u64 {
        self.tick_count
    }

    fn count_status(&self, status: NodeStatus) -> usize {
        self.nodes.iter().filter(|n| n.status == status).count()
    }
}

// ─── Initial State ───────────────────────────────────────────────────────────

fn initial_nodes(topology: &Topology) -> Vec<PopNode> {
    topology
        .nodes
        .iter()
        .map(|spec| PopNode {
            id: spec.id.clone(),
            name: spec.name.clone(),
            lat: spec.lat,
            lng: spec.lng,
            baseline: spec.baseline,
            latency: spec.baseline,
            status: NodeStatus::Stable,
            history: Default::default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::topology::PopSpec;
    use approx::assert_relative_eq;

    fn engine(topology: Topology, config: EngineConfig) -> PulseSimulation {
        PulseSimulation::build_with_clock(topology, config, Box::new(SteppingClock::new(0.0, 1000.0)))
            .expect("valid engine")
    }

    #[test]
    fn test_initial_state_at_baseline() {
        let sim = engine(Topology::reference(), EngineConfig::default());
        for node in sim.nodes() {
            assert_eq!(node.latency, node.baseline);
            assert_eq!(node.status, NodeStatus::Stable);
            assert!(node.history.is_empty());
        }
        assert_eq!(sim.propagation_speed, 0.5);
        assert_eq!(sim.shock_magnitude, 80.0);
        assert!(sim.get_last_event().is_none());
    }

    #[test]
    fn test_initial_params_clamped_into_range() {
        let cfg = EngineConfig {
            initial_propagation_speed: 9.0,
            initial_shock_magnitude: 1.0,
            ..EngineConfig::default()
        };
        let sim = engine(Topology::reference(), cfg);
        assert_eq!(sim.propagation_speed, 2.0);
        assert_eq!(sim.shock_magnitude, 10.0);
    }

    #[test]
    fn test_setters_bump_revision_only_on_change() {
        let mut sim = engine(Topology::reference(), EngineConfig::default());
        assert_eq!(sim.apply_propagation_speed(0.5), 0.5);
        assert_eq!(sim.revision, 0);
        assert_eq!(sim.apply_propagation_speed(1.2), 1.2);
        assert_eq!(sim.revision, 1);
        assert_eq!(sim.apply_shock_magnitude(f64::NAN), 80.0);
        assert_eq!(sim.revision, 1);
    }

    #[test]
    fn test_edge_view_flags_critical_endpoint() {
        let mut sim = engine(Topology::reference(), EngineConfig::default());
        sim.apply_shock("LHR");
        let views = sim.edge_views();
        let lhr_edges = views.iter().filter(|e| e.source == "LHR" || e.target == "LHR");
        assert!(lhr_edges.clone().count() == 2);
        assert!(lhr_edges.clone().all(|e| e.critical));
        assert!(views.iter().filter(|e| e.critical).count() == 2);
    }

    #[test]
    fn test_sim_time_scales_with_speed() {
        let mut sim = engine(Topology::reference(), EngineConfig::default());
        sim.apply_propagation_speed(1.5);
        sim.tick_core();
        sim.tick_core();
        assert_relative_eq!(sim.sim_time_elapsed, 3000.0);
        sim.apply_shock("SFO");
        assert_eq!(sim.sim_time_elapsed, 0.0);
    }

    #[test]
    fn test_empty_topology_ticks() {
        let mut sim = engine(Topology::default(), EngineConfig::default());
        let snap = sim.tick_core();
        assert!(snap.nodes.is_empty());
        assert!(snap.edges.is_empty());
        assert_eq!(snap.tick_count, 1);
        assert!(!sim.apply_shock("anything"));
    }

    #[test]
    fn test_self_loop_feeds_own_stress() {
        let topology = Topology {
            nodes: vec![PopSpec::new("A", "A", 0.0, 0.0, 10.0)],
            edges: vec![Edge::new("A", "A", 1.0)],
        };
        let mut sim = engine(topology, EngineConfig::default());
        sim.apply_propagation_speed(1.0);
        sim.apply_shock_magnitude(100.0);
        sim.apply_shock("A");
        sim.tick_core();
        // 10 + 100 * 0.94 + 100 * 1.0 * 0.12
        assert_relative_eq!(sim.nodes()[0].latency, 10.0 + 94.0 + 12.0, epsilon = 1e-9);
    }
}
