// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Network Summary

use serde::{Deserialize, Serialize};

use crate::types::{NodeStatus, PopNode};

const ELEVATED_RISK: f64 = 25.0;
const HIGH_RISK: f64 = 60.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttackRisk {
    Low,
    Elevated,
    High,
}

impl AttackRisk {
    pub fn from_peak(peak_risk: f64) -> Self {
        if peak_risk >= HIGH_RISK {
            Self::High
        } else if peak_risk >= ELEVATED_RISK {
            Self::Elevated
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NetworkState {
    Optimized,
    Degraded,
    UnderAttack,
}

/// Aggregate figures for the monitor's heads-up panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSummary {
    pub node_count: usize,
    pub stable_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    /// Nodes not currently critical.
    pub active_count: usize,
    pub mean_latency: f64,
    pub mean_baseline: f64,
    /// Mean of `latency / baseline` across nodes; 1.0 at rest.
    pub mean_load_ratio: f64,
    /// Highest risk among each node's latest sample.
    pub peak_risk: f64,
    pub attack_risk: AttackRisk,
    pub network_state: NetworkState,
}

impl NetworkSummary {
    pub fn from_nodes(nodes: &[PopNode]) -> Self {
        let count = |s: NodeStatus| nodes.iter().filter(|n| n.status == s).count();
        let stable_count = count(NodeStatus::Stable);
        let warning_count = count(NodeStatus::Warning);
        let critical_count = count(NodeStatus::Critical);

        let n = nodes.len() as f64;
        let mean = |f: fn(&PopNode) -> f64| {
            if nodes.is_empty() {
                0.0
            } else {
                nodes.iter().map(f).sum::<f64>() / n
            }
        };
        let mean_latency = mean(|p| p.latency);
        let mean_baseline = mean(|p| p.baseline);
        let mean_load_ratio = if nodes.is_empty() { 1.0 } else { mean(|p| p.latency / p.baseline) };

        let peak_risk = nodes
            .iter()
            .filter_map(|p| p.history.back())
            .map(|s| s.risk)
            .fold(0.0_f64, f64::max);

        let network_state = if critical_count > 0 {
            NetworkState::UnderAttack
        } else if warning_count > 0 {
            NetworkState::Degraded
        } else {
            NetworkState::Optimized
        };

        Self {
            node_count: nodes.len(),
            stable_count,
            warning_count,
            critical_count,
            active_count: nodes.len() - critical_count,
            mean_latency,
            mean_baseline,
            mean_load_ratio,
            peak_risk,
            attack_risk: AttackRisk::from_peak(peak_risk),
            network_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HistorySample;
    use std::collections::VecDeque;

    fn node(latency: f64, status: NodeStatus, risk: Option<f64>) -> PopNode {
        let mut history = VecDeque::new();
        if let Some(risk) = risk {
            history.push_back(HistorySample { time: 0.0, latency, risk });
        }
        PopNode {
            id: "N".into(),
            name: "N".into(),
            lat: 0.0,
            lng: 0.0,
            baseline: 10.0,
            latency,
            status,
            history,
        }
    }

    #[test]
    fn test_empty_network() {
        let s = NetworkSummary::from_nodes(&[]);
        assert_eq!(s.node_count, 0);
        assert_eq!(s.mean_latency, 0.0);
        assert_eq!(s.mean_load_ratio, 1.0);
        assert_eq!(s.attack_risk, AttackRisk::Low);
        assert_eq!(s.network_state, NetworkState::Optimized);
    }

    #[test]
    fn test_mixed_network() {
        let nodes = vec![
            node(10.0, NodeStatus::Stable, Some(0.0)),
            node(20.0, NodeStatus::Warning, Some(50.0)),
            node(40.0, NodeStatus::Critical, Some(100.0)),
        ];
        let s = NetworkSummary::from_nodes(&nodes);
        assert_eq!(s.warning_count, 1);
        assert_eq!(s.critical_count, 1);
        assert_eq!(s.active_count, 2);
        assert!((s.mean_latency - 70.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.peak_risk, 100.0);
        assert_eq!(s.attack_risk, AttackRisk::High);
        assert_eq!(s.network_state, NetworkState::UnderAttack);
    }

    #[test]
    fn test_degraded_without_critical() {
        let nodes = vec![node(10.0, NodeStatus::Stable, None), node(20.0, NodeStatus::Warning, Some(30.0))];
        let s = NetworkSummary::from_nodes(&nodes);
        assert_eq!(s.network_state, NetworkState::Degraded);
        assert_eq!(s.attack_risk, AttackRisk::Elevated);
    }
}
