// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ─── Node Status ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Stable,
    Warning,
    Critical,
}

impl NodeStatus {
    /// Classify a latency against its baseline using multiplier thresholds.
    /// Both comparisons are strict: sitting exactly on a threshold stays in
    /// the lower band.
    pub fn classify(
        latency: f64,
        baseline: f64,
        warning_multiplier: f64,
        critical_multiplier: f64,
    ) -> Self {
        if latency > baseline * critical_multiplier {
            Self::Critical
        } else if latency > baseline * warning_multiplier {
            Self::Warning
        } else {
            Self::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

// ─── History Sample ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistorySample {
    /// Wall-clock milliseconds since the Unix epoch.
    pub time: f64,
    pub latency: f64,
    /// Stress score in [0, 100].
    pub risk: f64,
}

// ─── PopNode ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopNode {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub baseline: f64,
    pub latency: f64,
    pub status: NodeStatus,
    pub history: VecDeque<HistorySample>,
}

impl PopNode {
    /// Positive excess over baseline. Below-baseline deviation never spreads.
    pub fn stress(&self) -> f64 {
        (self.latency - self.baseline).max(0.0)
    }

    pub fn is_critical(&self) -> bool {
        self.status == NodeStatus::Critical
    }
}

// ─── Edge ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl Edge {
    pub fn new(source: &str, target: &str, weight: f64) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        }
    }
}

/// Edge as handed to the renderer, with the derived colouring flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub weight: f64,
    /// True when either endpoint is critical.
    pub critical: bool,
}

// ─── EngineSnapshot ──────────────────────────────────────────────────────────

/// Immutable copy of the engine state after a mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSnapshot {
    pub revision: u64,
    pub tick_count: u64,
    /// Simulated milliseconds since the last shock or reset.
    pub sim_time_elapsed: f64,
    pub propagation_speed: f64,
    pub shock_magnitude: f64,
    pub last_event: Option<String>,
    pub nodes: Vec<PopNode>,
    pub edges: Vec<EdgeView>,
}

impl EngineSnapshot {
    pub fn node(&self, id: &str) -> Option<&PopNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn count_status(&self, status: NodeStatus) -> usize {
        self.nodes.iter().filter(|n| n.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        assert_eq!(NodeStatus::classify(10.0, 10.0, 1.8, 3.0), NodeStatus::Stable);
        assert_eq!(NodeStatus::classify(18.0, 10.0, 1.8, 3.0), NodeStatus::Stable);
        assert_eq!(NodeStatus::classify(18.5, 10.0, 1.8, 3.0), NodeStatus::Warning);
        assert_eq!(NodeStatus::classify(30.0, 10.0, 1.8, 3.0), NodeStatus::Warning);
        assert_eq!(NodeStatus::classify(30.1, 10.0, 1.8, 3.0), NodeStatus::Critical);
        assert_eq!(NodeStatus::classify(2.0, 10.0, 1.8, 3.0), NodeStatus::Stable);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&NodeStatus::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: NodeStatus = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(back, NodeStatus::Warning);
    }

    #[test]
    fn test_stress_clamps_below_baseline() {
        let node = PopNode {
            id: "X".into(),
            name: "X".into(),
            lat: 0.0,
            lng: 0.0,
            baseline: 20.0,
            latency: 5.0,
            status: NodeStatus::Stable,
            history: VecDeque::new(),
        };
        assert_eq!(node.stress(), 0.0);
    }
}
