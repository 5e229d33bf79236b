// Per-Tick JSONL Time Series Recorder
// Outputs one JSON line per tick for independent analysis

use pulse_engine::{EngineSnapshot, NodeStatus};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub sim_time_elapsed: f64,
    pub mean_latency: f64,
    pub max_latency: f64,
    pub total_stress: f64,
    pub stable_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub peak_risk: f64,
    pub last_event: Option<String>,
    /// Latency per node, in topology order.
    pub latencies: Vec<f64>,
}

impl TickSnapshot {
    pub fn from_snapshot(snapshot: &EngineSnapshot) -> Self {
        let latencies: Vec<f64> = snapshot.nodes.iter().map(|n| n.latency).collect();
        let mean_latency = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().sum::<f64>() / latencies.len() as f64
        };
        Self {
            tick: snapshot.tick_count,
            sim_time_elapsed: snapshot.sim_time_elapsed,
            mean_latency,
            max_latency: latencies.iter().cloned().fold(0.0, f64::max),
            total_stress: snapshot.nodes.iter().map(|n| n.stress()).sum(),
            stable_count: snapshot.count_status(NodeStatus::Stable),
            warning_count: snapshot.count_status(NodeStatus::Warning),
            critical_count: snapshot.count_status(NodeStatus::Critical),
            peak_risk: snapshot
                .nodes
                .iter()
                .filter_map(|n| n.history.back())
                .map(|s| s.risk)
                .fold(0.0, f64::max),
            last_event: snapshot.last_event.clone(),
            latencies,
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, snapshot: &EngineSnapshot) {
        self.snapshots.push(TickSnapshot::from_snapshot(snapshot));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
