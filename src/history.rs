// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Rolling History

use std::collections::VecDeque;

use crate::types::HistorySample;

/// Risk score for a latency reading: relative excess over baseline, scaled and
/// clamped to [0, 100].
pub fn risk_score(latency: f64, baseline: f64, risk_scale: f64) -> f64 {
    (((latency - baseline) / baseline) * risk_scale).clamp(0.0, 100.0)
}

/// Append a sample and evict from the front until `cap` samples remain.
pub fn push_bounded(window: &mut VecDeque<HistorySample>, sample: HistorySample, cap: usize) {
    window.push_back(sample);
    while window.len() > cap {
        window.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64) -> HistorySample {
        HistorySample { time, latency: 1.0, risk: 0.0 }
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut w = VecDeque::new();
        for t in 0..5 {
            push_bounded(&mut w, sample(t as f64), 3);
        }
        let times: Vec<f64> = w.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_cap_keeps_nothing() {
        let mut w = VecDeque::new();
        push_bounded(&mut w, sample(1.0), 0);
        assert!(w.is_empty());
    }

    #[test]
    fn test_risk_clamped() {
        assert_eq!(risk_score(5.0, 10.0, 50.0), 0.0);
        assert_eq!(risk_score(15.0, 10.0, 50.0), 25.0);
        assert_eq!(risk_score(100.0, 10.0, 50.0), 100.0);
    }
}
