// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Topology

//! Static node and edge reference data.
//!
//! A [`Topology`] is loaded once and never mutated. The engine derives its
//! per-node runtime state from it at construction and again on every reset.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::config::EngineConfig;
use crate::geo;
use crate::types::Edge;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`Topology`].
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("invalid topology JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("node at index {0} has an empty id")]
    EmptyId(usize),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node {id} has non-positive baseline {baseline}")]
    NonPositiveBaseline { id: String, baseline: f64 },

    #[error("node {id} has invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { id: String, lat: f64, lng: f64 },

    #[error("edge {from}-{to} has weight {weight} outside [0, 1]")]
    InvalidWeight { from: String, to: String, weight: f64 },
}

// ---------------------------------------------------------------------------
// PopSpec / Topology
// ---------------------------------------------------------------------------

/// Static description of a PoP. `baseline` is the steady-state latency in ms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopSpec {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub baseline: f64,
}

impl PopSpec {
    pub fn new(id: &str, name: &str, lat: f64, lng: f64, baseline: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lng,
            baseline,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Topology {
    pub nodes: Vec<PopSpec>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Topology {
    /// The six-PoP global mesh the dashboard ships with.
    pub fn reference() -> Self {
        Self {
            nodes: vec![
                PopSpec::new("SFO", "San Francisco", 37.7749, -122.4194, 12.0),
                PopSpec::new("LHR", "London", 51.5074, -0.1278, 15.0),
                PopSpec::new("SIN", "Singapore", 1.3521, 103.8198, 18.0),
                PopSpec::new("FRA", "Frankfurt", 50.1109, 8.6821, 14.0),
                PopSpec::new("NRT", "Tokyo", 35.6762, 139.6503, 20.0),
                PopSpec::new("SYD", "Sydney", -33.8688, 151.2093, 25.0),
            ],
            edges: vec![
                Edge::new("SFO", "LHR", 0.8),
                Edge::new("LHR", "FRA", 0.95),
                Edge::new("FRA", "SIN", 0.7),
                Edge::new("SIN", "NRT", 0.85),
                Edge::new("NRT", "SFO", 0.75),
                Edge::new("SYD", "SIN", 0.65),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        let topology: Self = serde_json::from_str(json)?;
        topology.validate()?;
        Ok(topology)
    }

    /// Check node and edge invariants. Edges naming unknown nodes pass; they
    /// are dropped when the adjacency is built.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(TopologyError::EmptyId(i));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(TopologyError::DuplicateId(node.id.clone()));
            }
            if !(node.baseline.is_finite() && node.baseline > 0.0) {
                return Err(TopologyError::NonPositiveBaseline {
                    id: node.id.clone(),
                    baseline: node.baseline,
                });
            }
            let lat_ok = node.lat.is_finite() && (-90.0..=90.0).contains(&node.lat);
            let lng_ok = node.lng.is_finite() && (-180.0..=180.0).contains(&node.lng);
            if !(lat_ok && lng_ok) {
                return Err(TopologyError::InvalidCoordinates {
                    id: node.id.clone(),
                    lat: node.lat,
                    lng: node.lng,
                });
            }
        }
        for edge in &self.edges {
            if !(edge.weight.is_finite() && (0.0..=1.0).contains(&edge.weight)) {
                return Err(TopologyError::InvalidWeight {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    weight: edge.weight,
                });
            }
        }
        Ok(())
    }

    /// Index of each node id in `nodes`.
    pub fn index(&self) -> HashMap<String, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Adjacency
// ---------------------------------------------------------------------------

/// One incident edge seen from a node: the neighbor's index and the edge's
/// fixed coupling factor (`weight * distance_decay`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub neighbor: usize,
    pub factor: f64,
}

/// Per-node incident links, with everything that does not change between
/// ticks folded into `factor`.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    pub links: Vec<Vec<Link>>,
    /// Edges dropped because an endpoint is not in the node set.
    pub skipped: usize,
}

impl Adjacency {
    pub fn build(topology: &Topology, index: &HashMap<String, usize>, config: &EngineConfig) -> Self {
        let mut links = vec![Vec::new(); topology.nodes.len()];
        let mut skipped = 0;

        for edge in &topology.edges {
            let (Some(&a), Some(&b)) = (index.get(&edge.source), index.get(&edge.target)) else {
                skipped += 1;
                continue;
            };
            let decay = if config.regional_coupling {
                let (na, nb) = (&topology.nodes[a], &topology.nodes[b]);
                let km = geo::great_circle_km(na.lat, na.lng, nb.lat, nb.lng);
                geo::distance_decay(km, config.distance_horizon_km, config.distance_decay_floor)
            } else {
                1.0
            };
            let factor = edge.weight * decay;
            links[a].push(Link { neighbor: b, factor });
            // A self-loop is incident once.
            if a != b {
                links[b].push(Link { neighbor: a, factor });
            }
        }

        Self { links, skipped }
    }

    pub fn neighbors(&self, node: usize) -> &[Link] {
        self.links.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_is_valid() {
        let t = Topology::reference();
        assert!(t.validate().is_ok());
        assert_eq!(t.nodes.len(), 6);
        assert_eq!(t.edges.len(), 6);
    }

    #[test]
    fn test_rejects_zero_baseline() {
        let mut t = Topology::reference();
        t.nodes[2].baseline = 0.0;
        assert!(matches!(t.validate(), Err(TopologyError::NonPositiveBaseline { .. })));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut t = Topology::reference();
        t.nodes.push(PopSpec::new("SFO", "Again", 0.0, 0.0, 5.0));
        assert!(matches!(t.validate(), Err(TopologyError::DuplicateId(id)) if id == "SFO"));
    }

    #[test]
    fn test_rejects_bad_weight() {
        let mut t = Topology::reference();
        t.edges.push(Edge::new("SFO", "SYD", 1.5));
        assert!(matches!(t.validate(), Err(TopologyError::InvalidWeight { .. })));
    }

    #[test]
    fn test_rejects_bad_latitude() {
        let mut t = Topology::reference();
        t.nodes[0].lat = 91.0;
        assert!(matches!(t.validate(), Err(TopologyError::InvalidCoordinates { .. })));
    }

    #[test]
    fn test_from_json_without_edges() {
        let t = Topology::from_json(
            r#"{ "nodes": [{ "id": "A", "name": "Alpha", "lat": 0, "lng": 0, "baseline": 10 }] }"#,
        )
        .expect("valid topology");
        assert_eq!(t.nodes.len(), 1);
        assert!(t.edges.is_empty());
    }

    #[test]
    fn test_adjacency_skips_unknown_endpoints() {
        let mut t = Topology::reference();
        t.edges.push(Edge::new("SFO", "GHOST", 0.5));
        let index = t.index();
        let adj = Adjacency::build(&t, &index, &EngineConfig::default());
        assert_eq!(adj.skipped, 1);
        let sfo = index["SFO"];
        assert_eq!(adj.neighbors(sfo).len(), 2);
    }

    #[test]
    fn test_adjacency_flat_coupling_uses_raw_weight() {
        let t = Topology::reference();
        let index = t.index();
        let cfg = EngineConfig { regional_coupling: false, ..EngineConfig::default() };
        let adj = Adjacency::build(&t, &index, &cfg);
        let lhr = index["LHR"];
        let fra = index["FRA"];
        let link = adj.neighbors(lhr).iter().find(|l| l.neighbor == fra).unwrap();
        assert_eq!(link.factor, 0.95);
    }

    #[test]
    fn test_self_loop_incident_once() {
        let t = Topology {
            nodes: vec![PopSpec::new("A", "A", 0.0, 0.0, 10.0)],
            edges: vec![Edge::new("A", "A", 0.5)],
        };
        let adj = Adjacency::build(&t, &t.index(), &EngineConfig::default());
        assert_eq!(adj.neighbors(0).len(), 1);
    }
}
