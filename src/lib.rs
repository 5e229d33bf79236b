// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite

pub mod types;
pub mod config;
pub mod geo;
pub mod topology;
pub mod history;
pub mod clock;
pub mod summary;
pub mod simulation;

pub use types::*;
pub use config::{ConfigError, EngineConfig, ParamRange};
pub use topology::{PopSpec, Topology, TopologyError};
pub use summary::{AttackRisk, NetworkState, NetworkSummary};
pub use simulation::{EngineError, PulseSimulation};

use wasm_bindgen::prelude::*;

use crate::clock::SystemClock;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl PulseSimulation {
    /// Reference topology with default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        PulseSimulation::from_parts(Topology::reference(), EngineConfig::default(), Box::new(SystemClock))
    }

    /// Build from a topology JSON string and an optional (partial) config
    /// JSON string.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(topology: &str, config: Option<String>) -> Result<PulseSimulation, JsError> {
        install_panic_hook();
        let topology = Topology::from_json(topology).map_err(|e| JsError::new(&e.to_string()))?;
        let config = match config {
            Some(json) => EngineConfig::from_json(&json).map_err(|e| JsError::new(&e.to_string()))?,
            None => EngineConfig::default(),
        };
        PulseSimulation::build(topology, config).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Build from plain JS objects. `config` may be `undefined`.
    #[wasm_bindgen(js_name = fromObjects)]
    pub fn from_objects(topology: JsValue, config: JsValue) -> Result<PulseSimulation, JsError> {
        install_panic_hook();
        let topology: Topology = serde_wasm_bindgen::from_value(topology)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?
        };
        PulseSimulation::build(topology, config).map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn tick(&mut self) -> JsValue {
        let snapshot = self.tick_core();
        serde_wasm_bindgen::to_value(&snapshot).unwrap_or(JsValue::NULL)
    }

    pub fn inject_shock(&mut self, node_id: &str) -> bool {
        self.apply_shock(node_id)
    }

    /// Reset simulation to baseline
    pub fn reset(&mut self) {
        self.reset_core();
    }

    pub fn set_propagation_speed(&mut self, val: f64) -> f64 {
        self.apply_propagation_speed(val)
    }

    pub fn set_shock_magnitude(&mut self, val: f64) -> f64 {
        self.apply_shock_magnitude(val)
    }

    /// Run N ticks without returning results
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick_core();
        }
    }

    pub fn get_snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.snapshot()).unwrap_or(JsValue::NULL)
    }

    pub fn get_nodes(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.nodes).unwrap_or(JsValue::NULL)
    }

    pub fn get_edges(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.edge_views()).unwrap_or(JsValue::NULL)
    }

    pub fn get_node(&self, node_id: &str) -> JsValue {
        match self.node(node_id) {
            Some(n) => serde_wasm_bindgen::to_value(n).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    pub fn get_summary(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.summary()).unwrap_or(JsValue::NULL)
    }

    pub fn propagation_speed(&self) -> f64 { self.propagation_speed }
    pub fn shock_magnitude(&self) -> f64 { self.shock_magnitude }
    pub fn last_event(&self) -> Option<String> { self.last_event.clone() }
    pub fn sim_time_elapsed(&self) -> f64 { self.sim_time_elapsed }
    pub fn tick_period_ms(&self) -> f64 { self.config.tick_period_ms }

    /// Changes whenever observable state does; cheap to poll.
    pub fn revision(&self) -> f64 { self.revision as f64 }
}

impl Default for PulseSimulation {
    fn default() -> Self {
        Self::new()
    }
}

fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}
