//! Browser-side checks for the exported class. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use pulse_engine::{EngineSnapshot, PulseSimulation};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn tick_returns_snapshot_object() {
    let mut sim = PulseSimulation::new();
    let value = sim.tick();
    assert!(value.is_object());
    let snapshot: EngineSnapshot = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(snapshot.tick_count, 1);
    assert_eq!(snapshot.nodes.len(), 6);
    assert!(snapshot.nodes[0].history.back().unwrap().time > 0.0);
}

#[wasm_bindgen_test]
fn inject_shock_reports_known_ids() {
    let mut sim = PulseSimulation::new();
    assert!(sim.inject_shock("SIN"));
    assert!(!sim.inject_shock("XXX"));
    assert_eq!(sim.last_event().as_deref(), Some("Shock injected at Singapore (SIN)"));
}

#[wasm_bindgen_test]
fn from_json_rejects_bad_topology() {
    assert!(PulseSimulation::from_json("{\"nodes\": [{}]}", None).is_err());
    let ok = PulseSimulation::from_json(
        r#"{"nodes":[{"id":"A","name":"A","lat":0,"lng":0,"baseline":5}]}"#,
        Some(r#"{"decay_factor":0.9}"#.to_string()),
    );
    assert!(ok.is_ok());
}
