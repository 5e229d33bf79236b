// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Engine Configuration

//! Tunable constants of the latency update law.
//!
//! Every number the tick rule uses lives here rather than in the engine, so a
//! host can reproduce any of the dashboard's revisions by overriding a subset
//! of fields in JSON. Missing fields fall back to [`EngineConfig::default`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("decay_factor must lie strictly between 0 and 1, got {0}")]
    DecayFactorOutOfRange(f64),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("warning_multiplier ({warning}) must be below critical_multiplier ({critical})")]
    ThresholdOrder { warning: f64, critical: f64 },

    #[error("{field} range is empty or non-positive: [{min}, {max}]")]
    InvalidRange { field: &'static str, min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// ParamRange
// ---------------------------------------------------------------------------

/// Inclusive range a tunable parameter is clamped into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.min <= self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange { field, min: self.min, max: self.max })
        }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Fraction of a node's own stress retained per tick, in (0, 1).
    pub decay_factor: f64,
    /// Neighbor coupling per unit of propagation speed.
    pub coupling_base: f64,
    /// Status turns `warning` above `baseline * warning_multiplier`.
    pub warning_multiplier: f64,
    /// Status turns `critical` above `baseline * critical_multiplier`.
    pub critical_multiplier: f64,
    /// Multiplier from relative excess latency to the 0-100 risk score.
    pub risk_scale: f64,
    /// Samples retained per node.
    pub history_cap: usize,
    /// Period of the host's tick timer, in ms. Only feeds `sim_time_elapsed`.
    pub tick_period_ms: f64,
    /// Attenuate coupling with great-circle distance. Disabled gives flat
    /// coupling across every edge.
    pub regional_coupling: bool,
    /// Distance at which the linear decay reaches zero before flooring.
    pub distance_horizon_km: f64,
    /// Minimum distance-decay factor for any edge.
    pub distance_decay_floor: f64,
    pub propagation_speed_range: ParamRange,
    pub shock_magnitude_range: ParamRange,
    pub initial_propagation_speed: f64,
    /// Initial shock size in ms.
    pub initial_shock_magnitude: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.94,
            coupling_base: 0.12,
            warning_multiplier: 1.8,
            critical_multiplier: 3.0,
            risk_scale: 50.0,
            history_cap: 60,
            tick_period_ms: 1000.0,
            regional_coupling: true,
            distance_horizon_km: 20_000.0,
            distance_decay_floor: 0.1,
            propagation_speed_range: ParamRange::new(0.1, 2.0),
            shock_magnitude_range: ParamRange::new(10.0, 200.0),
            initial_propagation_speed: 0.5,
            initial_shock_magnitude: 80.0,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("decay_factor", self.decay_factor),
            ("coupling_base", self.coupling_base),
            ("warning_multiplier", self.warning_multiplier),
            ("critical_multiplier", self.critical_multiplier),
            ("risk_scale", self.risk_scale),
            ("tick_period_ms", self.tick_period_ms),
            ("distance_horizon_km", self.distance_horizon_km),
            ("distance_decay_floor", self.distance_decay_floor),
            ("initial_propagation_speed", self.initial_propagation_speed),
            ("initial_shock_magnitude", self.initial_shock_magnitude),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.decay_factor <= 0.0 || self.decay_factor >= 1.0 {
            return Err(ConfigError::DecayFactorOutOfRange(self.decay_factor));
        }

        let positive = [
            ("coupling_base", self.coupling_base),
            ("warning_multiplier", self.warning_multiplier),
            ("critical_multiplier", self.critical_multiplier),
            ("risk_scale", self.risk_scale),
            ("tick_period_ms", self.tick_period_ms),
            ("distance_horizon_km", self.distance_horizon_km),
            ("distance_decay_floor", self.distance_decay_floor),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.warning_multiplier >= self.critical_multiplier {
            return Err(ConfigError::ThresholdOrder {
                warning: self.warning_multiplier,
                critical: self.critical_multiplier,
            });
        }

        self.propagation_speed_range.validate("propagation_speed")?;
        self.shock_magnitude_range.validate("shock_magnitude")?;
        Ok(())
    }

    /// Per-tick coupling for a given propagation speed.
    pub fn coupling(&self, propagation_speed: f64) -> f64 {
        self.coupling_base * propagation_speed
    }
}
