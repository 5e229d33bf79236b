// Copyright 2026 Hypermesh Foundation. All rights reserved.
// PoP Pulse Simulation Suite - Geo Distance

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometres between two points given in
/// degrees.
pub fn great_circle_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Linear attenuation of coupling with distance, floored so that no edge ever
/// loses all influence.
///
/// `1 - distance / horizon`, never below `floor`.
pub fn distance_decay(distance_km: f64, horizon_km: f64, floor: f64) -> f64 {
    if horizon_km <= 0.0 {
        return floor;
    }
    (1.0 - distance_km / horizon_km).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance() {
        assert_eq!(great_circle_km(51.5074, -0.1278, 51.5074, -0.1278), 0.0);
    }

    #[test]
    fn test_london_frankfurt() {
        // Roughly 637 km between the two city centres.
        let d = great_circle_km(51.5074, -0.1278, 50.1109, 8.6821);
        assert!((d - 637.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_symmetric() {
        let ab = great_circle_km(37.7749, -122.4194, 35.6762, 139.6503);
        let ba = great_circle_km(35.6762, 139.6503, 37.7749, -122.4194);
        assert_relative_eq!(ab, ba, epsilon = 1e-9);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = great_circle_km(0.0, 0.0, 0.0, 180.0);
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_decay_linear_then_floor() {
        assert_relative_eq!(distance_decay(0.0, 20_000.0, 0.1), 1.0);
        assert_relative_eq!(distance_decay(10_000.0, 20_000.0, 0.1), 0.5);
        assert_relative_eq!(distance_decay(19_000.0, 20_000.0, 0.1), 0.1, epsilon = 1e-12);
        assert_relative_eq!(distance_decay(30_000.0, 20_000.0, 0.1), 0.1);
    }

    #[test]
    fn test_decay_degenerate_horizon() {
        assert_eq!(distance_decay(100.0, 0.0, 0.25), 0.25);
    }
}
