//! Great-circle distance over a WGS-84 sphere.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A geographic point, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Great-circle distance between two points, in metres.
///
/// Points with equal lat/lon return 0 without going through `acos`, since
/// floating-point error there can otherwise push the argument fractionally
/// outside `[-1, 1]`.
pub fn compute_distance(from: Coordinates, to: Coordinates) -> f64 {
    if from.latitude == to.latitude && from.longitude == to.longitude {
        return 0.0;
    }
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let lon1 = from.longitude.to_radians();
    let lon2 = to.longitude.to_radians();
    let arg = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    arg.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_METERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero() {
        let p = Coordinates::new(43.587795, 39.716901);
        assert_eq!(compute_distance(p, p), 0.0);
    }

    #[test]
    fn known_pair_within_tolerance() {
        let a = Coordinates::new(43.587795, 39.716901);
        let b = Coordinates::new(43.581969, 39.719848);
        let d = compute_distance(a, b);
        assert!((d - 850.0).abs() < 20.0);
    }

    #[test]
    fn acos_argument_is_clamped() {
        let a = Coordinates::new(90.0, 0.0);
        let b = Coordinates::new(-90.0, 0.0);
        let d = compute_distance(a, b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }
}
