//! Track geometry helpers

use crate::snapshot::Waypoint;

/// Bearing from `from` to `to` in degrees, in (-180, 180]
pub fn bearing_degrees(from: Waypoint, to: Waypoint) -> f64 {
    let [x0, y0] = from;
    let [x1, y1] = to;
    (y1 - y0).atan2(x1 - x0).to_degrees()
}

/// Absolute difference between a track bearing and the vehicle heading.
///
/// With `wrap` the result is folded into [0, 180]; without it the plain
/// absolute difference is returned, which can reach 360 when the two angles
/// straddle the ±180° seam.
pub fn heading_difference(bearing: f64, heading: f64, wrap: bool) -> f64 {
    let diff = (bearing - heading).abs();
    if wrap {
        let diff = diff % 360.0;
        if diff > 180.0 { 360.0 - diff } else { diff }
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cardinal_bearings() {
        assert_eq!(bearing_degrees([0.0, 0.0], [1.0, 0.0]), 0.0);
        assert!((bearing_degrees([0.0, 0.0], [0.0, 1.0]) - 90.0).abs() < 1e-12);
        assert!((bearing_degrees([0.0, 0.0], [-1.0, 0.0]) - 180.0).abs() < 1e-12);
        assert!((bearing_degrees([0.0, 0.0], [0.0, -1.0]) + 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_unwrapped_difference_crosses_seam() {
        assert!((heading_difference(179.0, -179.0, false) - 358.0).abs() < 1e-12);
        assert!((heading_difference(179.0, -179.0, true) - 2.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn wrapped_difference_is_bounded(bearing in -180.0f64..=180.0, heading in -180.0f64..=180.0) {
            let diff = heading_difference(bearing, heading, true);
            prop_assert!((0.0..=180.0).contains(&diff));
            let raw = heading_difference(bearing, heading, false);
            prop_assert!(diff <= raw + 1e-12);
        }
    }
}
