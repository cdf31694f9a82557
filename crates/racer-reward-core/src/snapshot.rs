//! Parameter snapshot types
//!
//! A [`ParameterSnapshot`] is the per-tick parameter dictionary the simulator
//! hands to a reward function. The JSON form uses the simulator's key names;
//! keys this crate does not model (`x`, `y`, `is_left_of_center`, ...) are
//! ignored on input.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::{RewardError, Result};
use crate::geometry;

/// A centerline reference point `[x, y]`
pub type Waypoint = [f64; 2];

/// One simulation tick's observable vehicle and track state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    /// Whether every wheel is within track bounds
    pub all_wheels_on_track: bool,

    /// Lateral offset from the track centerline
    pub distance_from_center: f64,

    /// Width of the track at the current position
    pub track_width: f64,

    /// Steering command in degrees, signed
    pub steering_angle: f64,

    /// Forward speed
    pub speed: f64,

    /// Vehicle orientation in degrees
    pub heading: f64,

    /// Centerline reference points
    pub waypoints: Vec<Waypoint>,

    /// Indices of the (previous, next) waypoints bracketing the vehicle
    #[serde(deserialize_with = "de_index_pair")]
    pub closest_waypoints: [usize; 2],

    /// Simulation steps elapsed
    #[serde(deserialize_with = "de_whole_number")]
    pub steps: u64,

    /// Percent of the track completed
    pub progress: f64,
}

impl ParameterSnapshot {
    /// Parse and validate a snapshot from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ParameterSnapshot =
            serde_json::from_str(json).map_err(|e| RewardError::snapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that the snapshot is well formed
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("distance_from_center", self.distance_from_center),
            ("track_width", self.track_width),
            ("steering_angle", self.steering_angle),
            ("speed", self.speed),
            ("heading", self.heading),
            ("progress", self.progress),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(RewardError::snapshot(format!("{field} is not finite")));
            }
        }

        if self.track_width <= 0.0 {
            return Err(RewardError::snapshot(format!(
                "track_width must be positive, got {}",
                self.track_width
            )));
        }
        if self.distance_from_center < 0.0 {
            return Err(RewardError::snapshot(format!(
                "distance_from_center must be non-negative, got {}",
                self.distance_from_center
            )));
        }
        if self.speed < 0.0 {
            return Err(RewardError::snapshot(format!(
                "speed must be non-negative, got {}",
                self.speed
            )));
        }
        if !(0.0..=100.0).contains(&self.progress) {
            return Err(RewardError::snapshot(format!(
                "progress must be within [0, 100], got {}",
                self.progress
            )));
        }

        for (i, point) in self.waypoints.iter().enumerate() {
            if !point.iter().all(|c| c.is_finite()) {
                return Err(RewardError::snapshot(format!("waypoint {i} is not finite")));
            }
        }

        let len = self.waypoints.len();
        for index in self.closest_waypoints {
            if index >= len {
                return Err(RewardError::snapshot(format!(
                    "closest waypoint index {index} out of range for {len} waypoints"
                )));
            }
        }

        Ok(())
    }

    /// Absolute steering angle in degrees
    pub fn abs_steering(&self) -> f64 {
        self.steering_angle.abs()
    }

    /// Distance from center as a fraction of track width
    pub fn normalized_distance(&self) -> f64 {
        self.distance_from_center / self.track_width
    }

    /// The (previous, next) closest waypoints
    pub fn closest_points(&self) -> Result<(Waypoint, Waypoint)> {
        let [prev, next] = self.closest_waypoints;
        let lookup = |index: usize| {
            self.waypoints.get(index).copied().ok_or_else(|| {
                RewardError::snapshot(format!(
                    "closest waypoint index {index} out of range for {} waypoints",
                    self.waypoints.len()
                ))
            })
        };
        Ok((lookup(prev)?, lookup(next)?))
    }

    /// Bearing of the centerline segment between the closest waypoints, in degrees
    pub fn track_bearing(&self) -> Result<f64> {
        let (prev, next) = self.closest_points()?;
        Ok(geometry::bearing_degrees(prev, next))
    }
}

/// Integral JSON number, possibly written as a float (`12.0`)
#[derive(Deserialize)]
#[serde(untagged)]
enum WholeNumber {
    Int(u64),
    Float(f64),
}

impl WholeNumber {
    fn into_u64<E: de::Error>(self) -> std::result::Result<u64, E> {
        match self {
            WholeNumber::Int(n) => Ok(n),
            WholeNumber::Float(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
                Ok(f as u64)
            }
            WholeNumber::Float(f) => Err(E::custom(format!(
                "expected a non-negative whole number, got {f}"
            ))),
        }
    }
}

fn de_whole_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    WholeNumber::deserialize(deserializer)?.into_u64()
}

fn de_index_pair<'de, D>(deserializer: D) -> std::result::Result<[usize; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let [prev, next] = <[WholeNumber; 2]>::deserialize(deserializer)?;
    let to_index = |n: WholeNumber| {
        n.into_u64::<D::Error>()
            .and_then(|v| usize::try_from(v).map_err(<D::Error as de::Error>::custom))
    };
    Ok([to_index(prev)?, to_index(next)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIM_PARAMS: &str = r#"{
        "all_wheels_on_track": true,
        "x": 3.2,
        "y": 0.7,
        "distance_from_center": 0.05,
        "is_left_of_center": false,
        "is_reversed": false,
        "track_width": 0.76,
        "steering_angle": -10.0,
        "speed": 1.5,
        "heading": 2.5,
        "waypoints": [[0.0, 0.0], [1.0, 0.0], [2.0, 0.5]],
        "closest_waypoints": [1.0, 2.0],
        "steps": 42.0,
        "progress": 12.5
    }"#;

    #[test]
    fn test_parses_simulator_params() {
        let snapshot = ParameterSnapshot::from_json(SIM_PARAMS).unwrap();
        assert!(snapshot.all_wheels_on_track);
        assert_eq!(snapshot.closest_waypoints, [1, 2]);
        assert_eq!(snapshot.steps, 42);
        assert_eq!(snapshot.waypoints.len(), 3);
        assert_eq!(snapshot.abs_steering(), 10.0);
    }

    #[test]
    fn test_integer_steps_accepted() {
        let json = SIM_PARAMS.replace("\"steps\": 42.0", "\"steps\": 42");
        let snapshot = ParameterSnapshot::from_json(&json).unwrap();
        assert_eq!(snapshot.steps, 42);
    }

    #[test]
    fn test_fractional_steps_rejected() {
        let json = SIM_PARAMS.replace("\"steps\": 42.0", "\"steps\": 42.5");
        let err = ParameterSnapshot::from_json(&json).unwrap_err();
        assert!(err.is_snapshot_error(), "got {err:?}");
    }

    #[test]
    fn test_steps_beyond_u64_rejected() {
        let json = SIM_PARAMS.replace("\"steps\": 42.0", "\"steps\": 1.8446744073709552e19");
        let err = ParameterSnapshot::from_json(&json).unwrap_err();
        assert!(err.is_snapshot_error(), "got {err:?}");
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let snapshot = ParameterSnapshot::from_json(SIM_PARAMS).unwrap();

        let nan_speed = ParameterSnapshot {
            speed: f64::NAN,
            ..snapshot.clone()
        };
        let err = nan_speed.validate().unwrap_err();
        assert!(err.is_snapshot_error());
        assert!(err.to_string().contains("speed"), "got {err}");

        let mut far_waypoint = snapshot;
        far_waypoint.waypoints[0] = [f64::INFINITY, 0.0];
        let err = far_waypoint.validate().unwrap_err();
        assert!(err.is_snapshot_error());
        assert!(err.to_string().contains("waypoint 0"), "got {err}");
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = SIM_PARAMS.replace("\"track_width\": 0.76,", "");
        let err = ParameterSnapshot::from_json(&json).unwrap_err();
        assert!(err.is_snapshot_error());
        assert!(err.to_string().contains("track_width"), "got {err}");
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let json = SIM_PARAMS.replace("[1.0, 2.0]", "[2, 3]");
        let err = ParameterSnapshot::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("out of range"), "got {err}");
    }

    #[test]
    fn test_zero_track_width_rejected() {
        let json = SIM_PARAMS.replace("\"track_width\": 0.76", "\"track_width\": 0.0");
        let err = ParameterSnapshot::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("track_width"), "got {err}");
    }

    #[test]
    fn test_progress_out_of_range_rejected() {
        let json = SIM_PARAMS.replace("\"progress\": 12.5", "\"progress\": 100.5");
        assert!(ParameterSnapshot::from_json(&json).is_err());
    }

    #[test]
    fn test_track_bearing() {
        let snapshot = ParameterSnapshot::from_json(SIM_PARAMS).unwrap();
        let bearing = snapshot.track_bearing().unwrap();
        // segment (1,0) -> (2,0.5)
        assert!((bearing - 26.565_051_177_077_99).abs() < 1e-9);
    }
}
