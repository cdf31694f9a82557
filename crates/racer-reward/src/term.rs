//! Scoring terms
//!
//! A term reads the snapshot (through a [`TermContext`]) and applies its
//! effects to the accumulator. Terms never look at each other; the only
//! coupling is the order in which a [`Variant`](crate::Variant) lists them.

use racer_reward_core::{ParameterSnapshot, Result, RewardError, geometry};
use serde::{Deserialize, Serialize};

use crate::accumulator::Accumulator;
use crate::effect::{BandTable, Effect, SpeedTiers};

/// Values derived once per evaluation and shared by all terms
#[derive(Debug)]
pub struct TermContext<'a> {
    pub snapshot: &'a ParameterSnapshot,
    pub abs_steering: f64,
    /// Absolute difference between the track bearing and the heading, in degrees
    pub heading_diff: f64,
}

impl<'a> TermContext<'a> {
    /// Derive the shared values. The snapshot must already be validated.
    pub fn new(snapshot: &'a ParameterSnapshot, wrap_heading: bool) -> Result<Self> {
        let bearing = snapshot.track_bearing()?;
        Ok(Self {
            snapshot,
            abs_steering: snapshot.abs_steering(),
            heading_diff: geometry::heading_difference(bearing, snapshot.heading, wrap_heading),
        })
    }
}

/// One scoring term in a variant's chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "term", rename_all = "snake_case")]
pub enum ScoringTerm {
    OnTrack(OnTrackGate),
    Centerline(CenterlineBands),
    Straight(StraightBonus),
    Heading(HeadingBands),
    AlignedSpeed(AlignedSpeed),
    Pacing(ProgressPacing),
    ZigZag(ZigZagPenalty),
    Throttle(ThrottlePenalty),
}

impl ScoringTerm {
    /// Component name reported for this term
    pub fn name(&self) -> &'static str {
        match self {
            ScoringTerm::OnTrack(_) => "on_track",
            ScoringTerm::Centerline(_) => "centerline",
            ScoringTerm::Straight(_) => "straight",
            ScoringTerm::Heading(_) => "heading",
            ScoringTerm::AlignedSpeed(_) => "aligned_speed",
            ScoringTerm::Pacing(_) => "pacing",
            ScoringTerm::ZigZag(_) => "zig_zag",
            ScoringTerm::Throttle(_) => "throttle",
        }
    }

    /// Short human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ScoringTerm::OnTrack(_) => "Floor when any wheel leaves the track",
            ScoringTerm::Centerline(_) => "Banded distance from the centerline",
            ScoringTerm::Straight(_) => "Bonus for driving straight and fast",
            ScoringTerm::Heading(_) => "Banded heading alignment with the track",
            ScoringTerm::AlignedSpeed(_) => "Speed reward conditioned on heading alignment",
            ScoringTerm::Pacing(_) => "Bonus for staying ahead of the progress target",
            ScoringTerm::ZigZag(_) => "Penalty for steering hard",
            ScoringTerm::Throttle(_) => "Penalty for speed while steering",
        }
    }

    /// Apply this term to the accumulator
    pub fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        match self {
            ScoringTerm::OnTrack(t) => t.apply(ctx, acc),
            ScoringTerm::Centerline(t) => t.apply(ctx, acc),
            ScoringTerm::Straight(t) => t.apply(ctx, acc),
            ScoringTerm::Heading(t) => t.apply(ctx, acc),
            ScoringTerm::AlignedSpeed(t) => t.apply(ctx, acc),
            ScoringTerm::Pacing(t) => t.apply(ctx, acc),
            ScoringTerm::ZigZag(t) => t.apply(ctx, acc),
            ScoringTerm::Throttle(t) => t.apply(ctx, acc),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let ctx = self.name();
        match self {
            ScoringTerm::OnTrack(t) => t.validate(ctx),
            ScoringTerm::Centerline(t) => t.bands.validate(ctx),
            ScoringTerm::Straight(t) => t.validate(ctx),
            ScoringTerm::Heading(t) => t.bands.validate(ctx),
            ScoringTerm::AlignedSpeed(t) => t.validate(ctx),
            ScoringTerm::Pacing(t) => t.validate(ctx),
            ScoringTerm::ZigZag(t) => t.validate(ctx),
            ScoringTerm::Throttle(t) => t.validate(ctx),
        }
    }
}

fn check_finite(context: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RewardError::variant(format!(
            "{context}: {field} = {value} is not finite"
        )))
    }
}

/// Floor the reward when any wheel is off track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnTrackGate {
    /// Value set while on track; `None` keeps the running value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_track: Option<f64>,
}

impl OnTrackGate {
    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        if !ctx.snapshot.all_wheels_on_track {
            acc.apply(Effect::Floor);
        } else if let Some(ceiling) = self.on_track {
            acc.apply(Effect::Set(ceiling));
        }
    }

    fn validate(&self, ctx: &str) -> Result<()> {
        match self.on_track {
            Some(ceiling) => check_finite(ctx, "on_track", ceiling),
            None => Ok(()),
        }
    }
}

/// How the centerline distance is measured before banding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMeasure {
    /// `distance_from_center` as reported
    Raw,
    /// `distance_from_center / track_width`
    Normalized,
}

/// Step function over the distance from the centerline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterlineBands {
    pub measure: DistanceMeasure,
    /// Multiply band limits by `track_width`
    #[serde(default)]
    pub scale_by_width: bool,
    pub bands: BandTable,
}

impl CenterlineBands {
    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        let snapshot = ctx.snapshot;
        let measure = match self.measure {
            DistanceMeasure::Raw => snapshot.distance_from_center,
            DistanceMeasure::Normalized => snapshot.normalized_distance(),
        };
        let scale = if self.scale_by_width {
            snapshot.track_width
        } else {
            1.0
        };
        self.bands.apply(measure, scale, acc);
    }
}

/// Bonus for near-zero steering at speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightBonus {
    /// Steering must be strictly below this, in degrees
    pub max_steering: f64,
    /// Speed must be strictly above this
    pub min_speed: f64,
    pub multiplier: f64,
}

impl StraightBonus {
    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        if ctx.abs_steering < self.max_steering && ctx.snapshot.speed > self.min_speed {
            acc.apply(Effect::Multiply(self.multiplier));
        }
    }

    fn validate(&self, ctx: &str) -> Result<()> {
        check_finite(ctx, "max_steering", self.max_steering)?;
        check_finite(ctx, "min_speed", self.min_speed)?;
        check_finite(ctx, "multiplier", self.multiplier)
    }
}

/// Step function over the heading difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingBands {
    pub bands: BandTable,
}

impl HeadingBands {
    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        self.bands.apply(ctx.heading_diff, 1.0, acc);
    }
}

/// Penalty once the heading is misaligned, scaled by speed over a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverspeedPenalty {
    pub threshold: f64,
    /// Multiplier lost per unit of speed over `threshold`
    pub rate: f64,
    /// Lower bound on the multiplier
    pub min_multiplier: f64,
}

impl OverspeedPenalty {
    /// Multiplier for `speed`, or `None` at or below the threshold
    pub fn multiplier(&self, speed: f64) -> Option<f64> {
        (speed > self.threshold)
            .then(|| (1.0 - self.rate * (speed - self.threshold)).max(self.min_multiplier))
    }
}

/// What happens to speed when the heading is misaligned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MisalignedPenalty {
    Tiers(SpeedTiers),
    Overspeed(OverspeedPenalty),
}

/// Speed reward conditioned on heading alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSpeed {
    /// Heading differences up to this count as aligned
    pub max_heading_diff: f64,
    pub aligned: SpeedTiers,
    pub misaligned: MisalignedPenalty,
}

impl AlignedSpeed {
    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        let speed = ctx.snapshot.speed;
        let effect = if ctx.heading_diff <= self.max_heading_diff {
            self.aligned.select(speed)
        } else {
            match &self.misaligned {
                MisalignedPenalty::Tiers(tiers) => tiers.select(speed),
                MisalignedPenalty::Overspeed(penalty) => {
                    penalty.multiplier(speed).map(Effect::Multiply)
                }
            }
        };
        if let Some(effect) = effect {
            acc.apply(effect);
        }
    }

    fn validate(&self, ctx: &str) -> Result<()> {
        check_finite(ctx, "max_heading_diff", self.max_heading_diff)?;
        self.aligned.validate(ctx)?;
        match &self.misaligned {
            MisalignedPenalty::Tiers(tiers) => tiers.validate(ctx),
            MisalignedPenalty::Overspeed(p) => {
                check_finite(ctx, "threshold", p.threshold)?;
                check_finite(ctx, "rate", p.rate)?;
                check_finite(ctx, "min_multiplier", p.min_multiplier)
            }
        }
    }
}

/// Bonus every `interval` steps when progress is ahead of the step budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPacing {
    pub interval: u64,
    /// Steps expected to complete the whole track
    pub step_budget: f64,
    pub multiplier: f64,
}

impl ProgressPacing {
    /// Progress percentage expected after `steps`
    pub fn target(&self, steps: u64) -> f64 {
        steps as f64 / self.step_budget * 100.0
    }

    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        let steps = ctx.snapshot.steps;
        let on_interval = steps.checked_rem(self.interval) == Some(0);
        if on_interval && ctx.snapshot.progress >= self.target(steps) {
            acc.apply(Effect::Multiply(self.multiplier));
        }
    }

    fn validate(&self, ctx: &str) -> Result<()> {
        if self.interval == 0 {
            return Err(RewardError::variant(format!("{ctx}: interval must be positive")));
        }
        check_finite(ctx, "step_budget", self.step_budget)?;
        if self.step_budget <= 0.0 {
            return Err(RewardError::variant(format!(
                "{ctx}: step_budget must be positive"
            )));
        }
        check_finite(ctx, "multiplier", self.multiplier)
    }
}

/// Penalty when steering exceeds a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZigZagPenalty {
    /// Steering strictly above this is penalized, in degrees
    pub max_steering: f64,
    pub penalty: Effect,
}

impl ZigZagPenalty {
    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        if ctx.abs_steering > self.max_steering {
            acc.apply(self.penalty);
        }
    }

    fn validate(&self, ctx: &str) -> Result<()> {
        check_finite(ctx, "max_steering", self.max_steering)?;
        self.penalty.validate(ctx)
    }
}

/// Penalty when speed exceeds `base_speed - steering_factor * |steering|`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrottlePenalty {
    pub base_speed: f64,
    pub steering_factor: f64,
    pub multiplier: f64,
}

impl ThrottlePenalty {
    /// Speed limit for the given absolute steering angle
    pub fn limit(&self, abs_steering: f64) -> f64 {
        self.base_speed - self.steering_factor * abs_steering
    }

    fn apply(&self, ctx: &TermContext<'_>, acc: &mut Accumulator) {
        if ctx.snapshot.speed > self.limit(ctx.abs_steering) {
            acc.apply(Effect::Multiply(self.multiplier));
        }
    }

    fn validate(&self, ctx: &str) -> Result<()> {
        check_finite(ctx, "base_speed", self.base_speed)?;
        check_finite(ctx, "steering_factor", self.steering_factor)?;
        check_finite(ctx, "multiplier", self.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Band, SpeedTier};

    fn snapshot(speed: f64, steering: f64, heading: f64) -> ParameterSnapshot {
        ParameterSnapshot {
            all_wheels_on_track: true,
            distance_from_center: 0.1,
            track_width: 1.0,
            steering_angle: steering,
            speed,
            heading,
            waypoints: vec![[0.0, 0.0], [1.0, 0.0]],
            closest_waypoints: [0, 1],
            steps: 100,
            progress: 40.0,
        }
    }

    fn run(term: &ScoringTerm, snapshot: &ParameterSnapshot) -> f64 {
        let ctx = TermContext::new(snapshot, false).unwrap();
        let mut acc = Accumulator::new(1.0, 1e-3, true);
        term.apply(&ctx, &mut acc);
        acc.value()
    }

    #[test]
    fn test_on_track_gate() {
        let gate = ScoringTerm::OnTrack(OnTrackGate {
            on_track: Some(100.0),
        });
        let mut s = snapshot(1.0, 0.0, 0.0);
        assert_eq!(run(&gate, &s), 100.0);
        s.all_wheels_on_track = false;
        assert_eq!(run(&gate, &s), 1e-3);

        let keep = ScoringTerm::OnTrack(OnTrackGate { on_track: None });
        s.all_wheels_on_track = true;
        assert_eq!(run(&keep, &s), 1.0);
    }

    #[test]
    fn test_centerline_measures() {
        let bands = BandTable::new(
            vec![
                Band::new(0.1, Effect::Multiply(1.5)),
                Band::new(0.5, Effect::Multiply(0.7)),
            ],
            Effect::Floor,
        );
        let normalized = ScoringTerm::Centerline(CenterlineBands {
            measure: DistanceMeasure::Normalized,
            scale_by_width: false,
            bands: bands.clone(),
        });
        let raw_scaled = ScoringTerm::Centerline(CenterlineBands {
            measure: DistanceMeasure::Raw,
            scale_by_width: true,
            bands,
        });

        let mut s = snapshot(1.0, 0.0, 0.0);
        s.track_width = 2.0;
        s.distance_from_center = 0.3;
        // 0.15 normalized, 0.3 raw against 0.2 scaled limit
        assert_eq!(run(&normalized, &s), 0.7);
        assert_eq!(run(&raw_scaled, &s), 0.7);

        s.distance_from_center = 1.1;
        assert_eq!(run(&normalized, &s), 1e-3);
        assert_eq!(run(&raw_scaled, &s), 1e-3);
    }

    #[test]
    fn test_straight_bonus_thresholds_are_strict() {
        let term = ScoringTerm::Straight(StraightBonus {
            max_steering: 0.1,
            min_speed: 3.0,
            multiplier: 1.2,
        });
        assert_eq!(run(&term, &snapshot(3.5, 0.05, 0.0)), 1.2);
        assert_eq!(run(&term, &snapshot(3.0, 0.0, 0.0)), 1.0);
        assert_eq!(run(&term, &snapshot(3.5, -0.1, 0.0)), 1.0);
    }

    #[test]
    fn test_heading_uses_track_bearing() {
        let term = ScoringTerm::Heading(HeadingBands {
            bands: BandTable::new(
                vec![Band::new(10.0, Effect::Multiply(1.0))],
                Effect::Multiply(0.5),
            ),
        });
        assert_eq!(run(&term, &snapshot(1.0, 0.0, 5.0)), 1.0);
        assert_eq!(run(&term, &snapshot(1.0, 0.0, -15.0)), 0.5);
    }

    #[test]
    fn test_aligned_speed_tiers_and_overspeed() {
        let term = AlignedSpeed {
            max_heading_diff: 10.0,
            aligned: SpeedTiers::new(vec![SpeedTier::new(3.0, Effect::Multiply(1.5))], None),
            misaligned: MisalignedPenalty::Overspeed(OverspeedPenalty {
                threshold: 1.5,
                rate: 0.25,
                min_multiplier: 0.3,
            }),
        };
        let term = ScoringTerm::AlignedSpeed(term);
        assert_eq!(run(&term, &snapshot(4.0, 0.0, 2.0)), 1.5);
        assert_eq!(run(&term, &snapshot(2.0, 0.0, 2.0)), 1.0);
        // misaligned: 1 - 0.25 * 0.5
        assert_eq!(run(&term, &snapshot(2.0, 0.0, 30.0)), 0.875);
        assert_eq!(run(&term, &snapshot(9.0, 0.0, 30.0)), 0.3);
        assert_eq!(run(&term, &snapshot(1.0, 0.0, 30.0)), 1.0);
    }

    #[test]
    fn test_pacing_only_on_interval() {
        let term = ScoringTerm::Pacing(ProgressPacing {
            interval: 50,
            step_budget: 300.0,
            multiplier: 1.2,
        });
        // 100 steps -> target 33.3%, progress 40%
        assert_eq!(run(&term, &snapshot(1.0, 0.0, 0.0)), 1.2);

        let mut s = snapshot(1.0, 0.0, 0.0);
        s.steps = 101;
        assert_eq!(run(&term, &s), 1.0);

        s.steps = 150;
        assert_eq!(run(&term, &s), 1.0);
    }

    #[test]
    fn test_zig_zag_additive_quirk() {
        let mul = ScoringTerm::ZigZag(ZigZagPenalty {
            max_steering: 30.0,
            penalty: Effect::Multiply(0.8),
        });
        let add = ScoringTerm::ZigZag(ZigZagPenalty {
            max_steering: 30.0,
            penalty: Effect::Add(0.8),
        });
        assert_eq!(run(&mul, &snapshot(1.0, -31.0, 0.0)), 0.8);
        assert_eq!(run(&add, &snapshot(1.0, -31.0, 0.0)), 1.8);
        assert_eq!(run(&mul, &snapshot(1.0, 30.0, 0.0)), 1.0);
    }

    #[test]
    fn test_throttle_limit_shrinks_with_steering() {
        let penalty = ThrottlePenalty {
            base_speed: 1.2,
            steering_factor: 0.4,
            multiplier: 0.8,
        };
        assert!((penalty.limit(1.0) - 0.8).abs() < 1e-12);
        let term = ScoringTerm::Throttle(penalty);
        assert_eq!(run(&term, &snapshot(1.0, 0.0, 0.0)), 1.0);
        assert_eq!(run(&term, &snapshot(1.0, 1.0, 0.0)), 0.8);
    }

    #[test]
    fn test_term_json_is_tagged() {
        let term = ScoringTerm::ZigZag(ZigZagPenalty {
            max_steering: 30.0,
            penalty: Effect::Multiply(0.8),
        });
        let json = serde_json::to_value(&term).unwrap();
        assert_eq!(json["term"], "zig_zag");
        assert_eq!(json["penalty"]["multiply"], 0.8);
        let back: ScoringTerm = serde_json::from_value(json).unwrap();
        assert_eq!(back, term);
    }

    #[test]
    fn test_pacing_rejects_zero_interval() {
        let term = ScoringTerm::Pacing(ProgressPacing {
            interval: 0,
            step_budget: 300.0,
            multiplier: 1.2,
        });
        assert!(term.validate().is_err());
    }

    #[test]
    fn test_zero_interval_never_paces() {
        let term = ScoringTerm::Pacing(ProgressPacing {
            interval: 0,
            step_budget: 300.0,
            multiplier: 1.2,
        });
        let mut s = snapshot(1.0, 0.0, 0.0);
        assert_eq!(run(&term, &s), 1.0);
        s.steps = 0;
        assert_eq!(run(&term, &s), 1.0);
    }
}
