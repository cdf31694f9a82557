//! Built-in variant tables.
//!
//! Each function returns a complete [`Variant`]. Additive bands, stacked lead
//! bands and bands scaled twice by the track width are part of the tables.

use crate::effect::{Band, BandTable, Effect, SpeedTier, SpeedTiers};
use crate::term::{
    AlignedSpeed, CenterlineBands, DistanceMeasure, HeadingBands, MisalignedPenalty, OnTrackGate,
    OverspeedPenalty, ProgressPacing, ScoringTerm, StraightBonus, ThrottlePenalty, ZigZagPenalty,
};
use crate::variant::{Seed, Variant};

/// Value set by the on-track gate in variants that use a ceiling
pub const CEILING: f64 = 1e2;

/// Names of all built-in variants
pub const BUILTIN_NAMES: [&str; 4] = ["steady", "paced", "banded", "tiered"];

/// Look up a built-in variant by name
pub fn builtin(name: &str) -> Option<Variant> {
    match name {
        "steady" => Some(steady()),
        "paced" => Some(paced()),
        "banded" => Some(banded()),
        "tiered" => Some(tiered()),
        _ => None,
    }
}

fn decay_seed() -> Seed {
    Seed::CenterlineDecay { rate: 6.0 }
}

fn gate_with_ceiling() -> ScoringTerm {
    ScoringTerm::OnTrack(OnTrackGate {
        on_track: Some(CEILING),
    })
}

/// Heading table shared by `paced` and `banded`. The ≤0.1° lead band
/// stacks with the ≤1° step.
fn stacked_heading_bands() -> ScoringTerm {
    ScoringTerm::Heading(HeadingBands {
        bands: BandTable::new(
            vec![
                Band::new(1.0, Effect::Multiply(1.3)),
                Band::new(2.0, Effect::Multiply(1.2)),
                Band::new(3.0, Effect::Multiply(1.1)),
                Band::new(4.0, Effect::Multiply(1.0)),
                Band::new(5.0, Effect::Multiply(0.9)),
                Band::new(10.0, Effect::Multiply(0.8)),
            ],
            Effect::Multiply(0.5),
        )
        .with_lead(Band::new(0.1, Effect::Multiply(1.6))),
    })
}

/// Tuned for a 1-2 m/s action space.
///
/// Raw distance against width-scaled bands, with an additive third band, and
/// a speed term that rewards pace only while aligned with the track.
pub fn steady() -> Variant {
    Variant::new(
        decay_seed(),
        vec![
            gate_with_ceiling(),
            ScoringTerm::Centerline(CenterlineBands {
                measure: DistanceMeasure::Raw,
                scale_by_width: true,
                bands: BandTable::new(
                    vec![
                        Band::new(0.1, Effect::Multiply(1.2)),
                        Band::new(0.25, Effect::Multiply(0.8)),
                        Band::new(0.5, Effect::Add(0.5)),
                    ],
                    Effect::Floor,
                ),
            }),
            ScoringTerm::Straight(StraightBonus {
                max_steering: 0.1,
                min_speed: 3.0,
                multiplier: 1.2,
            }),
            ScoringTerm::Heading(HeadingBands {
                bands: BandTable::new(
                    vec![Band::new(10.0, Effect::Multiply(1.0))],
                    Effect::Multiply(0.5),
                ),
            }),
            ScoringTerm::AlignedSpeed(AlignedSpeed {
                max_heading_diff: 10.0,
                aligned: SpeedTiers::new(vec![SpeedTier::new(3.0, Effect::Multiply(1.5))], None),
                misaligned: MisalignedPenalty::Tiers(SpeedTiers::new(
                    vec![SpeedTier::new(1.5, Effect::Multiply(0.5))],
                    Some(Effect::Multiply(0.3)),
                )),
            }),
        ],
    )
}

/// Full chain with progress pacing.
///
/// The distance is normalized by track width and then compared with bands
/// that are themselves scaled by track width.
pub fn paced() -> Variant {
    const SPEED_THRESHOLD: f64 = 2.0;
    const STEPS_THRESHOLD: f64 = 300.0;
    const ABS_STEERING_THRESHOLD: f64 = 30.0;

    Variant::new(
        decay_seed(),
        vec![
            gate_with_ceiling(),
            ScoringTerm::Centerline(CenterlineBands {
                measure: DistanceMeasure::Normalized,
                scale_by_width: true,
                bands: BandTable::new(
                    vec![
                        Band::new(0.1, Effect::Multiply(1.5)),
                        Band::new(0.2, Effect::Multiply(1.2)),
                        Band::new(0.3, Effect::Multiply(0.9)),
                        Band::new(0.5, Effect::Multiply(0.7)),
                    ],
                    Effect::Floor,
                ),
            }),
            ScoringTerm::Straight(StraightBonus {
                max_steering: 0.1,
                min_speed: SPEED_THRESHOLD * 0.8,
                multiplier: 1.2,
            }),
            stacked_heading_bands(),
            ScoringTerm::Pacing(ProgressPacing {
                interval: 50,
                step_budget: STEPS_THRESHOLD,
                multiplier: 1.2,
            }),
            ScoringTerm::ZigZag(ZigZagPenalty {
                max_steering: ABS_STEERING_THRESHOLD,
                penalty: Effect::Multiply(0.8),
            }),
            ScoringTerm::Throttle(ThrottlePenalty {
                base_speed: SPEED_THRESHOLD * 0.6,
                steering_factor: 0.4,
                multiplier: 0.8,
            }),
        ],
    )
}

/// Wide six-band centerline table.
///
/// The zig-zag penalty adds `0.8` instead of multiplying by it; scores from
/// this table depend on that.
pub fn banded() -> Variant {
    const SPEED_THRESHOLD: f64 = 2.5;

    Variant::new(
        decay_seed(),
        vec![
            gate_with_ceiling(),
            ScoringTerm::Centerline(CenterlineBands {
                measure: DistanceMeasure::Normalized,
                scale_by_width: false,
                bands: BandTable::new(
                    vec![
                        Band::new(0.1, Effect::Multiply(1.5)),
                        Band::new(0.2, Effect::Multiply(1.3)),
                        Band::new(0.3, Effect::Multiply(1.1)),
                        Band::new(0.5, Effect::Multiply(1.0)),
                        Band::new(0.7, Effect::Multiply(0.8)),
                        Band::new(0.9, Effect::Multiply(0.6)),
                    ],
                    Effect::Floor,
                ),
            }),
            ScoringTerm::Straight(StraightBonus {
                max_steering: 0.1,
                min_speed: SPEED_THRESHOLD * 0.8,
                multiplier: 1.2,
            }),
            stacked_heading_bands(),
            ScoringTerm::ZigZag(ZigZagPenalty {
                max_steering: 30.0,
                penalty: Effect::Add(0.8),
            }),
            ScoringTerm::Throttle(ThrottlePenalty {
                base_speed: SPEED_THRESHOLD * 0.6,
                steering_factor: 0.4,
                multiplier: 0.8,
            }),
        ],
    )
}

/// Speed tiers conditioned on heading alignment, from a fixed baseline.
///
/// The gate only floors; on track the running value is kept.
pub fn tiered() -> Variant {
    const SPEED_THRESHOLD: f64 = 3.0;

    Variant::new(
        Seed::Fixed { value: 1.0 },
        vec![
            ScoringTerm::OnTrack(OnTrackGate { on_track: None }),
            ScoringTerm::Centerline(CenterlineBands {
                measure: DistanceMeasure::Normalized,
                scale_by_width: false,
                bands: BandTable::new(
                    vec![
                        Band::new(0.1, Effect::Multiply(1.2)),
                        Band::new(0.25, Effect::Multiply(1.0)),
                        Band::new(0.5, Effect::Multiply(0.5)),
                    ],
                    Effect::Floor,
                ),
            }),
            ScoringTerm::Straight(StraightBonus {
                max_steering: 0.1,
                min_speed: SPEED_THRESHOLD * 0.8,
                multiplier: 1.2,
            }),
            ScoringTerm::Heading(HeadingBands {
                bands: BandTable::new(
                    vec![
                        Band::new(1.0, Effect::Multiply(1.3)),
                        Band::new(3.0, Effect::Multiply(1.2)),
                        Band::new(5.0, Effect::Multiply(1.1)),
                        Band::new(10.0, Effect::Multiply(1.0)),
                        Band::new(20.0, Effect::Multiply(0.8)),
                    ],
                    Effect::Multiply(0.5),
                ),
            }),
            ScoringTerm::AlignedSpeed(AlignedSpeed {
                max_heading_diff: 10.0,
                aligned: SpeedTiers::new(
                    vec![
                        SpeedTier::new(SPEED_THRESHOLD * 0.9, Effect::Multiply(1.6)),
                        SpeedTier::new(SPEED_THRESHOLD * 0.7, Effect::Multiply(1.3)),
                        SpeedTier::new(SPEED_THRESHOLD * 0.5, Effect::Multiply(1.1)),
                    ],
                    None,
                ),
                misaligned: MisalignedPenalty::Overspeed(OverspeedPenalty {
                    threshold: SPEED_THRESHOLD * 0.5,
                    rate: 0.25,
                    min_multiplier: 0.3,
                }),
            }),
            ScoringTerm::Pacing(ProgressPacing {
                interval: 50,
                step_budget: 400.0,
                multiplier: 1.2,
            }),
            ScoringTerm::ZigZag(ZigZagPenalty {
                max_steering: 30.0,
                penalty: Effect::Multiply(0.8),
            }),
            ScoringTerm::Throttle(ThrottlePenalty {
                base_speed: SPEED_THRESHOLD * 0.6,
                steering_factor: 0.4,
                multiplier: 0.8,
            }),
        ],
    )
}
