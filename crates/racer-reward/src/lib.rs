//! # racer-reward
//!
//! Reward-shaping evaluator for DeepRacer-style driving simulators.
//!
//! This crate provides:
//! - `RewardEvaluator`, which scores a snapshot with one variant's term chain
//! - The scoring terms and the effects they apply
//! - Built-in variant tables and a named variant registry
//! - Loading variant tables from JSON files
//!
//! ```
//! use racer_reward::RewardEvaluator;
//! use racer_reward_core::ParameterSnapshot;
//!
//! let evaluator = RewardEvaluator::builtin("paced").unwrap();
//! let snapshot = ParameterSnapshot {
//!     all_wheels_on_track: false,
//!     distance_from_center: 0.0,
//!     track_width: 1.0,
//!     steering_angle: 0.0,
//!     speed: 4.0,
//!     heading: 0.0,
//!     waypoints: vec![[0.0, 0.0], [1.0, 0.0]],
//!     closest_waypoints: [0, 1],
//!     steps: 0,
//!     progress: 0.0,
//! };
//! assert_eq!(evaluator.evaluate(&snapshot).unwrap(), 1e-3);
//! ```

pub mod accumulator;
pub mod config;
pub mod effect;
pub mod evaluator;
pub mod presets;
pub mod registry;
pub mod term;
pub mod variant;

pub use accumulator::Accumulator;
pub use config::VariantFile;
pub use effect::{Band, BandTable, Effect, SpeedTier, SpeedTiers};
pub use evaluator::RewardEvaluator;
pub use registry::VariantRegistry;
pub use term::{ScoringTerm, TermContext};
pub use variant::{Seed, Variant};
