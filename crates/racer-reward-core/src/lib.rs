//! # racer-reward-core
//!
//! Core types and traits for DeepRacer-style reward functions.
//!
//! This crate provides the foundational types shared by reward evaluators:
//! - The per-tick parameter snapshot and its validation
//! - Reward values and their per-term decomposition
//! - The `RewardFunction` trait
//! - Track geometry helpers

pub mod error;
pub mod geometry;
pub mod reward;
pub mod snapshot;

pub use error::{Result, RewardError};
pub use reward::{Reward, RewardComponentDef, RewardComponents, RewardFunction};
pub use snapshot::{ParameterSnapshot, Waypoint};
