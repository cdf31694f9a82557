//! Variant tables: seed, floor and the ordered term chain

use racer_reward_core::{ParameterSnapshot, Result, RewardComponentDef, RewardError};
use serde::{Deserialize, Serialize};

use crate::term::ScoringTerm;

/// Default floor reward
pub const DEFAULT_FLOOR: f64 = 1e-3;

/// Starting value of the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Seed {
    /// Constant baseline
    Fixed { value: f64 },
    /// `exp(-rate * distance_from_center)`
    CenterlineDecay { rate: f64 },
}

impl Seed {
    pub fn value(&self, snapshot: &ParameterSnapshot) -> f64 {
        match *self {
            Seed::Fixed { value } => value,
            Seed::CenterlineDecay { rate } => (-rate * snapshot.distance_from_center).exp(),
        }
    }

    fn validate(&self) -> Result<()> {
        let (field, value) = match *self {
            Seed::Fixed { value } => ("seed value", value),
            Seed::CenterlineDecay { rate } => ("seed rate", rate),
        };
        if !value.is_finite() {
            return Err(RewardError::variant(format!("{field} {value} is not finite")));
        }
        if let Seed::CenterlineDecay { rate } = *self {
            if rate < 0.0 {
                return Err(RewardError::variant(format!(
                    "seed rate must be non-negative, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

fn default_floor() -> f64 {
    DEFAULT_FLOOR
}

fn default_true() -> bool {
    true
}

/// A reward function variant: seed, floor and ordered scoring terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub seed: Seed,
    /// Value used by `floor` effects
    #[serde(default = "default_floor")]
    pub floor: f64,
    /// A `floor` effect ends the term chain
    #[serde(default = "default_true")]
    pub terminal_floor: bool,
    /// Fold heading differences into [0, 180]
    #[serde(default)]
    pub wrap_heading: bool,
    pub terms: Vec<ScoringTerm>,
}

impl Variant {
    /// Create a variant with the default floor and terminal floor semantics
    pub fn new(seed: Seed, terms: Vec<ScoringTerm>) -> Self {
        Self {
            seed,
            floor: DEFAULT_FLOOR,
            terminal_floor: true,
            wrap_heading: false,
            terms,
        }
    }

    /// Check all constants in the table
    pub fn validate(&self) -> Result<()> {
        self.seed.validate()?;
        if !self.floor.is_finite() || self.floor <= 0.0 {
            return Err(RewardError::variant(format!(
                "floor must be positive and finite, got {}",
                self.floor
            )));
        }
        if self.terms.is_empty() {
            return Err(RewardError::variant("variant has no scoring terms"));
        }
        for term in &self.terms {
            term.validate()?;
        }
        Ok(())
    }

    /// Term names in chain order
    pub fn term_names(&self) -> Vec<&'static str> {
        self.terms.iter().map(ScoringTerm::name).collect()
    }

    /// Components reported by evaluators of this variant
    pub fn components(&self) -> Vec<RewardComponentDef> {
        let mut defs = vec![RewardComponentDef::new("seed", "Initial accumulator value")];
        for term in &self.terms {
            if defs.iter().all(|d| d.name != term.name()) {
                defs.push(RewardComponentDef::new(term.name(), term.description()));
            }
        }
        defs
    }
}
