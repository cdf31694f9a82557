//! Effects, band tables and speed tiers
//!
//! Every scoring term resolves to one or more [`Effect`]s applied to the
//! accumulator. Banded terms look the effect up in a [`BandTable`]; speed
//! conditioned terms use [`SpeedTiers`].

use racer_reward_core::{Result, RewardError};
use serde::{Deserialize, Serialize};

use crate::accumulator::Accumulator;

/// Operation applied to the running reward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Multiply by a factor
    Multiply(f64),
    /// Add a constant
    Add(f64),
    /// Override with a constant
    Set(f64),
    /// Override with the variant floor; halts the chain when the floor is terminal
    Floor,
}

impl Effect {
    pub(crate) fn validate(&self, context: &str) -> Result<()> {
        let value = match *self {
            Effect::Multiply(v) | Effect::Add(v) | Effect::Set(v) => v,
            Effect::Floor => return Ok(()),
        };
        if !value.is_finite() {
            return Err(RewardError::variant(format!(
                "{context}: effect constant {value} is not finite"
            )));
        }
        Ok(())
    }
}

/// One step of a band table: measurements `<= upto` take `effect`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upto: f64,
    pub effect: Effect,
}

impl Band {
    pub fn new(upto: f64, effect: Effect) -> Self {
        Self { upto, effect }
    }
}

/// Ordered step function over a measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    /// Band tested on its own before `steps`; when it matches, its effect
    /// stacks with whichever step also matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead: Option<Band>,
    /// Ascending bands, first match wins
    pub steps: Vec<Band>,
    /// Effect past the last band
    pub beyond: Effect,
}

impl BandTable {
    pub fn new(steps: Vec<Band>, beyond: Effect) -> Self {
        Self {
            lead: None,
            steps,
            beyond,
        }
    }

    pub fn with_lead(mut self, lead: Band) -> Self {
        self.lead = Some(lead);
        self
    }

    /// Effect of the first step containing `measure`, band limits multiplied by `scale`
    pub fn select(&self, measure: f64, scale: f64) -> Effect {
        self.steps
            .iter()
            .find(|band| measure <= band.upto * scale)
            .map_or(self.beyond, |band| band.effect)
    }

    /// Apply the lead band (if it matches) and then the selected step
    pub fn apply(&self, measure: f64, scale: f64, acc: &mut Accumulator) {
        if let Some(lead) = self.lead {
            if measure <= lead.upto * scale {
                acc.apply(lead.effect);
            }
        }
        acc.apply(self.select(measure, scale));
    }

    pub(crate) fn validate(&self, context: &str) -> Result<()> {
        if self.steps.is_empty() {
            return Err(RewardError::variant(format!("{context}: band table is empty")));
        }
        if let Some(lead) = &self.lead {
            check_limit(lead.upto, context)?;
            lead.effect.validate(context)?;
        }
        let mut previous: Option<f64> = None;
        for band in &self.steps {
            check_limit(band.upto, context)?;
            if let Some(prev) = previous {
                if band.upto <= prev {
                    return Err(RewardError::variant(format!(
                        "{context}: band limits must be strictly ascending ({} after {prev})",
                        band.upto
                    )));
                }
            }
            band.effect.validate(context)?;
            previous = Some(band.upto);
        }
        self.beyond.validate(context)
    }
}

fn check_limit(limit: f64, context: &str) -> Result<()> {
    if !limit.is_finite() || limit < 0.0 {
        return Err(RewardError::variant(format!(
            "{context}: band limit {limit} must be finite and non-negative"
        )));
    }
    Ok(())
}

/// Speed tier: speeds strictly `above` the threshold take `effect`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedTier {
    pub above: f64,
    pub effect: Effect,
}

impl SpeedTier {
    pub fn new(above: f64, effect: Effect) -> Self {
        Self { above, effect }
    }
}

/// Descending speed thresholds, fastest tier first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTiers {
    pub tiers: Vec<SpeedTier>,
    /// Effect when no tier matches; `None` leaves the reward unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<Effect>,
}

impl SpeedTiers {
    pub fn new(tiers: Vec<SpeedTier>, otherwise: Option<Effect>) -> Self {
        Self { tiers, otherwise }
    }

    /// Effect for `speed`, if any
    pub fn select(&self, speed: f64) -> Option<Effect> {
        self.tiers
            .iter()
            .find(|tier| speed > tier.above)
            .map(|tier| tier.effect)
            .or(self.otherwise)
    }

    pub(crate) fn validate(&self, context: &str) -> Result<()> {
        let mut previous: Option<f64> = None;
        for tier in &self.tiers {
            if !tier.above.is_finite() {
                return Err(RewardError::variant(format!(
                    "{context}: speed threshold {} is not finite",
                    tier.above
                )));
            }
            if let Some(prev) = previous {
                if tier.above >= prev {
                    return Err(RewardError::variant(format!(
                        "{context}: speed tiers must be strictly descending ({} after {prev})",
                        tier.above
                    )));
                }
            }
            tier.effect.validate(context)?;
            previous = Some(tier.above);
        }
        if let Some(effect) = &self.otherwise {
            effect.validate(context)?;
        }
        Ok(())
    }
}
