//! The reward evaluator

use racer_reward_core::{
    ParameterSnapshot, Result, Reward, RewardComponentDef, RewardError, RewardFunction,
};
use tracing::{debug, trace};

use crate::accumulator::Accumulator;
use crate::presets;
use crate::term::TermContext;
use crate::variant::Variant;

/// Scores snapshots with one variant's term chain.
///
/// Immutable after construction; a single evaluator can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct RewardEvaluator {
    name: String,
    variant: Variant,
}

impl RewardEvaluator {
    /// Build an evaluator for a validated variant
    pub fn new(name: impl Into<String>, variant: Variant) -> Result<Self> {
        let name = name.into();
        variant.validate()?;
        debug!(variant = %name, terms = variant.terms.len(), "built reward evaluator");
        Ok(Self { name, variant })
    }

    /// Build an evaluator for a built-in variant
    pub fn builtin(name: &str) -> Result<Self> {
        let variant = presets::builtin(name).ok_or_else(|| RewardError::UnknownVariant {
            name: name.to_string(),
            known: presets::BUILTIN_NAMES.join(", "),
        })?;
        Self::new(name, variant)
    }

    /// Variant name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant table
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Score one snapshot
    pub fn evaluate(&self, snapshot: &ParameterSnapshot) -> Result<f64> {
        Ok(self.evaluate_detailed(snapshot)?.value)
    }

    /// Score one snapshot and report each term's contribution
    pub fn evaluate_detailed(&self, snapshot: &ParameterSnapshot) -> Result<Reward> {
        snapshot.validate()?;
        let ctx = TermContext::new(snapshot, self.variant.wrap_heading)?;

        let mut acc = Accumulator::new(
            self.variant.seed.value(snapshot),
            self.variant.floor,
            self.variant.terminal_floor,
        );

        for term in &self.variant.terms {
            if acc.is_halted() {
                break;
            }
            let before = acc.value();
            term.apply(&ctx, &mut acc);
            let after = acc.value();
            trace!(term = term.name(), before, after, "applied scoring term");
            acc.record(term.name(), after - before);
        }

        let reward = acc.finish();
        if !reward.value.is_finite() {
            return Err(RewardError::snapshot(format!(
                "reward is not finite ({}) under variant '{}'",
                reward.value, self.name
            )));
        }
        Ok(reward)
    }
}

impl RewardFunction for RewardEvaluator {
    fn compute(&self, snapshot: &ParameterSnapshot) -> Result<Reward> {
        self.evaluate_detailed(snapshot)
    }

    fn components(&self) -> Vec<RewardComponentDef> {
        self.variant.components()
    }
}
