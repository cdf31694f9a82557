//! Running reward value threaded through a term chain

use racer_reward_core::{Reward, RewardComponents};
use tracing::debug;

use crate::effect::Effect;

/// Mutable reward for a single evaluation call
#[derive(Debug)]
pub struct Accumulator {
    value: f64,
    floor: f64,
    terminal_floor: bool,
    halted: bool,
    components: RewardComponents,
}

impl Accumulator {
    /// Start a new evaluation at `seed`
    pub fn new(seed: f64, floor: f64, terminal_floor: bool) -> Self {
        let mut components = RewardComponents::new();
        components.insert("seed".to_string(), seed);
        Self {
            value: seed,
            floor,
            terminal_floor,
            halted: false,
            components,
        }
    }

    /// Current reward value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether a terminal floor stopped the chain
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Apply one effect. Ignored once the chain has halted.
    pub fn apply(&mut self, effect: Effect) {
        if self.halted {
            return;
        }
        match effect {
            Effect::Multiply(factor) => self.value *= factor,
            Effect::Add(amount) => self.value += amount,
            Effect::Set(value) => self.value = value,
            Effect::Floor => {
                self.value = self.floor;
                if self.terminal_floor {
                    debug!(floor = self.floor, "floor reached, halting term chain");
                    self.halted = true;
                }
            }
        }
    }

    /// Add a term's contribution to the decomposition
    pub fn record(&mut self, term: &str, delta: f64) {
        *self.components.entry(term.to_string()).or_insert(0.0) += delta;
    }

    /// Finish the evaluation
    pub fn finish(self) -> Reward {
        Reward {
            value: self.value,
            components: self.components,
        }
    }
}
