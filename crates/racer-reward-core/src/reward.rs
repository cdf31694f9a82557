//! Reward types and the reward function trait

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::snapshot::ParameterSnapshot;

/// Scalar reward with its per-term decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Total scalar reward
    pub value: f64,
    /// Change contributed by each term, plus the `seed` entry
    #[serde(default)]
    pub components: RewardComponents,
}

impl Reward {
    /// Sum of all component contributions
    pub fn component_total(&self) -> f64 {
        self.components.values().sum()
    }
}

/// Decomposed reward components keyed by term name
pub type RewardComponents = BTreeMap<String, f64>;

/// Definition of a reward component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardComponentDef {
    /// Component name, as used in [`RewardComponents`]
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RewardComponentDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
        }
    }
}

/// Trait for computing rewards from a simulator snapshot
pub trait RewardFunction: Send + Sync {
    /// Compute the reward for one snapshot
    fn compute(&self, snapshot: &ParameterSnapshot) -> Result<Reward>;

    /// List the components this function reports
    fn components(&self) -> Vec<RewardComponentDef>;
}
