//! Named variant registry

use racer_reward_core::{Result, RewardError};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::VariantFile;
use crate::evaluator::RewardEvaluator;
use crate::presets;
use crate::variant::Variant;

/// Registry of named variants
#[derive(Debug, Clone, Default)]
pub struct VariantRegistry {
    variants: BTreeMap<String, Variant>,
}

impl VariantRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in variant
    pub fn with_builtins() -> Self {
        let variants = presets::BUILTIN_NAMES
            .iter()
            .filter_map(|name| presets::builtin(name).map(|v| (name.to_string(), v)))
            .collect();
        Self { variants }
    }

    /// Register a variant, replacing any existing one with the same name
    pub fn register(&mut self, name: impl Into<String>, variant: Variant) -> Result<()> {
        let name = name.into();
        variant.validate().map_err(|e| match e {
            RewardError::InvalidVariant(msg) => RewardError::variant(format!("{name}: {msg}")),
            other => other,
        })?;
        if self.variants.insert(name.clone(), variant).is_some() {
            warn!(variant = %name, "replaced registered variant");
        } else {
            debug!(variant = %name, "registered variant");
        }
        Ok(())
    }

    /// Register every variant in a config file
    pub fn merge(&mut self, file: VariantFile) -> Result<()> {
        for (name, variant) in file.variants {
            self.register(name, variant)?;
        }
        Ok(())
    }

    /// Remove a variant
    pub fn remove(&mut self, name: &str) -> Result<Variant> {
        self.variants
            .remove(name)
            .ok_or_else(|| self.unknown(name))
    }

    /// Get a variant by name
    pub fn get(&self, name: &str) -> Result<&Variant> {
        self.variants.get(name).ok_or_else(|| self.unknown(name))
    }

    /// Build an evaluator for a registered variant
    pub fn evaluator(&self, name: &str) -> Result<RewardEvaluator> {
        RewardEvaluator::new(name, self.get(name)?.clone())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.variants.keys().map(String::as_str).collect()
    }

    /// Iterate over (name, variant) pairs, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.variants.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    fn unknown(&self, name: &str) -> RewardError {
        RewardError::UnknownVariant {
            name: name.to_string(),
            known: self.names().join(", "),
        }
    }
}
