//! Variant configuration files
//!
//! ```json
//! {
//!   "variants": {
//!     "gentle": {
//!       "seed": { "kind": "fixed", "value": 1.0 },
//!       "terms": [
//!         { "term": "on_track" },
//!         { "term": "zig_zag", "max_steering": 20.0, "penalty": { "multiply": 0.9 } }
//!       ]
//!     }
//!   }
//! }
//! ```

use racer_reward_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::variant::Variant;

/// A set of named variants loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantFile {
    #[serde(default)]
    pub variants: BTreeMap<String, Variant>,
}

impl VariantFile {
    /// Parse a variant file from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a variant file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file = Self::from_json(&text)?;
        debug!(path = %path.display(), variants = file.variants.len(), "loaded variant file");
        Ok(file)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    const GENTLE: &str = r#"{
        "variants": {
            "gentle": {
                "seed": { "kind": "fixed", "value": 1.0 },
                "terms": [
                    { "term": "on_track" },
                    { "term": "zig_zag", "max_steering": 20.0, "penalty": { "multiply": 0.9 } }
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_documented_example() {
        let file = VariantFile::from_json(GENTLE).unwrap();
        let gentle = &file.variants["gentle"];
        assert_eq!(gentle.term_names(), vec!["on_track", "zig_zag"]);
        gentle.validate().unwrap();
    }

    #[test]
    fn test_builtins_round_trip() {
        let mut file = VariantFile::default();
        for name in presets::BUILTIN_NAMES {
            file.variants
                .insert(name.to_string(), presets::builtin(name).unwrap());
        }
        let json = file.to_json_pretty().unwrap();
        let back = VariantFile::from_json(&json).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_unknown_term_rejected() {
        let json = r#"{"variants": {"x": {"seed": {"kind": "fixed", "value": 1.0},
            "terms": [{"term": "teleport"}]}}}"#;
        assert!(VariantFile::from_json(json).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = VariantFile::load("/nonexistent/variants.json").unwrap_err();
        assert!(matches!(err, racer_reward_core::RewardError::Io(_)));
    }
}
