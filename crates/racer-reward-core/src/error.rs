//! Error types for reward evaluation

use thiserror::Error;

/// Result type for reward operations
pub type Result<T> = std::result::Result<T, RewardError>;

/// Reward error types
#[derive(Debug, Error)]
pub enum RewardError {
    /// Snapshot is malformed (missing field, bad index, bad width, non-finite value)
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Variant table is malformed
    #[error("Invalid variant: {0}")]
    InvalidVariant(String),

    /// No variant registered under this name
    #[error("Unknown variant '{name}' (known: {known})")]
    UnknownVariant { name: String, known: String },

    /// Reading a config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RewardError {
    /// Shorthand for an invalid snapshot error
    pub fn snapshot(reason: impl Into<String>) -> Self {
        RewardError::InvalidSnapshot(reason.into())
    }

    /// Shorthand for an invalid variant error
    pub fn variant(reason: impl Into<String>) -> Self {
        RewardError::InvalidVariant(reason.into())
    }

    /// Whether this error was caused by the snapshot rather than configuration
    pub fn is_snapshot_error(&self) -> bool {
        matches!(self, RewardError::InvalidSnapshot(_))
    }
}

impl From<serde_json::Error> for RewardError {
    fn from(err: serde_json::Error) -> Self {
        RewardError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_message_lists_known_names() {
        let err = RewardError::UnknownVariant {
            name: "fast".into(),
            known: "paced, steady".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown variant 'fast' (known: paced, steady)"
        );
        assert!(!err.is_snapshot_error());
    }

    #[test]
    fn test_serde_error_converts() {
        let err: RewardError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, RewardError::Serialization(_)));
    }
}
