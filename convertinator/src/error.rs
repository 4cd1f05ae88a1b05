//! Error types for the measurement pipeline
//!
//! Two families with different lifetimes:
//! - `RegistryError` and `ConfigError` happen at startup and are fatal.
//! - `ConversionError` belongs to a single measurement and never stops the
//!   rest of a text from being converted.

use std::path::PathBuf;
use thiserror::Error;
use convertinator_units::UnitError;

/// Failure to convert one measurement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("rule '{rule}': quantity '{token}' is not a number")]
    Parse { token: String, rule: String },

    #[error("rule '{rule}': {source}")]
    Unit {
        rule: String,
        #[source]
        source: UnitError,
    },

    #[error("rule '{rule}': quantity '{token}' is out of range")]
    OutOfRange { token: String, rule: String },
}

impl ConversionError {
    /// Name of the rule whose measurement failed
    pub fn rule(&self) -> &str {
        match self {
            ConversionError::Parse { rule, .. }
            | ConversionError::Unit { rule, .. }
            | ConversionError::OutOfRange { rule, .. } => rule,
        }
    }
}

/// Rule table integrity failures
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("rule '{rule}': invalid pattern: {reason}")]
    InvalidPattern { rule: String, reason: String },

    #[error("rule '{rule}': unit configuration: {reason}")]
    UnitConfiguration { rule: String, reason: String },

    #[error("duplicate rule name '{0}'")]
    DuplicateRule(String),

    #[error("malformed rule table: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_rule() {
        let err = ConversionError::Parse { token: "1.2.3".into(), rule: "feet".into() };
        assert_eq!(err.rule(), "feet");
        assert_eq!(err.to_string(), "rule 'feet': quantity '1.2.3' is not a number");
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::UnitConfiguration {
            rule: "cubits".into(),
            reason: "unknown unit: cubit".into(),
        };
        assert_eq!(err.to_string(), "rule 'cubits': unit configuration: unknown unit: cubit");
    }
}
