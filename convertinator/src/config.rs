//! Pipeline configuration
//!
//! Defaults, then an optional JSON file named by `CONVERTINATOR_CONFIG`,
//! then `CONVERTINATOR_MIN_MATCHES`.

use std::env;
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::report::ReportTemplate;

pub const CONFIG_ENV: &str = "CONVERTINATOR_CONFIG";
pub const MIN_MATCHES_ENV: &str = "CONVERTINATOR_MIN_MATCHES";
pub const RULES_ENV: &str = "CONVERTINATOR_RULES";

/// Measurements a text needs before it gets a report
pub const DEFAULT_MIN_MATCHES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub min_matches: usize,
    #[serde(flatten)]
    pub report: ReportTemplate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            min_matches: DEFAULT_MIN_MATCHES,
            report: ReportTemplate::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(raw) = lookup(MIN_MATCHES_ENV) {
            config.min_matches = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: MIN_MATCHES_ENV.to_string(),
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.min_matches, 2);
    }

    #[test]
    fn test_min_matches_override() {
        let config = PipelineConfig::from_lookup(lookup_from(&[(MIN_MATCHES_ENV, " 1 ")])).unwrap();
        assert_eq!(config.min_matches, 1);
    }

    #[test]
    fn test_min_matches_invalid() {
        let err = PipelineConfig::from_lookup(lookup_from(&[(MIN_MATCHES_ENV, "two")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "two"));
    }

    #[test]
    fn test_from_json_flattened_template() {
        let config = PipelineConfig::from_json(r#"{"min_matches": 3, "intro": "Hello\n"}"#).unwrap();
        assert_eq!(config.min_matches, 3);
        assert_eq!(config.report.intro, "Hello\n");
        assert_eq!(config.report.outro, ReportTemplate::default().outro);
    }

    #[test]
    fn test_config_file_then_env() {
        let path = env::temp_dir().join(format!("convertinator-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"min_matches": 4, "outro": "bye"}"#).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (CONFIG_ENV, path_str.as_str()),
            (MIN_MATCHES_ENV, "1"),
        ])).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.min_matches, 1);
        assert_eq!(config.report.outro, "bye");
    }

    #[test]
    fn test_missing_config_file() {
        let err = PipelineConfig::from_lookup(lookup_from(&[(CONFIG_ENV, "/nonexistent/convertinator.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
