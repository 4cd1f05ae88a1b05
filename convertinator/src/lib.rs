//! Convertinator - metric conversions for imperial measurements in free text
//!
//! The pipeline is: strip URLs and commas, match every rule, drop quantity
//! literals that were matched more than once, apply the min-matches gate,
//! convert what is left and render a report.

mod config;
mod convert;
mod error;
mod extract;
mod report;
mod rules;

pub use config::{PipelineConfig, CONFIG_ENV, DEFAULT_MIN_MATCHES, MIN_MATCHES_ENV, RULES_ENV};
pub use convert::{convert, convert_all, ConversionResult};
pub use error::{ConfigError, ConversionError, RegistryError};
pub use extract::{extract_measurements, strip_noise, Measurement};
pub use report::{format_report, ReportTemplate};
pub use rules::{builtin_defs, ConversionRule, RuleDef, RuleKind, RuleRegistry};

use std::sync::Arc;
use serde::Serialize;
use tracing::warn;
use convertinator_units::UNITS;

/// Diagnostic record for a measurement that could not be converted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionFailure {
    pub token: String,
    pub rule: String,
    pub error: String,
}

/// Everything the pipeline produced for one text
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    /// Rendered report, `None` when there is nothing to say
    pub report: Option<String>,
    /// Measurements that survived deduplication and the gate
    pub measurements: usize,
    pub results: Vec<ConversionResult>,
    pub failures: Vec<ConversionFailure>,
}

/// Main engine: a shared rule table plus configuration
#[derive(Debug, Clone)]
pub struct Convertinator {
    rules: Arc<RuleRegistry>,
    config: PipelineConfig,
}

impl Convertinator {
    pub fn new(rules: RuleRegistry) -> Self {
        Self {
            rules: Arc::new(rules),
            config: PipelineConfig::default(),
        }
    }

    /// Built-in rules resolved against the default unit table
    pub fn builtin() -> Result<Self, RegistryError> {
        Ok(Self::new(RuleRegistry::builtin(&UNITS)?))
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_min_matches(mut self, min_matches: usize) -> Self {
        self.config.min_matches = min_matches;
        self
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn extract(&self, text: &str) -> Vec<Measurement<'_>> {
        extract_measurements(text, &self.rules, self.config.min_matches)
    }

    pub fn process(&self, text: &str) -> Processed {
        let measurements = self.extract(text);
        let outcomes = convert_all(&measurements);
        let report = format_report(&outcomes, &self.config.report);

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (measurement, outcome) in measurements.iter().zip(outcomes) {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(token = %measurement.token, rule = e.rule(), error = %e, text, "conversion failed");
                    failures.push(ConversionFailure {
                        token: measurement.token.clone(),
                        rule: e.rule().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Processed {
            report,
            measurements: measurements.len(),
            results,
            failures,
        }
    }

    /// The report for `text`, or `None` if the caller should not reply
    pub fn build_report(&self, text: &str) -> Option<String> {
        self.process(text).report
    }
}
