//! Measurement extraction: cleaning, matching and collision removal

use std::collections::HashMap;
use std::sync::OnceLock;
use regex::Regex;
use tracing::debug;
use crate::rules::{ConversionRule, RuleRegistry};

/// A URL runs from its scheme to the end of the line, line break included
fn get_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://.*[\r\n]*").expect("valid URL pattern"))
}

/// A quantity literal together with the rule that matched it
#[derive(Debug, Clone)]
pub struct Measurement<'r> {
    /// Numeric text exactly as it appeared
    pub token: String,
    pub rule: &'r ConversionRule,
}

/// Remove URLs and thousands separators so "1,000" matches as "1000"
pub fn strip_noise(text: &str) -> String {
    get_url_regex().replace_all(text, "").replace(',', "")
}

/// Find every measurement in `text` that is safe to convert.
///
/// Any quantity literal captured more than once (by one rule or by several)
/// is dropped entirely. If fewer than `min_matches` measurements survive, the
/// text is treated as having none.
pub fn extract_measurements<'r>(
    text: &str,
    rules: &'r RuleRegistry,
    min_matches: usize,
) -> Vec<Measurement<'r>> {
    let cleaned = strip_noise(text);

    let mut raw = Vec::new();
    for rule in rules {
        for token in rule.quantities(&cleaned) {
            raw.push(Measurement { token, rule });
        }
    }

    let found = raw.len();
    let kept = deduplicate(raw);

    if kept.len() < min_matches {
        debug!(found, kept = kept.len(), min_matches, "too few measurements to report");
        return Vec::new();
    }

    debug!(found, kept = kept.len(), "extracted measurements");
    kept
}

/// Keep only measurements whose token occurs exactly once
fn deduplicate(raw: Vec<Measurement<'_>>) -> Vec<Measurement<'_>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for m in &raw {
        *counts.entry(m.token.clone()).or_default() += 1;
    }

    raw.into_iter()
        .filter(|m| {
            let unique = counts[&m.token] == 1;
            if !unique {
                debug!(token = %m.token, rule = m.rule.name(), "dropping ambiguous quantity");
            }
            unique
        })
        .collect()
}
