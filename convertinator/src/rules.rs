//! Unit rule registry
//!
//! A rule pairs a text pattern with the units it converts between and the
//! symbols shown in the report. Rules are described by `RuleDef` (plain data,
//! loadable from JSON) and validated into `ConversionRule` once at startup.

use std::collections::HashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use convertinator_units::{Unit, UnitRegistry};
use crate::error::RegistryError;

/// Conversion algorithm a rule uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Pure scale factor (length, area, mass)
    Linear,
    /// Scale and offset (temperature)
    Affine,
}

/// Serializable description of a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    pub name: String,
    /// Regex whose first capture group is the numeric literal
    pub pattern: String,
    pub from_unit: String,
    pub to_unit: String,
    pub from_symbol: String,
    pub to_symbol: String,
    pub kind: RuleKind,
}

impl RuleDef {
    pub fn new(
        name: &str,
        pattern: &str,
        units: (&str, &str),
        symbols: (&str, &str),
        kind: RuleKind,
    ) -> Self {
        RuleDef {
            name: name.to_string(),
            pattern: pattern.to_string(),
            from_unit: units.0.to_string(),
            to_unit: units.1.to_string(),
            from_symbol: symbols.0.to_string(),
            to_symbol: symbols.1.to_string(),
            kind,
        }
    }
}

/// The built-in rule table.
///
/// Order decides the order measurements are reported in.
pub fn builtin_defs() -> Vec<RuleDef> {
    use RuleKind::{Affine, Linear};

    vec![
        RuleDef::new("acres", r"([0-9.]+) (acres?)", ("acres", "square kilometers"), ("acres", "km^2"), Linear),
        RuleDef::new("miles", r"([0-9.]+) (miles?)", ("miles", "kilometers"), ("miles", "km"), Linear),
        RuleDef::new("ft", r"([0-9.]+) (ft)", ("feet", "metres"), ("ft", "metres"), Linear),
        RuleDef::new("foot", r"([0-9.]+) (foot)", ("feet", "metres"), ("ft", "metres"), Linear),
        RuleDef::new("feet", r"([0-9.]+) (feet)", ("feet", "metres"), ("ft", "metres"), Linear),
        RuleDef::new("pounds", r"([0-9.]+) (pounds)", ("lb", "kg"), ("lb", "kg"), Linear),
        RuleDef::new("lb", r"([0-9.]+) (lb)", ("lb", "kg"), ("lb", "kg"), Linear),
        RuleDef::new("oz", r"([0-9.]+) (oz)", ("ounces", "grams"), ("ounces", "grams"), Linear),
        RuleDef::new("ounces", r"([0-9.]+) (ounces)", ("ounces", "grams"), ("ounces", "grams"), Linear),
        RuleDef::new("degrees farenheit", r"(-?[0-9.]+) (degrees farenheit)", ("degF", "degC"), ("°F", "°C"), Affine),
        RuleDef::new("farenheit", r"(-?[0-9.]+) (farenheit)", ("degF", "degC"), ("°F", "°C"), Affine),
        RuleDef::new("F", r"(-?[0-9.]+)(F)", ("degF", "degC"), ("°F", "°C"), Affine),
    ]
}

/// A validated rule: compiled pattern and resolved units
#[derive(Debug, Clone)]
pub struct ConversionRule {
    name: String,
    pattern: Regex,
    source_unit: Unit,
    target_unit: Unit,
    source_symbol: String,
    target_symbol: String,
    kind: RuleKind,
}

impl ConversionRule {
    /// Compile and check a rule definition against a unit table
    pub fn from_def(def: &RuleDef, units: &UnitRegistry) -> Result<Self, RegistryError> {
        let pattern = Regex::new(&def.pattern).map_err(|e| RegistryError::InvalidPattern {
            rule: def.name.clone(),
            reason: e.to_string(),
        })?;

        // captures_len counts the implicit whole-match group
        if pattern.captures_len() < 2 {
            return Err(RegistryError::InvalidPattern {
                rule: def.name.clone(),
                reason: "no capture group for the quantity".to_string(),
            });
        }

        let unit_error = |reason: String| RegistryError::UnitConfiguration {
            rule: def.name.clone(),
            reason,
        };

        let source_unit = units.resolve(&def.from_unit).map_err(|e| unit_error(e.to_string()))?;
        let target_unit = units.resolve(&def.to_unit).map_err(|e| unit_error(e.to_string()))?;

        if !source_unit.is_compatible(&target_unit) {
            return Err(unit_error(format!(
                "cannot convert {} ({}) to {} ({})",
                source_unit.symbol, source_unit.dimension, target_unit.symbol, target_unit.dimension
            )));
        }

        match def.kind {
            RuleKind::Linear => {
                if let Some(offset_unit) = [&source_unit, &target_unit].into_iter().find(|u| u.has_offset()) {
                    return Err(unit_error(format!(
                        "linear rule cannot use offset unit {}", offset_unit.symbol
                    )));
                }
            }
            RuleKind::Affine => {
                if !source_unit.has_offset() && !target_unit.has_offset() {
                    return Err(unit_error(format!(
                        "affine rule needs an offset unit, got {} and {}",
                        source_unit.symbol, target_unit.symbol
                    )));
                }
            }
        }

        Ok(ConversionRule {
            name: def.name.clone(),
            pattern,
            source_unit,
            target_unit,
            source_symbol: def.from_symbol.clone(),
            target_symbol: def.to_symbol.clone(),
            kind: def.kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_unit(&self) -> &Unit {
        &self.source_unit
    }

    pub fn target_unit(&self) -> &Unit {
        &self.target_unit
    }

    pub fn source_symbol(&self) -> &str {
        &self.source_symbol
    }

    pub fn target_symbol(&self) -> &str {
        &self.target_symbol
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Every quantity literal this rule captures in `text`, in order
    pub fn quantities(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Ordered, read-only collection of validated rules
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<ConversionRule>,
}

impl RuleRegistry {
    /// The built-in table resolved against `units`
    pub fn builtin(units: &UnitRegistry) -> Result<Self, RegistryError> {
        Self::from_defs(&builtin_defs(), units)
    }

    /// Validate every definition, failing on the first bad one
    pub fn from_defs(defs: &[RuleDef], units: &UnitRegistry) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(defs.len());

        for def in defs {
            if !seen.insert(def.name.as_str()) {
                return Err(RegistryError::DuplicateRule(def.name.clone()));
            }
            rules.push(ConversionRule::from_def(def, units)?);
        }

        Ok(RuleRegistry { rules })
    }

    /// Parse a JSON array of `RuleDef` and validate it
    pub fn from_json(json: &str, units: &UnitRegistry) -> Result<Self, RegistryError> {
        let defs: Vec<RuleDef> = serde_json::from_str(json)?;
        Self::from_defs(&defs, units)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ConversionRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

impl<'a> IntoIterator for &'a RuleRegistry {
    type Item = &'a ConversionRule;
    type IntoIter = std::slice::Iter<'a, ConversionRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
